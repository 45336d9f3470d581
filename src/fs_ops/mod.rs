//! Filesystem operations: scanning the output spool and relocating entries.

mod atomic;
mod copy;
mod helpers;
mod lock;
mod relocate;
mod scan;
mod util;

pub use helpers::io_error_with_help;
pub use lock::{LOCK_FILE_NAME, SpoolLock, acquire_spool_lock, try_acquire_spool_lock};
pub use relocate::{RelocateMethod, Relocation, destination_for, plan_relocation, relocate};
pub use scan::{SpoolEntry, SpoolScan};

//! I/O error helpers.
//!
//! Provides small adapters that turn an io::Error into the typed error taxonomy
//! (`RecoverError`) when the failure kind is one callers branch on, and into an
//! anyhow error with actionable hints otherwise.
//!
//! Usage:
//!   fs::read_dir(dir).map_err(io_error_with_help("list output spool", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

use crate::errors::RecoverError;

/// Format a human-friendly message with op/path plus platform-aware hints.
pub(crate) fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" (permission denied; check ownership and write permissions)");
                }
                libc::EXDEV => {
                    msg.push_str(" (cross-filesystem; atomic rename not possible)");
                }
                libc::EBUSY => {
                    msg.push_str(" (resource busy; ensure no other process holds the file)");
                }
                libc::ENOENT => {
                    msg.push_str(" (path not found; verify it exists)");
                }
                libc::EEXIST => {
                    msg.push_str(" (already exists)");
                }
                libc::ENOSPC => {
                    msg.push_str(" (insufficient space on device)");
                }
                libc::EROFS => {
                    msg.push_str(" (read-only filesystem; cannot write here)");
                }
                libc::ENOTDIR => {
                    msg.push_str(" (a path component is not a directory)");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" (access denied; check permissions)"), // ERROR_ACCESS_DENIED
                17 => msg.push_str(" (not same device; cross-filesystem move)"), // ERROR_NOT_SAME_DEVICE
                32 => msg.push_str(" (sharing violation; file is in use)"), // ERROR_SHARING_VIOLATION
                2 | 3 => msg.push_str(" (path not found; verify it exists)"),
                80 | 183 => msg.push_str(" (already exists)"),
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    }

    msg
}

fn is_permission_error(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        return code == libc::EROFS;
    }
    false
}

/// Map an io::Error from `op` on `path` into an anyhow error whose root cause is a
/// `RecoverError` for the kinds the taxonomy names.
pub(crate) fn classify_io(op: &str, path: &Path, e: io::Error) -> anyhow::Error {
    if e.kind() == io::ErrorKind::NotFound {
        return RecoverError::NotFound { path: path.to_path_buf() }.into();
    }
    if is_permission_error(&e) {
        return RecoverError::PermissionDenied {
            path: path.to_path_buf(),
            context: build_message(op, path, &e),
        }
        .into();
    }
    anyhow!(build_message(op, path, &e))
}

/// Adapter for anyhow::Result code.
/// Returns a closure suitable for `.map_err(...)` that classifies io::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| classify_io(op, path, e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_becomes_typed() {
        let e = io::Error::from(io::ErrorKind::NotFound);
        let err = io_error_with_help("stat", Path::new("/nope"))(e);
        match err.downcast_ref::<RecoverError>() {
            Some(RecoverError::NotFound { path }) => assert_eq!(path, Path::new("/nope")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn permission_denied_keeps_context() {
        let e = io::Error::from(io::ErrorKind::PermissionDenied);
        let err = io_error_with_help("rename", Path::new("/spool/a.message"))(e);
        match err.downcast_ref::<RecoverError>() {
            Some(RecoverError::PermissionDenied { context, .. }) => {
                assert!(context.contains("rename '/spool/a.message'"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn other_errors_carry_hint_and_code() {
        let e = io::Error::from_raw_os_error(libc::ENOSPC);
        let err = io_error_with_help("copy", Path::new("/spool/x"))(e);
        assert!(err.downcast_ref::<RecoverError>().is_none());
        let msg = err.to_string();
        assert!(msg.contains("insufficient space"));
        assert!(msg.contains(&format!("[os code: {}]", libc::ENOSPC)));
    }
}

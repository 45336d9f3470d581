use std::fs;

use spool_recover::fs_ops::{LOCK_FILE_NAME, acquire_spool_lock, try_acquire_spool_lock};
use spool_recover::{Config, RecoverError, recover};

fn setup() -> (tempfile::TempDir, Config) {
    let td = tempfile::tempdir().unwrap();
    let spool = td.path().join("spool");
    let out = td.path().join("out_spool");
    fs::create_dir_all(&spool).unwrap();
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("a.message"), b"a").unwrap();
    (td, Config::new(spool, out))
}

#[test]
fn try_lock_contended_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let first = try_acquire_spool_lock(dir.path()).unwrap().expect("first lock");
    assert!(try_acquire_spool_lock(dir.path()).unwrap().is_none());
    drop(first);
    assert!(try_acquire_spool_lock(dir.path()).unwrap().is_some());
}

#[test]
fn concurrent_run_is_refused_while_lock_held() {
    let (_td, cfg) = setup();
    let _held = acquire_spool_lock(&cfg.out_spool_dir).unwrap();

    let err = recover(&cfg).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RecoverError>(),
        Some(RecoverError::Locked { .. })
    ));
    assert!(cfg.out_spool_dir.join("a.message").exists());
}

#[test]
fn disabled_lock_ignores_holder() {
    let (_td, mut cfg) = setup();
    let _held = acquire_spool_lock(&cfg.out_spool_dir).unwrap();
    cfg.lock = false;

    recover(&cfg).unwrap();

    assert!(cfg.spool_dir.join("a.message").exists());
    // the held sidecar is neither moved nor removed by an unlocked run
    assert!(cfg.out_spool_dir.join(LOCK_FILE_NAME).exists());
}

/// Many contenders acquiring and releasing in a tight loop never overlap.
#[cfg(unix)]
#[test]
fn lock_holders_never_overlap() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let dir = tempfile::tempdir().unwrap();
    let inside = Arc::new(AtomicUsize::new(0));
    let acquired = Arc::new(AtomicUsize::new(0));

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let dir = dir.path().to_path_buf();
            let inside = Arc::clone(&inside);
            let acquired = Arc::clone(&acquired);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    if let Some(lock) = try_acquire_spool_lock(&dir).unwrap() {
                        let before = inside.fetch_add(1, Ordering::SeqCst);
                        assert_eq!(before, 0, "two holders at once");
                        acquired.fetch_add(1, Ordering::SeqCst);
                        std::thread::yield_now();
                        inside.fetch_sub(1, Ordering::SeqCst);
                        drop(lock);
                    }
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    assert!(acquired.load(Ordering::SeqCst) > 0);
    assert!(!dir.path().join(LOCK_FILE_NAME).exists());
}

#![cfg(target_os = "linux")]

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use spool_recover::fs_ops::relocate;
use spool_recover::{Config, CrossDevicePolicy, RecoverError, RelocateMethod};
use tempfile::TempDir;

/// Two temp dirs on different filesystems, or None when the host offers only one.
fn split_devices() -> Option<(TempDir, TempDir)> {
    let out_root = tempfile::tempdir().ok()?;
    let out_dev = fs::metadata(out_root.path()).ok()?.dev();
    let candidates = [PathBuf::from("/dev/shm"), PathBuf::from(env!("CARGO_TARGET_TMPDIR"))];
    for base in candidates {
        let Ok(meta) = fs::metadata(&base) else { continue };
        if meta.dev() == out_dev {
            continue;
        }
        if let Ok(spool_root) = tempfile::tempdir_in(&base) {
            return Some((out_root, spool_root));
        }
    }
    None
}

fn spools(out_root: &Path, spool_root: &Path) -> Config {
    let out = out_root.join("out_spool");
    let spool = spool_root.join("spool");
    fs::create_dir_all(&out).unwrap();
    fs::create_dir_all(&spool).unwrap();
    Config::new(spool, out)
}

#[test]
fn cross_device_fail_policy_reports_and_keeps_source() {
    let Some((out_root, spool_root)) = split_devices() else {
        eprintln!("skipping: no second filesystem available");
        return;
    };
    let mut cfg = spools(out_root.path(), spool_root.path());
    cfg.cross_device = CrossDevicePolicy::Fail;
    let src = cfg.out_spool_dir.join("a.message");
    fs::write(&src, b"alpha").unwrap();

    let err = relocate(&src, &cfg.spool_dir, &cfg).unwrap_err();

    match err.downcast_ref::<RecoverError>() {
        Some(RecoverError::CrossDevice { src: s, dest }) => {
            assert_eq!(s, &src);
            assert_eq!(dest, &cfg.spool_dir.join("a.message"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fs::read(&src).unwrap(), b"alpha");
    assert_eq!(fs::read_dir(&cfg.spool_dir).unwrap().count(), 0);
}

#[test]
fn cross_device_copy_policy_moves_bytes() {
    let Some((out_root, spool_root)) = split_devices() else {
        eprintln!("skipping: no second filesystem available");
        return;
    };
    let cfg = spools(out_root.path(), spool_root.path());
    let src = cfg.out_spool_dir.join("a.message");
    let body: Vec<u8> = (0..300_000u32).map(|i| (i % 253) as u8).collect();
    fs::write(&src, &body).unwrap();

    let r = relocate(&src, &cfg.spool_dir, &cfg).unwrap().expect("relocated");

    assert_eq!(r.method, RelocateMethod::Copy);
    assert_eq!(r.dest, cfg.spool_dir.join("a.message"));
    assert!(!src.exists());
    assert_eq!(fs::read(&r.dest).unwrap(), body);
    // only the message itself lands in the input spool
    assert_eq!(fs::read_dir(&cfg.spool_dir).unwrap().count(), 1);
}

#![cfg(target_os = "linux")]

use spool_recover::{Config, RecoverError, recover};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tempfile::tempdir;

/// A read-only input spool surfaces as a typed permission error and moves nothing.
#[test]
fn readonly_spool_yields_permission_denied() {
    // Root bypasses permission checks; the test would not behave as expected.
    unsafe {
        if libc::geteuid() == 0 {
            eprintln!("skipping: running as root");
            return;
        }
    }

    let td = tempdir().expect("tempdir");
    let out = td.path().join("out_spool");
    let spool = td.path().join("spool");
    fs::create_dir_all(&out).unwrap();
    fs::create_dir_all(&spool).unwrap();
    fs::write(out.join("a.message"), b"a").unwrap();
    fs::set_permissions(&spool, fs::Permissions::from_mode(0o555)).unwrap();

    let err = recover(&Config::new(&spool, &out)).expect_err("expected permission denied");

    // Restore permissions so tempdir cleanup can remove the directory.
    let _ = fs::set_permissions(&spool, fs::Permissions::from_mode(0o755));

    match err.downcast_ref::<RecoverError>() {
        Some(RecoverError::PermissionDenied { path, context }) => {
            assert_eq!(path, &spool);
            assert!(context.contains("[os code: 13]"), "unexpected context: {context}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(out.join("a.message").exists());
}

/// An empty output spool the process cannot write to is still a successful no-op.
#[test]
fn readonly_empty_out_spool_succeeds() {
    unsafe {
        if libc::geteuid() == 0 {
            eprintln!("skipping: running as root");
            return;
        }
    }

    let td = tempdir().expect("tempdir");
    let out = td.path().join("out_spool");
    let spool = td.path().join("spool");
    fs::create_dir_all(&out).unwrap();
    fs::create_dir_all(&spool).unwrap();
    fs::write(out.join("readme.txt"), b"notes").unwrap();
    fs::set_permissions(&out, fs::Permissions::from_mode(0o555)).unwrap();

    let result = recover(&Config::new(&spool, &out));

    let _ = fs::set_permissions(&out, fs::Permissions::from_mode(0o755));

    let report = result.expect("empty read-only spool should succeed");
    assert!(report.is_empty());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
}

use std::fs;

use spool_recover::{CollisionPolicy, Config, RecoverError, recover};
use tempfile::tempdir;

fn setup() -> (tempfile::TempDir, Config) {
    let td = tempdir().unwrap();
    let spool = td.path().join("spool");
    let out = td.path().join("out_spool");
    fs::create_dir_all(&spool).unwrap();
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("dup.message"), b"from out_spool").unwrap();
    fs::write(spool.join("dup.message"), b"already queued").unwrap();
    (td, Config::new(spool, out))
}

#[test]
fn default_policy_fails_and_names_destination() {
    let (_td, cfg) = setup();

    let err = recover(&cfg).expect_err("collision should abort");

    match err.downcast_ref::<RecoverError>() {
        Some(RecoverError::Collision { dest }) => {
            assert_eq!(dest, &cfg.spool_dir.join("dup.message"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(format!("{err:#}").contains("dup.message"));
    assert_eq!(fs::read(cfg.spool_dir.join("dup.message")).unwrap(), b"already queued");
    assert_eq!(fs::read(cfg.out_spool_dir.join("dup.message")).unwrap(), b"from out_spool");
}

#[test]
fn skip_policy_leaves_source_in_place() {
    let (_td, mut cfg) = setup();
    cfg.on_collision = CollisionPolicy::Skip;
    fs::write(cfg.out_spool_dir.join("other.message"), b"x").unwrap();

    let report = recover(&cfg).unwrap();

    assert_eq!(report.relocations.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(cfg.out_spool_dir.join("dup.message").exists());
    assert!(cfg.spool_dir.join("other.message").exists());
}

#[test]
fn overwrite_policy_replaces_destination() {
    let (_td, mut cfg) = setup();
    cfg.on_collision = CollisionPolicy::Overwrite;

    recover(&cfg).unwrap();

    assert!(!cfg.out_spool_dir.join("dup.message").exists());
    assert_eq!(fs::read(cfg.spool_dir.join("dup.message")).unwrap(), b"from out_spool");
}

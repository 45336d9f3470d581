use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serial_test::serial;
use spool_recover::{Config, RecoverError, recover, shutdown};
use tempfile::tempdir;

fn names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn seeded(root: &Path) -> Config {
    let spool = root.join("spool");
    let out = root.join("out_spool");
    fs::create_dir_all(&spool).unwrap();
    fs::create_dir_all(&out).unwrap();
    for n in ["a.message", "b.message", "c.message", "d.message"] {
        fs::write(out.join(n), n.as_bytes()).unwrap();
    }
    Config::new(spool, out)
}

/// A run stopped after a strict subset leaves a state a second run completes.
#[test]
#[serial]
fn second_run_moves_exactly_the_rest() {
    let td = tempdir().unwrap();
    let cfg = seeded(td.path());
    // Simulate the first run having moved two entries before dying.
    for n in ["a.message", "c.message"] {
        fs::rename(cfg.out_spool_dir.join(n), cfg.spool_dir.join(n)).unwrap();
    }

    let report = recover(&cfg).unwrap();

    let mut moved: Vec<String> = report
        .relocations
        .iter()
        .map(|r| r.dest.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    moved.sort();
    assert_eq!(moved, vec!["b.message", "d.message"]);
    assert!(names(&cfg.out_spool_dir).is_empty());
    assert_eq!(names(&cfg.spool_dir).len(), 4);
    for n in names(&cfg.spool_dir) {
        assert_eq!(fs::read(cfg.spool_dir.join(&n)).unwrap(), n.as_bytes());
    }
}

#[test]
#[serial]
fn interrupted_run_then_rerun_recovers_everything() {
    let td = tempdir().unwrap();
    let cfg = seeded(td.path());

    shutdown::request();
    let err = recover(&cfg).unwrap_err();
    shutdown::reset();
    assert!(matches!(
        err.downcast_ref::<RecoverError>(),
        Some(RecoverError::Interrupted)
    ));
    assert_eq!(names(&cfg.out_spool_dir).len(), 4);

    recover(&cfg).unwrap();
    assert!(names(&cfg.out_spool_dir).is_empty());
    assert_eq!(names(&cfg.spool_dir).len(), 4);
}

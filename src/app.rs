//! Application orchestrator.
//! Loads/merges config, initializes logging, installs signal handlers, then lists or
//! recovers the output spool.

use anyhow::Result;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

use spool_recover::cli::Args;
use spool_recover::output as out;
use spool_recover::{
    CONFIG_ENV_VAR, RecoverError, RecoverReport, default_config_path, load_config, recover,
    scan, shutdown,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location(&args);
        return Ok(());
    }

    // Build config (may read XML). CLI args override config values.
    let (mut cfg, source) = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json)?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; stopping after the current file...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        }) {
            warn!(error = %e, "could not install signal handler");
        }
    }

    debug!(config = ?cfg, source = ?source, "starting spool_recover");

    let result = if args.list {
        list(&cfg)
    } else {
        recover(&cfg).map(|report| print_dry_run(&report))
    };

    if let Err(e) = &result {
        log_failure(e);
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn print_config_location(args: &Args) {
    if let Some(p) = &args.config {
        out::print_info(&format!("Using --config (explicit):\n  {}", p.display()));
        return;
    }
    if let Ok(p) = std::env::var(CONFIG_ENV_VAR)
        && !p.is_empty()
    {
        out::print_info(&format!("Using {CONFIG_ENV_VAR} (explicit):\n  {p}"));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default spool_recover config path:\n  {}", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there; built-in defaults are used.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}

fn list(cfg: &spool_recover::Config) -> Result<()> {
    for entry in scan(cfg)? {
        out::print_user(&entry?.path.display().to_string());
    }
    Ok(())
}

fn print_dry_run(report: &RecoverReport) {
    if !report.dry_run {
        return;
    }
    for r in &report.relocations {
        out::print_user(&format!(
            "Dry-run: would move '{}' -> '{}'",
            r.src.display(),
            r.dest.display()
        ));
    }
    for s in &report.skipped {
        out::print_user(&format!(
            "Dry-run: would skip '{}' ('{}' exists)",
            s.src.display(),
            s.dest.display()
        ));
    }
}

fn log_failure(e: &anyhow::Error) {
    match e.downcast_ref::<RecoverError>() {
        Some(re) => match re.path() {
            Some(path) => {
                error!(code = re.code(), kind = re.kind(), path = %path.display(), error = %e, "Recovery failed")
            }
            None => error!(code = re.code(), kind = re.kind(), "Recovery failed"),
        },
        None => error!(error = ?e, "Recovery failed"),
    }
}

use std::process::ExitCode;

use spool_recover::RecoverError;
use spool_recover::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = spool_recover::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            let code = e.downcast_ref::<RecoverError>().map_or(1, RecoverError::code);
            ExitCode::from(code)
        }
    }
}

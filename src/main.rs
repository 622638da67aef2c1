//! partnerlink binary entry point.

use std::process::ExitCode;

use partnerlink::cli;
use partnerlink::ui::output;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

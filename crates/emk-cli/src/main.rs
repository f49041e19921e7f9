use emk_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Log file under the XDG state dir; stderr if that is not writable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match CliCommand::run_from_args().await {
        Ok(true) => {}
        // Some items failed; the summary has already been printed.
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("emk error: {:#}", err);
            std::process::exit(1);
        }
    }
}

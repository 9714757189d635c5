use std::process::ExitCode;

use aws_exports_tools::config::{self, ScrubOptions};
use aws_exports_tools::vcs::{self, Git, COMMIT_MESSAGE};
use aws_exports_tools::{logging, scrub, Error};
use clap::Parser;
use dialoguer::Confirm;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    let options = ScrubOptions::parse();
    logging::init(env!("CARGO_CRATE_NAME"), options.verbose);

    return match run(options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error: {}", err);
            ExitCode::FAILURE
        }
    };
}

fn run(options: ScrubOptions) -> Result<(), Error> {
    let options = config::validated(options)?;
    let path = options.config_path();
    info!("Updating {} with dummy values", path.display());

    let outcome = scrub::scrub_file(&path)?;
    debug!("Replaced {}", outcome.replaced.join(", "));
    info!("Updated {} with dummy values successfully", path.display());

    let answer = Confirm::new()
        .with_prompt("Do you want to commit these changes to git?")
        .default(false)
        .interact();
    if !vcs::accepted(answer) {
        info!("Changes left uncommitted");
        return Ok(());
    }

    Git::for_config(&path).commit_file(&path, COMMIT_MESSAGE)?;
    info!("Changes committed to git successfully");
    return Ok(());
}

use std::process::ExitCode;

use aws_exports_tools::config::{self, DiscoverOptions};
use aws_exports_tools::{aws, logging, pipeline, Error};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let options = DiscoverOptions::parse();
    logging::init(env!("CARGO_CRATE_NAME"), options.verbose);

    return match run(options).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error: {}", err);
            ExitCode::FAILURE
        }
    };
}

async fn run(options: DiscoverOptions) -> Result<(), Error> {
    let options = config::validated(options)?;
    debug!(
        "Discovering AWS resources for {} in {}...",
        options.app_name, options.region
    );

    let sdk_config = aws::load_config(&options.region).await;
    let catalog = aws::AwsCatalog::new(&sdk_config);
    pipeline::write_exports(&catalog, &options.app_name, &options.region, &options.output).await?;

    info!("Successfully generated {}", options.output.display());
    return Ok(());
}

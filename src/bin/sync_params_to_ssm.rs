use std::process::ExitCode;

use aws_exports_tools::config::{self, SyncOptions};
use aws_exports_tools::pipeline::{self, SyncRequest};
use aws_exports_tools::{aws, logging, Error};
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let options = SyncOptions::parse();
    logging::init(env!("CARGO_CRATE_NAME"), options.verbose);

    return match run(options).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error: {}", err);
            ExitCode::FAILURE
        }
    };
}

async fn run(options: SyncOptions) -> Result<(), Error> {
    let options = config::validated(options)?;
    info!(
        "Discovering AWS resources for {} in {}...",
        options.app_name, options.region
    );

    let sdk_config = aws::load_config(&options.region).await;
    let catalog = aws::AwsCatalog::new(&sdk_config);
    let store = aws::SsmStore::new(&sdk_config);
    let request = SyncRequest {
        app_name: &options.app_name,
        region: &options.region,
        prefix: options.prefix(),
        kms_key_id: options.kms_key_id.as_deref(),
        dry_run: options.dry_run,
    };
    let report = pipeline::sync_parameters(&catalog, &store, &request).await?;

    if options.dry_run {
        info!("Dry run: {} parameters would be synced", report.simulated.len());
    } else {
        info!("Successfully synced all parameters to SSM Parameter Store");
    }
    return Ok(());
}

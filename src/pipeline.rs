//! The discover-then-write and discover-then-publish runs behind the
//! `discover-aws-resources` and `sync-params-to-ssm` binaries.

use std::path::Path;

use tracing::info;

use crate::discovery::{self, DiscoveredResources, ResourceCatalog};
use crate::exports::{self, AwsExports};
use crate::publish::{self, ParameterStore, PublishReport};
use crate::Error;

/// Discovers the application's resources and writes them to `output` as an
/// aws-exports.js module. Nothing is written unless every lookup succeeds.
pub async fn write_exports<C>(
    catalog: &C,
    app_name: &str,
    region: &str,
    output: &Path,
) -> Result<DiscoveredResources, Error>
where
    C: ResourceCatalog + Sync + ?Sized,
{
    let resources = discovery::discover(catalog, app_name, region).await?;

    let contents = exports::render(&AwsExports::from(&resources), &chrono::Local::now())?;
    exports::write(output, &contents)?;

    return Ok(resources);
}

pub struct SyncRequest<'a> {
    pub app_name: &'a str,
    pub region: &'a str,
    pub prefix: &'a str,
    pub kms_key_id: Option<&'a str>,
    pub dry_run: bool,
}

/// Discovers the application's resources and puts one parameter per value
/// under `request.prefix`. Discovery failures abort before any put; a failed
/// put is reported after the remaining puts have been attempted.
pub async fn sync_parameters<C, S>(
    catalog: &C,
    store: &S,
    request: &SyncRequest<'_>,
) -> Result<PublishReport, Error>
where
    C: ResourceCatalog + Sync + ?Sized,
    S: ParameterStore + Sync + ?Sized,
{
    let resources = discovery::discover(catalog, request.app_name, request.region).await?;

    info!("Syncing parameters to {}...", request.prefix);
    let parameters = publish::parameters(request.prefix, &resources, request.kms_key_id);
    let report = publish::publish(store, &parameters, request.dry_run).await;

    if !report.is_success() {
        let failed: Vec<&str> = report.failed.iter().map(|(name, _)| name.as_str()).collect();
        return Err(Error::Publish(failed.join(", ")));
    }

    return Ok(report);
}

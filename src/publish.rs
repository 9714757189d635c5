use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::discovery::DiscoveredResources;

#[derive(thiserror::Error, Debug, PartialEq, Clone)]
pub enum Error {
    #[error("Service error ocurred: {0}.")]
    ServiceError(String),

    #[error("Unknown error ocurred: {0}.")]
    UnknownError(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    Plain,
    Secure { key_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
    pub kind: ParameterKind,
}

/// A hierarchical key/value store. `put` overwrites any existing value.
#[async_trait]
pub trait ParameterStore {
    async fn put(&self, parameter: &Parameter) -> Result<(), Error>;
}

/// The parameters synced for a set of discovered resources, in write order.
pub fn parameters(
    prefix: &str,
    resources: &DiscoveredResources,
    kms_key_id: Option<&str>,
) -> Vec<Parameter> {
    let kind = match kms_key_id {
        Some(key_id) => ParameterKind::Secure {
            key_id: key_id.to_string(),
        },
        None => ParameterKind::Plain,
    };

    let entries = [
        ("cognito/user-pool-id", &resources.user_pool_id),
        ("cognito/app-client-id", &resources.app_client_id),
        ("cognito/identity-pool-id", &resources.identity_pool_id),
        ("appsync/endpoint", &resources.graphql_endpoint),
        ("s3/bucket-name", &resources.bucket_name),
        ("aws/region", &resources.region),
    ];

    return entries
        .into_iter()
        .map(|(path, value)| Parameter {
            name: format!("{}/{}", prefix, path),
            value: value.clone(),
            kind: kind.clone(),
        })
        .collect();
}

#[derive(Debug, Default, PartialEq)]
pub struct PublishReport {
    /// Parameters written to the store.
    pub written: Vec<String>,
    /// Parameters that would have been written in dry-run mode.
    pub simulated: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

impl PublishReport {
    pub fn is_success(&self) -> bool {
        return self.failed.is_empty();
    }
}

/// Writes every parameter in order. A failed write is recorded and the
/// remaining parameters are still attempted. With `dry_run` the store is
/// never called.
pub async fn publish<S>(store: &S, parameters: &[Parameter], dry_run: bool) -> PublishReport
where
    S: ParameterStore + Sync + ?Sized,
{
    let mut report = PublishReport::default();

    for parameter in parameters {
        if dry_run {
            info!("Would put parameter {} = {}", parameter.name, parameter.value);
            report.simulated.push(parameter.name.clone());
            continue;
        }

        match store.put(parameter).await {
            Ok(_) => {
                debug!("Added/updated parameter: {}", parameter.name);
                report.written.push(parameter.name.clone());
            }
            Err(err) => {
                error!("Error putting parameter {}: {}", parameter.name, err);
                report.failed.push((parameter.name.clone(), err));
            }
        }
    }

    return report;
}

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Service error ocurred: {0}.")]
    ServiceError(String),

    #[error("Unknown error ocurred: {0}.")]
    UnknownError(String),

    #[error("No {0} found for {1}")]
    NotFound(ResourceKind, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    UserPool,
    AppClient,
    IdentityPool,
    GraphqlApi,
    Bucket,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::UserPool => "Cognito User Pool",
            ResourceKind::AppClient => "App Client",
            ResourceKind::IdentityPool => "Identity Pool",
            ResourceKind::GraphqlApi => "AppSync API",
            ResourceKind::Bucket => "S3 bucket",
        };
        return f.write_str(name);
    }
}

/// A listed resource: its display name and the identifier the exports need.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    pub id: String,
}

impl Resource {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        return Self {
            name: name.into(),
            id: id.into(),
        };
    }
}

/// Listing operations over the services the application is deployed to.
/// Every listing returns resources in the order the service returned them.
#[async_trait]
pub trait ResourceCatalog {
    async fn user_pools(&self) -> Result<Vec<Resource>, Error>;

    /// Client ids of the given user pool.
    async fn user_pool_clients(&self, user_pool_id: &str) -> Result<Vec<String>, Error>;

    async fn identity_pools(&self) -> Result<Vec<Resource>, Error>;

    /// GraphQL APIs, identified by their `GRAPHQL` endpoint.
    async fn graphql_apis(&self) -> Result<Vec<Resource>, Error>;

    /// Bucket names. Name and id are the same for buckets.
    async fn buckets(&self) -> Result<Vec<Resource>, Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredResources {
    pub region: String,
    pub user_pool_id: String,
    pub app_client_id: String,
    pub identity_pool_id: String,
    pub graphql_endpoint: String,
    pub bucket_name: String,
}

/// Returns the first resource whose name contains `app_name`, ignoring case.
/// When several resources match, listing order decides.
pub fn find_by_name<'a>(resources: &'a [Resource], app_name: &str) -> Option<&'a Resource> {
    let needle = app_name.to_lowercase();
    return resources
        .iter()
        .find(|resource| resource.name.to_lowercase().contains(&needle));
}

fn require_by_name(
    resources: Vec<Resource>,
    kind: ResourceKind,
    app_name: &str,
) -> Result<String, Error> {
    return match find_by_name(&resources, app_name) {
        Some(resource) => Ok(resource.id.clone()),
        None => Err(Error::NotFound(kind, app_name.to_string())),
    };
}

/// Looks up every resource the exports need, one call after another. The
/// first lookup without a match aborts the run.
pub async fn discover<C>(
    catalog: &C,
    app_name: &str,
    region: &str,
) -> Result<DiscoveredResources, Error>
where
    C: ResourceCatalog + Sync + ?Sized,
{
    let user_pool_id = require_by_name(
        catalog.user_pools().await?,
        ResourceKind::UserPool,
        app_name,
    )?;
    debug!("Found User Pool ID: {}", user_pool_id);

    let clients = catalog.user_pool_clients(&user_pool_id).await?;
    let app_client_id = match clients.into_iter().next() {
        Some(client_id) => client_id,
        None => {
            return Err(Error::NotFound(
                ResourceKind::AppClient,
                format!("User Pool {}", user_pool_id),
            ))
        }
    };
    debug!("Found App Client ID: {}", app_client_id);

    let identity_pool_id = require_by_name(
        catalog.identity_pools().await?,
        ResourceKind::IdentityPool,
        app_name,
    )?;
    debug!("Found Identity Pool ID: {}", identity_pool_id);

    let graphql_endpoint = require_by_name(
        catalog.graphql_apis().await?,
        ResourceKind::GraphqlApi,
        app_name,
    )?;
    debug!("Found AppSync Endpoint: {}", graphql_endpoint);

    let bucket_name = require_by_name(catalog.buckets().await?, ResourceKind::Bucket, app_name)?;
    debug!("Found S3 Bucket: {}", bucket_name);

    return Ok(DiscoveredResources {
        region: region.to_string(),
        user_pool_id,
        app_client_id,
        identity_pool_id,
        graphql_endpoint,
        bucket_name,
    });
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{
        discover, find_by_name, DiscoveredResources, Error, Resource, ResourceCatalog,
        ResourceKind,
    };

    /// In-memory catalog that records which listings were requested.
    #[derive(Default)]
    pub(crate) struct StubCatalog {
        pub user_pools: Vec<Resource>,
        pub clients: Vec<String>,
        pub identity_pools: Vec<Resource>,
        pub apis: Vec<Resource>,
        pub buckets: Vec<Resource>,
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl StubCatalog {
        pub(crate) fn timelapse() -> Self {
            return Self {
                user_pools: vec![
                    Resource::new("other-app-users", "us-east-1_other"),
                    Resource::new("Timelapse-Users-dev", "us-east-1_AbCdEf123"),
                ],
                clients: vec![
                    String::from("4l1ce0cl1ent1d"),
                    String::from("second-client"),
                ],
                identity_pools: vec![Resource::new(
                    "timelapse_identity_dev",
                    "us-east-1:11111111-2222-3333-4444-555555555555",
                )],
                apis: vec![Resource::new(
                    "timelapse-api-dev",
                    "https://abc123.appsync-api.us-east-1.amazonaws.com/graphql",
                )],
                buckets: vec![
                    Resource::new("cdk-assets", "cdk-assets"),
                    Resource::new("timelapse-media-dev-1a2b3c", "timelapse-media-dev-1a2b3c"),
                ],
                calls: Mutex::new(vec![]),
            };
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        pub(crate) fn calls(&self) -> Vec<&'static str> {
            return self.calls.lock().unwrap().clone();
        }
    }

    #[async_trait]
    impl ResourceCatalog for StubCatalog {
        async fn user_pools(&self) -> Result<Vec<Resource>, Error> {
            self.record("user_pools");
            return Ok(self.user_pools.clone());
        }

        async fn user_pool_clients(&self, _user_pool_id: &str) -> Result<Vec<String>, Error> {
            self.record("user_pool_clients");
            return Ok(self.clients.clone());
        }

        async fn identity_pools(&self) -> Result<Vec<Resource>, Error> {
            self.record("identity_pools");
            return Ok(self.identity_pools.clone());
        }

        async fn graphql_apis(&self) -> Result<Vec<Resource>, Error> {
            self.record("graphql_apis");
            return Ok(self.apis.clone());
        }

        async fn buckets(&self) -> Result<Vec<Resource>, Error> {
            self.record("buckets");
            return Ok(self.buckets.clone());
        }
    }

    pub(crate) fn discovered() -> DiscoveredResources {
        return DiscoveredResources {
            region: String::from("us-east-1"),
            user_pool_id: String::from("us-east-1_AbCdEf123"),
            app_client_id: String::from("4l1ce0cl1ent1d"),
            identity_pool_id: String::from("us-east-1:11111111-2222-3333-4444-555555555555"),
            graphql_endpoint: String::from(
                "https://abc123.appsync-api.us-east-1.amazonaws.com/graphql",
            ),
            bucket_name: String::from("timelapse-media-dev-1a2b3c"),
        };
    }

    #[test]
    fn matches_substring_ignoring_case() {
        let resources = vec![
            Resource::new("billing", "1"),
            Resource::new("MyTimeLapseApp", "2"),
        ];

        let found = find_by_name(&resources, "timelapse").unwrap();
        assert_eq!("2", found.id);
        assert_eq!(None, find_by_name(&resources, "photos"));
    }

    #[test]
    fn first_match_wins() {
        let resources = vec![
            Resource::new("timelapse-prod", "prod"),
            Resource::new("timelapse-dev", "dev"),
        ];

        assert_eq!("prod", find_by_name(&resources, "timelapse").unwrap().id);
    }

    #[tokio::test]
    async fn discovers_all_resources() {
        let catalog = StubCatalog::timelapse();

        let result = discover(&catalog, "timelapse", "us-east-1").await;
        assert_eq!(Ok(discovered()), result);
        assert_eq!(
            vec!["user_pools", "user_pool_clients", "identity_pools", "graphql_apis", "buckets"],
            catalog.calls()
        );
    }

    #[tokio::test]
    async fn missing_identity_pool_stops_discovery() {
        let mut catalog = StubCatalog::timelapse();
        catalog.identity_pools = vec![Resource::new("unrelated", "us-east-1:0")];

        let result = discover(&catalog, "timelapse", "us-east-1").await;
        assert_eq!(
            Err(Error::NotFound(ResourceKind::IdentityPool, String::from("timelapse"))),
            result
        );
        assert_eq!(
            vec!["user_pools", "user_pool_clients", "identity_pools"],
            catalog.calls()
        );
    }

    #[tokio::test]
    async fn user_pool_without_clients_is_not_found() {
        let mut catalog = StubCatalog::timelapse();
        catalog.clients = vec![];

        let result = discover(&catalog, "timelapse", "us-east-1").await;
        match result.err().unwrap() {
            Error::NotFound(ResourceKind::AppClient, searched) => {
                assert_eq!("User Pool us-east-1_AbCdEf123", searched)
            }
            _ => panic!("Expected `NotFound` error"),
        }
    }

    #[test]
    fn not_found_names_the_resource_kind() {
        let error = Error::NotFound(ResourceKind::Bucket, String::from("timelapse"));
        assert_eq!("No S3 bucket found for timelapse", error.to_string());
    }
}

//! AWS SDK backed implementations of [`ResourceCatalog`] and [`ParameterStore`].

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_ssm::error::{DisplayErrorContext, SdkError};
use aws_sdk_ssm::types::ParameterType;
use aws_types::region::Region;
use aws_types::SdkConfig;
use tracing::trace;

use crate::discovery::{self, Resource, ResourceCatalog};
use crate::publish::{self, Parameter, ParameterKind, ParameterStore};

// Largest page size the Cognito listing operations accept.
const COGNITO_PAGE_SIZE: i32 = 60;

pub async fn load_config(region: &str) -> SdkConfig {
    let region_provider =
        RegionProviderChain::first_try(Region::new(region.to_string())).or_default_provider();

    return aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await;
}

enum SdkFailure {
    Service(String),
    Other(String),
}

fn classify<E, R>(error: SdkError<E, R>) -> SdkFailure
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    return match error {
        SdkError::ServiceError(context) => {
            SdkFailure::Service(DisplayErrorContext(context.err()).to_string())
        }
        other => SdkFailure::Other(DisplayErrorContext(&other).to_string()),
    };
}

impl From<SdkFailure> for discovery::Error {
    fn from(failure: SdkFailure) -> Self {
        return match failure {
            SdkFailure::Service(message) => discovery::Error::ServiceError(message),
            SdkFailure::Other(message) => discovery::Error::UnknownError(message),
        };
    }
}

impl From<SdkFailure> for publish::Error {
    fn from(failure: SdkFailure) -> Self {
        return match failure {
            SdkFailure::Service(message) => publish::Error::ServiceError(message),
            SdkFailure::Other(message) => publish::Error::UnknownError(message),
        };
    }
}

pub struct AwsCatalog {
    cognito_idp: aws_sdk_cognitoidentityprovider::Client,
    cognito_identity: aws_sdk_cognitoidentity::Client,
    appsync: aws_sdk_appsync::Client,
    s3: aws_sdk_s3::Client,
}

impl AwsCatalog {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        return Self {
            cognito_idp: aws_sdk_cognitoidentityprovider::Client::new(sdk_config),
            cognito_identity: aws_sdk_cognitoidentity::Client::new(sdk_config),
            appsync: aws_sdk_appsync::Client::new(sdk_config),
            s3: aws_sdk_s3::Client::new(sdk_config),
        };
    }
}

#[async_trait]
impl ResourceCatalog for AwsCatalog {
    async fn user_pools(&self) -> Result<Vec<Resource>, discovery::Error> {
        let mut pools = vec![];
        let mut next_token = None;

        loop {
            let page = self
                .cognito_idp
                .list_user_pools()
                .max_results(COGNITO_PAGE_SIZE)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(classify)?;

            pools.extend(page.user_pools().iter().filter_map(|pool| {
                Some(Resource::new(pool.name()?, pool.id()?))
            }));

            next_token = page.next_token().map(String::from);
            if next_token.is_none() {
                break;
            }
        }

        trace!("Listed {} user pools", pools.len());
        return Ok(pools);
    }

    async fn user_pool_clients(&self, user_pool_id: &str) -> Result<Vec<String>, discovery::Error> {
        let mut clients = vec![];
        let mut next_token = None;

        loop {
            let page = self
                .cognito_idp
                .list_user_pool_clients()
                .user_pool_id(user_pool_id)
                .max_results(COGNITO_PAGE_SIZE)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(classify)?;

            clients.extend(
                page.user_pool_clients()
                    .iter()
                    .filter_map(|client| client.client_id().map(String::from)),
            );

            next_token = page.next_token().map(String::from);
            if next_token.is_none() {
                break;
            }
        }

        trace!("Listed {} clients of {}", clients.len(), user_pool_id);
        return Ok(clients);
    }

    async fn identity_pools(&self) -> Result<Vec<Resource>, discovery::Error> {
        let mut pools = vec![];
        let mut next_token = None;

        loop {
            let page = self
                .cognito_identity
                .list_identity_pools()
                .max_results(COGNITO_PAGE_SIZE)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(classify)?;

            pools.extend(page.identity_pools().iter().filter_map(|pool| {
                Some(Resource::new(
                    pool.identity_pool_name()?,
                    pool.identity_pool_id()?,
                ))
            }));

            next_token = page.next_token().map(String::from);
            if next_token.is_none() {
                break;
            }
        }

        trace!("Listed {} identity pools", pools.len());
        return Ok(pools);
    }

    async fn graphql_apis(&self) -> Result<Vec<Resource>, discovery::Error> {
        let mut apis = vec![];
        let mut next_token = None;

        loop {
            let page = self
                .appsync
                .list_graphql_apis()
                .set_next_token(next_token)
                .send()
                .await
                .map_err(classify)?;

            // APIs without a GRAPHQL endpoint cannot be written to the exports.
            apis.extend(page.graphql_apis().iter().filter_map(|api| {
                let endpoint = api.uris()?.get("GRAPHQL")?;
                Some(Resource::new(api.name()?, endpoint.as_str()))
            }));

            next_token = page.next_token().map(String::from);
            if next_token.is_none() {
                break;
            }
        }

        trace!("Listed {} GraphQL APIs", apis.len());
        return Ok(apis);
    }

    async fn buckets(&self) -> Result<Vec<Resource>, discovery::Error> {
        let result = self.s3.list_buckets().send().await.map_err(classify)?;

        let buckets: Vec<Resource> = result
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name())
            .map(|name| Resource::new(name, name))
            .collect();

        trace!("Listed {} buckets", buckets.len());
        return Ok(buckets);
    }
}

pub struct SsmStore {
    client: aws_sdk_ssm::Client,
}

impl SsmStore {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        return Self {
            client: aws_sdk_ssm::Client::new(sdk_config),
        };
    }
}

#[async_trait]
impl ParameterStore for SsmStore {
    async fn put(&self, parameter: &Parameter) -> Result<(), publish::Error> {
        let (parameter_type, key_id) = match &parameter.kind {
            ParameterKind::Plain => (ParameterType::String, None),
            ParameterKind::Secure { key_id } => (ParameterType::SecureString, Some(key_id.clone())),
        };

        self.client
            .put_parameter()
            .name(&parameter.name)
            .value(&parameter.value)
            .r#type(parameter_type)
            .set_key_id(key_id)
            .overwrite(true)
            .send()
            .await
            .map_err(classify)?;

        return Ok(());
    }
}

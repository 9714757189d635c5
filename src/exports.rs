use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::discovery::DiscoveredResources;

pub const AUTHENTICATION_TYPE: &str = "AMAZON_COGNITO_USER_POOLS";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Failed to serialize the configuration: {0}")]
    SerializationError(String),

    #[error("Failed to write {0}: {1}")]
    WriteError(String, String),
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct OAuth {}

/// The `awsmobile` object exported from aws-exports.js. Field order is the
/// key order of the generated file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwsExports {
    pub aws_project_region: String,
    pub aws_cognito_identity_pool_id: String,
    pub aws_cognito_region: String,
    pub aws_user_pools_id: String,
    pub aws_user_pools_web_client_id: String,
    pub oauth: OAuth,
    #[serde(rename = "aws_appsync_graphqlEndpoint")]
    pub aws_appsync_graphql_endpoint: String,
    pub aws_appsync_region: String,
    #[serde(rename = "aws_appsync_authenticationType")]
    pub aws_appsync_authentication_type: String,
    pub aws_user_files_s3_bucket: String,
    pub aws_user_files_s3_bucket_region: String,
}

impl From<&DiscoveredResources> for AwsExports {
    fn from(resources: &DiscoveredResources) -> Self {
        return Self {
            aws_project_region: resources.region.clone(),
            aws_cognito_identity_pool_id: resources.identity_pool_id.clone(),
            aws_cognito_region: resources.region.clone(),
            aws_user_pools_id: resources.user_pool_id.clone(),
            aws_user_pools_web_client_id: resources.app_client_id.clone(),
            oauth: OAuth::default(),
            aws_appsync_graphql_endpoint: resources.graphql_endpoint.clone(),
            aws_appsync_region: resources.region.clone(),
            aws_appsync_authentication_type: AUTHENTICATION_TYPE.to_string(),
            aws_user_files_s3_bucket: resources.bucket_name.clone(),
            aws_user_files_s3_bucket_region: resources.region.clone(),
        };
    }
}

fn to_json(exports: &AwsExports) -> Result<String, Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);

    if let Err(error) = exports.serialize(&mut serializer) {
        return Err(Error::SerializationError(error.to_string()));
    }

    return String::from_utf8(buffer).map_err(|error| Error::SerializationError(error.to_string()));
}

pub fn render<Tz>(exports: &AwsExports, generated_at: &DateTime<Tz>) -> Result<String, Error>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let object = to_json(exports)?;

    return Ok(format!(
        "/* eslint-disable */
// WARNING: DO NOT EDIT. This file is automatically generated by discover-aws-resources
// This file was generated on {}

const awsmobile = {};

export default awsmobile;
",
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        object
    ));
}

/// Writes `contents` to `path`, creating missing parent directories and
/// replacing any existing file.
pub fn write(path: &Path, contents: &str) -> Result<(), Error> {
    let to_write_error =
        |error: std::io::Error| Error::WriteError(path.display().to_string(), error.to_string());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(to_write_error)?;
        }
    }

    fs::write(path, contents).map_err(to_write_error)?;

    return Ok(());
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use tempfile::tempdir;

    use super::{render, write, AwsExports};
    use crate::discovery::tests::discovered;
    use crate::scrub;

    fn rendered() -> String {
        let exports = AwsExports::from(&discovered());
        let generated_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        return render(&exports, &generated_at).unwrap();
    }

    #[test]
    fn renders_header_and_default_export() {
        let contents = rendered();

        assert!(contents.starts_with(
            "/* eslint-disable */\n// WARNING: DO NOT EDIT. This file is automatically generated"
        ));
        assert!(contents.contains("// This file was generated on 2024-03-01 12:30:05\n"));
        assert!(contents
            .contains("const awsmobile = {\n    \"aws_project_region\": \"us-east-1\",\n"));
        assert!(contents.ends_with("};\n\nexport default awsmobile;\n"));
    }

    #[test]
    fn exported_object_has_exactly_the_configuration_keys() {
        let contents = rendered();
        let embedded = scrub::extract(&contents).unwrap();

        let expected = json!({
            "aws_project_region": "us-east-1",
            "aws_cognito_identity_pool_id": "us-east-1:11111111-2222-3333-4444-555555555555",
            "aws_cognito_region": "us-east-1",
            "aws_user_pools_id": "us-east-1_AbCdEf123",
            "aws_user_pools_web_client_id": "4l1ce0cl1ent1d",
            "oauth": {},
            "aws_appsync_graphqlEndpoint":
                "https://abc123.appsync-api.us-east-1.amazonaws.com/graphql",
            "aws_appsync_region": "us-east-1",
            "aws_appsync_authenticationType": "AMAZON_COGNITO_USER_POOLS",
            "aws_user_files_s3_bucket": "timelapse-media-dev-1a2b3c",
            "aws_user_files_s3_bucket_region": "us-east-1"
        });
        assert_eq!(expected, Value::Object(embedded.config.clone()));

        let keys: Vec<&String> = embedded.config.keys().collect();
        assert_eq!("aws_project_region", keys[0]);
        assert_eq!("aws_user_files_s3_bucket_region", keys[10]);
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app").join("src").join("aws-exports.js");

        let result = write(&file_path, "export default {};\n");
        assert_eq!(Ok(()), result);
        assert_eq!("export default {};\n", fs::read_to_string(&file_path).unwrap());
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("aws-exports.js");
        fs::write(&file_path, "old contents that are longer than the new ones").unwrap();

        write(&file_path, "new").unwrap();
        assert_eq!("new", fs::read_to_string(&file_path).unwrap());
    }

    #[test]
    fn write_into_a_file_path_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("src");
        fs::write(&blocker, "").unwrap();

        let result = write(&blocker.join("aws-exports.js"), "x");
        assert_eq!(true, result.is_err());
    }
}

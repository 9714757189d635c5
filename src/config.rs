use clap::Parser;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use validator::{Validate, ValidationError};

pub const DEFAULT_CONFIG_FILE: &str = "~/Documents/timelapse/src/aws-exports.js";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Validation errors: {0}")]
    ValidationError(String),
}

/// Discover AWS resources for the application and generate an aws-exports.js file.
#[derive(Debug, Parser, Validate)]
#[command(name = "discover-aws-resources", version)]
pub struct DiscoverOptions {
    /// Application name, matched against resource names.
    #[arg(long)]
    #[validate(length(min = 1))]
    pub app_name: String,

    /// AWS region to search in.
    #[arg(long, env = "AWS_REGION")]
    #[validate(custom = "validate_region")]
    pub region: String,

    /// Output file path.
    #[arg(long)]
    #[validate(custom = "validate_script_file")]
    pub output: PathBuf,

    /// Enable verbose output.
    #[arg(long)]
    pub verbose: bool,
}

/// Sync discovered AWS resources to Systems Manager Parameter Store.
#[derive(Debug, Parser, Validate)]
#[command(name = "sync-params-to-ssm", version)]
pub struct SyncOptions {
    /// Application name, matched against resource names.
    #[arg(long)]
    #[validate(length(min = 1))]
    pub app_name: String,

    /// AWS region to search in and write parameters to.
    #[arg(long, env = "AWS_REGION")]
    #[validate(custom = "validate_region")]
    pub region: String,

    /// Parameter Store prefix (e.g. /timelapse/dev).
    #[arg(long)]
    #[validate(custom = "validate_prefix")]
    pub prefix: String,

    /// KMS key id for parameter encryption. Parameters are stored as
    /// SecureString when set.
    #[arg(long)]
    #[validate(length(min = 1))]
    pub kms_key_id: Option<String>,

    /// Report the parameters that would be written without writing them.
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output.
    #[arg(long)]
    pub verbose: bool,
}

impl SyncOptions {
    /// The prefix without a trailing slash.
    pub fn prefix(&self) -> &str {
        return self.prefix.trim_end_matches('/');
    }
}

/// Replace the values in a generated aws-exports.js with placeholders that
/// are safe to commit.
#[derive(Debug, Parser, Validate)]
#[command(name = "scrub-aws-config", version)]
pub struct ScrubOptions {
    /// Path to the aws-exports.js file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    #[validate(custom = "validate_script_path")]
    pub config_file: String,

    /// Enable verbose output.
    #[arg(long)]
    pub verbose: bool,
}

impl ScrubOptions {
    /// The config file path with a leading `~` expanded.
    pub fn config_path(&self) -> PathBuf {
        return PathBuf::from(shellexpand::tilde(&self.config_file).into_owned());
    }
}

pub fn validated<T: Validate>(options: T) -> Result<T, Error> {
    return match options.validate() {
        Ok(_) => Ok(options),
        Err(error) => Err(Error::ValidationError(error.to_string())),
    };
}

fn region_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    return PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d+$").expect("region pattern is valid")
    });
}

fn validate_region(region: &str) -> Result<(), ValidationError> {
    if !region_pattern().is_match(region) {
        return Err(ValidationError::new(
            "The region has to look like `us-east-1`",
        ));
    }

    return Ok(());
}

fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    if !prefix.starts_with('/') {
        return Err(ValidationError::new(
            "The parameter prefix has to start with `/`",
        ));
    }
    if prefix.trim_end_matches('/').is_empty() {
        return Err(ValidationError::new(
            "The parameter prefix needs at least one path segment",
        ));
    }

    return Ok(());
}

fn validate_script_file(path: &PathBuf) -> Result<(), ValidationError> {
    return validate_script_extension(path);
}

fn validate_script_path(path: &str) -> Result<(), ValidationError> {
    return validate_script_extension(Path::new(path));
}

fn validate_script_extension(path: &Path) -> Result<(), ValidationError> {
    let file_extension = match path.extension() {
        Some(extension) => extension,
        None => {
            return Err(ValidationError::new(
                "Unable to parse the extension of the JavaScript file location",
            ))
        }
    };
    if file_extension != "js" {
        return Err(ValidationError::new(
            "The JavaScript file location has to end with `.js`",
        ));
    }

    return Ok(());
}

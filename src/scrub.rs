use std::ffi::OsString;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::{fs, io};

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Values that are safe to commit, keyed by the configuration field they replace.
pub const PLACEHOLDERS: &[(&str, &str)] = &[
    ("aws_project_region", "us-east-1"),
    (
        "aws_cognito_identity_pool_id",
        "us-east-1:00000000-0000-0000-0000-000000000000",
    ),
    ("aws_cognito_region", "us-east-1"),
    ("aws_user_pools_id", "us-east-1_XXXXXXXXX"),
    ("aws_user_pools_web_client_id", "0000000000000000000000000"),
    (
        "aws_appsync_graphqlEndpoint",
        "https://example.appsync-api.us-east-1.amazonaws.com/graphql",
    ),
    ("aws_appsync_region", "us-east-1"),
    ("aws_appsync_authenticationType", "API_KEY"),
    ("aws_appsync_apiKey", "da2-xxxxxxxxxxxxxxxxxxxxxxxx"),
    ("aws_user_files_s3_bucket", "timelapse-media-dev-00000000"),
    ("aws_user_files_s3_bucket_region", "us-east-1"),
];

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("File {0} not found")]
    FileNotFound(String),

    #[error("Failed to read {0}: {1}")]
    ReadError(String, String),

    #[error("Could not find configuration object in {0}")]
    ObjectNotFound(String),

    #[error("Error parsing configuration: {0}")]
    ParseError(String),

    #[error("Backup file {0} already exists")]
    BackupExists(String),

    #[error("Failed to back up {0}: {1}")]
    BackupError(String, String),

    #[error("Failed to write {0}: {1}")]
    WriteError(String, String),
}

/// The object literal assigned by `const <name> = { ... };`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedConfig {
    pub name: String,
    /// Byte range of the object literal within the file.
    pub span: Range<usize>,
    pub config: Map<String, Value>,
}

#[derive(Debug, PartialEq)]
pub struct ScrubOutcome {
    pub backup_path: PathBuf,
    pub replaced: Vec<&'static str>,
}

fn assignment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    return PATTERN.get_or_init(|| {
        Regex::new(r"const\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(\{[^;]*\});")
            .expect("assignment pattern is valid")
    });
}

fn trailing_comma_patterns() -> &'static (Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex)> = OnceLock::new();
    return PATTERNS.get_or_init(|| {
        (
            Regex::new(r",\s*\}").expect("object pattern is valid"),
            Regex::new(r",\s*\]").expect("array pattern is valid"),
        )
    });
}

/// Strips trailing commas before `}` and `]`, which JavaScript allows and
/// JSON does not.
pub fn normalize_trailing_commas(object: &str) -> String {
    let (before_brace, before_bracket) = trailing_comma_patterns();
    let object = before_brace.replace_all(object, "}");
    return before_bracket.replace_all(&object, "]").into_owned();
}

pub fn extract(content: &str) -> Result<EmbeddedConfig, Error> {
    let captures = match assignment_pattern().captures(content) {
        Some(captures) => captures,
        None => return Err(Error::ObjectNotFound(String::from("file contents"))),
    };
    let (name, object) = match (captures.get(1), captures.get(2)) {
        (Some(name), Some(object)) => (name, object),
        _ => return Err(Error::ObjectNotFound(String::from("file contents"))),
    };

    let config = match serde_json::from_str::<Value>(&normalize_trailing_commas(object.as_str())) {
        Ok(Value::Object(config)) => config,
        Ok(_) => return Err(Error::ParseError(String::from("expected an object"))),
        Err(error) => return Err(Error::ParseError(error.to_string())),
    };

    return Ok(EmbeddedConfig {
        name: name.as_str().to_string(),
        span: object.range(),
        config,
    });
}

/// Replaces every known field that is present with its placeholder and
/// returns the replaced keys. Unknown fields are left as they are.
pub fn apply_placeholders(config: &mut Map<String, Value>) -> Vec<&'static str> {
    let mut replaced = vec![];

    for (key, placeholder) in PLACEHOLDERS {
        if let Some(value) = config.get_mut(*key) {
            *value = Value::String(placeholder.to_string());
            replaced.push(*key);
        }
    }

    return replaced;
}

/// Puts `config` in place of the embedded object, keeping the rest of the
/// file as it was.
pub fn rewrite(
    content: &str,
    embedded: &EmbeddedConfig,
    config: &Map<String, Value>,
) -> Result<String, Error> {
    let object = match serde_json::to_string_pretty(config) {
        Ok(object) => object,
        Err(error) => return Err(Error::ParseError(error.to_string())),
    };

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..embedded.span.start]);
    updated.push_str(&object);
    updated.push_str(&content[embedded.span.end..]);

    return Ok(updated);
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut backup = OsString::from(path.as_os_str());
    backup.push(".bak");
    return PathBuf::from(backup);
}

/// Replaces the configuration values in `path` with placeholders. The
/// original file is moved to `<path>.bak` first; nothing is touched when the
/// object cannot be parsed or the backup already exists.
pub fn scrub_file(path: &Path) -> Result<ScrubOutcome, Error> {
    let display = path.display().to_string();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => match error.kind() {
            io::ErrorKind::NotFound => return Err(Error::FileNotFound(display)),
            _ => return Err(Error::ReadError(display, error.to_string())),
        },
    };

    let embedded = match extract(&content) {
        Err(Error::ObjectNotFound(_)) => return Err(Error::ObjectNotFound(display)),
        other => other?,
    };
    debug!("Found `{}` with {} fields", embedded.name, embedded.config.len());

    let mut config = embedded.config.clone();
    let replaced = apply_placeholders(&mut config);
    let updated = rewrite(&content, &embedded, &config)?;

    let backup_path = backup_path(path);
    if backup_path.exists() {
        return Err(Error::BackupExists(backup_path.display().to_string()));
    }
    if let Err(error) = fs::rename(path, &backup_path) {
        return Err(Error::BackupError(display, error.to_string()));
    }
    info!("Original file backed up to {}", backup_path.display());

    if let Err(error) = fs::write(path, updated) {
        return Err(Error::WriteError(display, error.to_string()));
    }

    return Ok(ScrubOutcome {
        backup_path,
        replaced,
    });
}

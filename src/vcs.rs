use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

pub const COMMIT_MESSAGE: &str = "Update AWS config with dummy values after terraform destroy";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Git {command} failed: {output}")]
    CommandFailed { command: String, output: String },
}

/// Runs git in a fixed working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Git {
    work_dir: PathBuf,
}

impl Git {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        return Self {
            work_dir: work_dir.into(),
        };
    }

    /// Git for the project owning a config file at `<project>/src/aws-exports.js`.
    pub fn for_config(config_path: &Path) -> Self {
        let work_dir = config_path
            .parent()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        return Self::new(work_dir);
    }

    pub fn work_dir(&self) -> &Path {
        return &self.work_dir;
    }

    /// `path` as git sees it from the working directory. Relative paths are
    /// relative to the process, so the working directory part is dropped.
    pub fn pathspec<'a>(&self, path: &'a Path) -> &'a Path {
        return path.strip_prefix(&self.work_dir).unwrap_or(path);
    }

    pub fn stage(&self, path: &Path) -> Result<String, Error> {
        return self.run("add", &[OsStr::new("add"), self.pathspec(path).as_os_str()]);
    }

    pub fn commit(&self, message: &str) -> Result<String, Error> {
        return self.run("commit", &[OsStr::new("commit"), OsStr::new("-m"), OsStr::new(message)]);
    }

    /// Stages `path` and commits it. The commit is skipped when staging fails.
    pub fn commit_file(&self, path: &Path, message: &str) -> Result<(), Error> {
        self.stage(path)?;
        self.commit(message)?;
        return Ok(());
    }

    fn run(&self, command: &str, args: &[&OsStr]) -> Result<String, Error> {
        debug!("Running git {} in {}", command, self.work_dir.display());

        let output = match Command::new("git").args(args).current_dir(&self.work_dir).output() {
            Ok(output) => output,
            Err(error) => {
                return Err(Error::CommandFailed {
                    command: command.to_string(),
                    output: error.to_string(),
                })
            }
        };

        if !output.status.success() {
            let mut message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if message.is_empty() {
                message = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(Error::CommandFailed {
                command: command.to_string(),
                output: message,
            });
        }

        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }
}

/// The operator's answer to the commit prompt. A prompt that cannot be shown,
/// e.g. without a terminal, counts as "no".
pub fn accepted<E: std::fmt::Display>(answer: Result<bool, E>) -> bool {
    return match answer {
        Ok(accepted) => accepted,
        Err(error) => {
            warn!("Not committing, confirmation prompt unavailable: {}", error);
            false
        }
    };
}

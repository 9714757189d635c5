//! Tools that discover the AWS resources of an Amplify-style application and
//! either write them to `aws-exports.js`, sync them to SSM Parameter Store, or
//! scrub a generated `aws-exports.js` back to placeholders.

pub mod aws;
pub mod config;
pub mod discovery;
pub mod exports;
pub mod logging;
pub mod pipeline;
pub mod publish;
pub mod scrub;
pub mod vcs;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),

    #[error(transparent)]
    Discovery(#[from] discovery::Error),

    #[error(transparent)]
    Exports(#[from] exports::Error),

    #[error("Some parameters failed to sync: {0}")]
    Publish(String),

    #[error(transparent)]
    Scrub(#[from] scrub::Error),

    #[error(transparent)]
    Vcs(#[from] vcs::Error),
}

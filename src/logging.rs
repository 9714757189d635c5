use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` takes precedence; otherwise
/// this crate and `binary` log at `info`, or `debug` when `verbose` is set,
/// and everything else at `warn`.
pub fn init(binary: &str, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(format!(
            "warn,aws_exports_tools={level},{binary}={level}",
            level = level,
            binary = binary
        )),
    };

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}

//! Logging configuration using tracing
//!
//! Structured logging to stderr with support for the RUST_LOG environment variable.
//! Stdout is left free for the `replay` command's JSON output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Sets up structured logging with:
/// - Filtering via RUST_LOG (defaults to "info" so skips and failures are visible)
/// - Formatted output to stderr
///
/// # Example RUST_LOG values
/// - `RUST_LOG=warn` - Only fallbacks and failed actions
/// - `RUST_LOG=cardsync=debug` - Include every routing decision
/// - `RUST_LOG=cardsync::sync=trace` - Trace level for the rules engine
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init() -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| crate::CardSyncError::Other(format!("Failed to initialize tracing: {}", e)))?;

    Ok(())
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_helper() {
        // Can be called any number of times
        init_test();
        init_test();
    }

    #[test]
    fn test_second_init_reports_error() {
        init_test();
        assert!(init().is_err());
    }
}

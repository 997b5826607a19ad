//! Logging initialisation
//!
//! Emits JSON-formatted structured logs to stdout, where the Lambda runtime forwards them to
//! CloudWatch Logs.

use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,repeated_alarm_notifier=debug";

/// Level filter from `RUST_LOG`, or `default_filter` when it is unset or invalid
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Installs the global JSON subscriber.
///
/// Returns `false` when a global subscriber was already installed; that one stays in place.
pub fn init_logging(default_filter: &str) -> bool {
    let json_layer = fmt::layer()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(json_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_first_subscriber_on_repeated_initialisation() {
        // Arrange
        init_logging(DEFAULT_FILTER);

        // Act
        let installed_again = init_logging("warn");

        // Assert
        assert!(!installed_again);
        tracing::info!("still logging");
    }
}

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise only this crate logs, at `level`.
fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("particle_catalog={}", level)))
}

/// Installs a compact human-readable subscriber.
///
/// Uses `try_init`, so a host that already installed a subscriber keeps it.
/// Returns whether this call installed one.
pub fn init_logger(level: &str) -> bool {
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok()
}

/// JSON lines for log aggregation.
pub fn init_json_logger(level: &str) -> bool {
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_first_subscriber_is_installed() {
        let _ = init_logger("debug");
        assert!(!init_json_logger("info"));
        assert!(!init_logger("info"));
        tracing::info!("logger initialized");
    }
}

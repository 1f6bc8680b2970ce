//! Logging bootstrap for the catalog service.

use catalog_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build the filter: `RUST_LOG` when set, otherwise the configured level.
pub fn env_filter(settings: &TelemetrySettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init(settings: &TelemetrySettings) {
    let filter = env_filter(settings);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match settings.log_format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            target: "catalog-telemetry",
            format = ?settings.log_format,
            level = %settings.log_level,
            "telemetry initialized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_falls_back_to_info() {
        let settings = TelemetrySettings {
            log_format: LogFormat::Pretty,
            log_level: "catalog=[".to_string(),
        };
        // Must not panic regardless of RUST_LOG.
        let _ = env_filter(&settings);
    }

    #[test]
    fn init_is_idempotent() {
        let settings = TelemetrySettings::default();
        init(&settings);
        init(&settings);
    }
}

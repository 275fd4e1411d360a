//! Logging setup.
//!
//! The library only emits `tracing` events. Binaries and tests that want to
//! see them install a subscriber through [`init_tracing`].

use tracing_subscriber::EnvFilter;

/// Output format for [`init_tracing`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_directive` (for example
/// `"toolchain_catalog=debug"`) is used. Returns false if a global subscriber
/// was already installed.
pub fn init_tracing(default_directive: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    match format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        init_tracing("toolchain_catalog=debug", LogFormat::Pretty);
        assert!(!init_tracing("toolchain_catalog=debug", LogFormat::Json));
    }
}

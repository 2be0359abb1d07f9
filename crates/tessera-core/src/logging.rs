//! Logging setup based on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
///
/// GPU and windowing internals are very chatty at `trace`, so they are capped at `info`.
pub const DEFAULT_FILTER: &str =
    "debug,wgpu_core=info,wgpu_hal=info,naga=info,winit=info,calloop=info";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directive string in `EnvFilter` syntax.
    pub filter: String,
    /// Whether the `RUST_LOG` environment variable overrides `filter`.
    pub respect_env: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            respect_env: true,
        }
    }
}

impl LogConfig {
    fn env_filter(&self) -> EnvFilter {
        if self.respect_env {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return filter;
            }
        }
        EnvFilter::new(&self.filter)
    }
}

/// Install the global fmt subscriber with the default configuration.
pub fn init() {
    init_with(&LogConfig::default());
}

/// Install the global fmt subscriber.
///
/// Calling this more than once is harmless; only the first subscriber is kept.
pub fn init_with(config: &LogConfig) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .try_init();
    if result.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_default_filter() {
        let config = LogConfig::default();
        assert_eq!(config.filter, DEFAULT_FILTER);
        assert!(config.respect_env);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let config = LogConfig {
            filter: "warn".to_string(),
            respect_env: false,
        };
        init_with(&config);
        init_with(&config);
    }
}

//! Logging setup for applications embedding the profiler.
//!
//! The library itself only emits `tracing` events; nothing here is required.
//! This module is a convenience for binaries and integration tests that want
//! a sensible subscriber without repeating the layer plumbing.

use tracing::Level;

/// Subscriber configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base log level for the application.
    pub level: Level,
    /// Log level for tablescope components specifically.
    pub profiler_level: Level,
    /// Whether to emit JSON-formatted output.
    pub json_format: bool,
    /// Environment filter override; when set, it wins over the level fields.
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            profiler_level: Level::DEBUG,
            json_format: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Production defaults: warnings only, JSON output.
    pub fn production() -> Self {
        Self {
            level: Level::WARN,
            profiler_level: Level::INFO,
            json_format: true,
            env_filter: None,
        }
    }

    /// Development defaults: everything at debug, human-readable output.
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            profiler_level: Level::DEBUG,
            json_format: false,
            env_filter: None,
        }
    }

    /// Sets the application log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets whether to use JSON output.
    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    /// Sets a custom environment filter.
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Builds the environment filter string.
    pub fn filter_directives(&self) -> String {
        if let Some(ref filter) = self.env_filter {
            filter.clone()
        } else {
            format!(
                "{},tablescope={}",
                self.level.as_str().to_lowercase(),
                self.profiler_level.as_str().to_lowercase()
            )
        }
    }
}

/// Installs a global subscriber from the configuration.
///
/// `RUST_LOG` takes precedence over the configured levels when set. Fails if
/// a global subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

    let fmt_layer = if config.json_format {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

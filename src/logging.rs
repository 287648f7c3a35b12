//! Logging bootstrap for wireup.
//!
//! The crate instruments container construction and registry mutation with
//! `tracing` events under the `wireup` target. This module wires a
//! subscriber for binaries that do not bring their own; libraries embedding
//! wireup should configure `tracing-subscriber` themselves and skip it.
//!
//! # Features
//!
//! - `logging` - emit events (default)
//! - `logging-json` - JSON output (production)
//! - `logging-pretty` - colorful output (development)

use tracing::Level;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON structured output.
    #[default]
    Json,
    /// Human-readable colorful output.
    Pretty,
    /// Compact single-line output.
    Compact,
}

/// Builder for the logging subscriber.
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    format: LogFormat,
    target: Option<&'static str>,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Json,
            target: None,
        }
    }
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Only show events from a specific target.
    pub fn with_target_filter(mut self, target: &'static str) -> Self {
        self.target = Some(target);
        self
    }

    /// Only show wireup events.
    pub fn wireup_only(self) -> Self {
        self.with_target_filter("wireup")
    }

    /// Use JSON output.
    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    /// Use pretty output.
    pub fn pretty(mut self) -> Self {
        self.format = LogFormat::Pretty;
        self
    }

    /// Use compact output.
    pub fn compact(mut self) -> Self {
        self.format = LogFormat::Compact;
        self
    }

    /// Install the subscriber with the configured settings.
    ///
    /// Requires `logging-json` or `logging-pretty`; a no-op otherwise.
    #[cfg(any(feature = "logging-json", feature = "logging-pretty"))]
    pub fn init(self) {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = match self.target {
            Some(target) => EnvFilter::new(format!("{}={}", target, self.level)),
            None => EnvFilter::new(self.level.to_string()),
        };

        match self.format {
            LogFormat::Json => {
                let layer = fmt::layer().json().with_target(true);
                tracing_subscriber::registry().with(filter).with(layer).init();
            }
            LogFormat::Pretty => {
                let layer = fmt::layer().pretty().with_target(true);
                tracing_subscriber::registry().with(filter).with(layer).init();
            }
            LogFormat::Compact => {
                let layer = fmt::layer().compact().with_target(true);
                tracing_subscriber::registry().with(filter).with(layer).init();
            }
        }
    }

    /// Install (no-op without a subscriber feature).
    #[cfg(not(any(feature = "logging-json", feature = "logging-pretty")))]
    pub fn init(self) {}
}

/// Create a logging builder.
pub fn builder() -> LoggingBuilder {
    LoggingBuilder::new()
}

/// Initialize with defaults: JSON when `logging-json` is enabled, pretty
/// otherwise.
pub fn init() {
    #[cfg(feature = "logging-json")]
    builder().json().init();

    #[cfg(all(feature = "logging-pretty", not(feature = "logging-json")))]
    builder().pretty().init();
}

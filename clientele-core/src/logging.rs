use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::config::{ClienteleConfig, ConfigError, ConfigProperties};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

/// `clientele.log` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub format: LogFormat,
    /// Default `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
        }
    }
}

impl ConfigProperties for LogSettings {
    fn prefix() -> &'static str {
        "clientele.log"
    }

    fn from_config(config: &ClienteleConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let format = match config.get_opt::<String>(&Self::key("format"))? {
            Some(raw) => raw.parse().map_err(|message| ConfigError::Invalid {
                key: Self::key("format"),
                message,
            })?,
            None => defaults.format,
        };
        let filter = config
            .get_opt::<String>(&Self::key("filter"))?
            .unwrap_or(defaults.filter);
        Ok(Self { format, filter })
    }
}

/// Initialise the global `tracing` subscriber with a `fmt` layer.
///
/// Respects `RUST_LOG`; falls back to `settings.filter`. Returns `false` when a
/// global subscriber was already installed, which makes repeated calls harmless.
pub fn init_tracing(settings: &LogSettings) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false);

    let installed = match settings.format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Pretty => builder.try_init().is_ok(),
    };
    if installed {
        tracing::debug!(format = ?settings.format, "tracing initialised");
    }
    installed
}

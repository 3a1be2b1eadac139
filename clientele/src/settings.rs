use std::str::FromStr;

use clientele_core::config::{ClienteleConfig, ConfigError, ConfigProperties};
use clientele_data::MissingIdPolicy;

/// Which engine backs the customer store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Memory,
    Sqlite,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(BackendKind::Memory),
            "sqlite" => Ok(BackendKind::Sqlite),
            other => Err(format!("unknown backend '{other}' (expected memory or sqlite)")),
        }
    }
}

/// `clientele.store` section.
///
/// ```yaml
/// clientele:
///   store:
///     backend: sqlite
///     url: "sqlite://customers.db"
///     max-connections: 5
///     missing-id: ignore
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub backend: BackendKind,
    pub url: String,
    pub max_connections: u32,
    pub missing_id: MissingIdPolicy,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            missing_id: MissingIdPolicy::Error,
        }
    }
}

impl ConfigProperties for StoreSettings {
    fn prefix() -> &'static str {
        "clientele.store"
    }

    fn from_config(config: &ClienteleConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            backend: parsed(config, "backend")?.unwrap_or(defaults.backend),
            url: config
                .get_opt::<String>(&Self::key("url"))?
                .unwrap_or(defaults.url),
            max_connections: config
                .get_opt::<u32>(&Self::key("max-connections"))?
                .unwrap_or(defaults.max_connections),
            missing_id: parsed(config, "missing-id")?.unwrap_or(defaults.missing_id),
        })
    }
}

fn parsed<V>(config: &ClienteleConfig, property: &str) -> Result<Option<V>, ConfigError>
where
    V: FromStr<Err = String>,
{
    let key = StoreSettings::key(property);
    config
        .get_opt::<String>(&key)?
        .map(|raw| raw.parse().map_err(|message| ConfigError::Invalid { key, message }))
        .transpose()
}

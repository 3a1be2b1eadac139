mod loader;
pub mod typed;
pub mod value;

use std::collections::HashMap;
use std::ops::Deref;
use std::path::Path;

pub use typed::ConfigProperties;
pub use value::{ConfigValue, FromConfigValue};

/// Environment variables starting with this prefix are overlaid on the
/// file-based configuration.
pub const ENV_PREFIX: &str = "CLIENTELE_";

/// Environment variable selecting the active profile.
pub const PROFILE_ENV: &str = "CLIENTELE_PROFILE";

/// Failure while loading or reading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No value under the key.
    NotFound(String),
    /// A value exists but does not convert to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// A file could not be read or is not valid YAML.
    Load(String),
    /// The value has the right type but is not one of the accepted values.
    Invalid { key: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "missing configuration key {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "'{key}' is not a valid {expected}")
            }
            ConfigError::Load(msg) => write!(f, "could not load configuration: {msg}"),
            ConfigError::Invalid { key, message } => {
                write!(f, "Invalid config value for '{key}': {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration loaded from YAML files, `.env` files, and environment variables.
///
/// `ClienteleConfig` (= `ClienteleConfig<()>`) provides raw key-value access only.
/// `ClienteleConfig<T>` adds typed access to a config section via `Deref<Target = T>`.
///
/// Sources, later ones overriding earlier ones:
/// 1. `clientele.yaml` (base)
/// 2. `clientele-{profile}.yaml` (profile override)
/// 3. `.env` file (loaded into process environment)
/// 4. `.env.{profile}` file (loaded into process environment)
/// 5. `CLIENTELE_*` environment variables (`CLIENTELE_STORE_URL` overrides `clientele.store.url`)
///
/// Variables already set in the process win over `.env` entries.
///
/// Profile is determined by: `CLIENTELE_PROFILE` env var > argument > default `"dev"`.
#[derive(Debug, Clone)]
pub struct ClienteleConfig<T = ()> {
    values: HashMap<String, ConfigValue>,
    profile: String,
    typed: T,
}

impl ClienteleConfig {
    /// Load configuration for the given profile from the current working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."), profile)
    }

    /// Load configuration for the given profile, reading files from `dir`.
    pub fn load_from_dir(dir: &Path, profile: &str) -> Result<Self, ConfigError> {
        let active_profile = std::env::var(PROFILE_ENV).unwrap_or_else(|_| profile.to_string());

        let mut values = HashMap::new();

        loader::load_yaml_file(&dir.join("clientele.yaml"), &mut values)?;
        loader::load_yaml_file(&dir.join(format!("clientele-{active_profile}.yaml")), &mut values)?;

        // Missing .env files are fine.
        let _ = dotenvy::from_path(dir.join(".env"));
        let _ = dotenvy::from_path(dir.join(format!(".env.{active_profile}")));

        overlay_env(&mut values, std::env::vars());

        tracing::debug!(profile = %active_profile, keys = values.len(), "configuration loaded");

        Ok(ClienteleConfig {
            values,
            profile: active_profile,
            typed: (),
        })
    }

    /// Create a config from a YAML string.
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(ClienteleConfig {
            values,
            profile: profile.to_string(),
            typed: (),
        })
    }

    /// Create an empty config.
    pub fn empty() -> Self {
        ClienteleConfig {
            values: HashMap::new(),
            profile: "test".to_string(),
            typed: (),
        }
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Upgrade to a typed config by constructing `C` from the raw values.
    ///
    /// ```ignore
    /// let config = ClienteleConfig::load("dev")?.with_typed::<StoreSettings>()?;
    /// config.url                                       // typed access via Deref
    /// config.get::<String>("clientele.store.backend")  // raw access still works
    /// ```
    pub fn with_typed<C: ConfigProperties>(self) -> Result<ClienteleConfig<C>, ConfigError> {
        let typed = C::from_config(&self)?;
        Ok(ClienteleConfig {
            values: self.values,
            profile: self.profile,
            typed,
        })
    }
}

impl<T> ClienteleConfig<T> {
    /// Get a typed value for the given dot-separated key.
    ///
    /// Keys match exactly first, then by their environment-variable spelling,
    /// so `clientele.store.max-connections` also finds a value set through
    /// `CLIENTELE_STORE_MAX_CONNECTIONS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the key does not exist, or
    /// `ConfigError::TypeMismatch` if the value cannot be converted.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .lookup(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Get a typed value, returning `None` when the key is missing.
    ///
    /// Unlike [`get_or`](Self::get_or), a present but malformed value is an error.
    pub fn get_opt<V: FromConfigValue>(&self, key: &str) -> Result<Option<V>, ConfigError> {
        match self.lookup(key) {
            Some(value) => V::from_config_value(value, key).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`get`](Self::get), with `default` for absent or malformed values.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    /// Whether `key` (or its environment spelling) is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Profile whose overlay file was loaded.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// The section bound by [`with_typed`](Self::with_typed).
    pub fn typed(&self) -> &T {
        &self.typed
    }

    fn lookup(&self, key: &str) -> Option<&ConfigValue> {
        if let Some(value) = self.values.get(key) {
            return Some(value);
        }
        let wanted = env_name(key);
        self.values
            .iter()
            .find(|(k, _)| env_name(k) == wanted)
            .map(|(_, v)| v)
    }
}

impl<T> Deref for ClienteleConfig<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.typed
    }
}

/// The environment variable spelling of a config key:
/// `clientele.store.max-connections` -> `CLIENTELE_STORE_MAX_CONNECTIONS`.
pub fn env_name(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Overlay `CLIENTELE_*` variables. A variable replaces the existing key with
/// the same environment spelling; otherwise it is stored under the dotted,
/// lower-cased form of its name.
fn overlay_env(
    values: &mut HashMap<String, ConfigValue>,
    vars: impl Iterator<Item = (String, String)>,
) {
    for (env_key, env_val) in vars {
        if !env_key.starts_with(ENV_PREFIX) || env_key == PROFILE_ENV {
            continue;
        }
        let existing = values.keys().find(|k| env_name(k) == env_key).cloned();
        let config_key = existing.unwrap_or_else(|| env_key.to_lowercase().replace('_', "."));
        values.insert(config_key, ConfigValue::String(env_val));
    }
}

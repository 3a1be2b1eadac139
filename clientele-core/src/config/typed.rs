use super::{ClienteleConfig, ConfigError};

/// Trait for strongly-typed configuration sections.
///
/// ```ignore
/// pub struct StoreSettings { pub url: String, pub max_connections: u32 }
///
/// impl ConfigProperties for StoreSettings {
///     fn prefix() -> &'static str { "clientele.store" }
///
///     fn from_config(config: &ClienteleConfig) -> Result<Self, ConfigError> {
///         Ok(Self {
///             url: config.get_or(&Self::key("url"), "sqlite::memory:".to_string()),
///             max_connections: config.get_opt(&Self::key("max-connections"))?.unwrap_or(5),
///         })
///     }
/// }
/// ```
pub trait ConfigProperties: Sized {
    /// The configuration key prefix (e.g., `"clientele.store"`).
    fn prefix() -> &'static str;

    /// Construct from a raw `ClienteleConfig`.
    fn from_config(config: &ClienteleConfig) -> Result<Self, ConfigError>;

    /// Absolute key for a property of this section.
    fn key(property: &str) -> String {
        format!("{}.{property}", Self::prefix())
    }
}

//! # clientele-core
//!
//! Runtime pieces shared by the clientele crates: the layered
//! [`ClienteleConfig`](config::ClienteleConfig) loader with typed sections, and
//! [`init_tracing`] for the log subscriber.

pub mod config;
pub mod logging;

pub use config::{ClienteleConfig, ConfigError, ConfigProperties, ConfigValue, FromConfigValue};
pub use logging::{init_tracing, LogFormat, LogSettings};

pub mod prelude {
    //! Re-exports of the most commonly used core types.
    pub use crate::{init_tracing, ClienteleConfig, ConfigError, ConfigProperties, LogSettings};
}

//! # clientele-data-sqlx: SQLx backend for the clientele data layer
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-specific
//! engine for the data access layer. It depends on [`clientele-data`] for the
//! abstract traits and types, and adds the repository engine, row binding and
//! error bridging needed to talk to a real database.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxRepository`] | `Repository` engine holding an `sqlx::Pool<DB>` (implemented for SQLite) |
//! | [`SqlxEntity`] | Entities the engine can decode (`FromRow`) and bind |
//! | [`SqlxErrorExt`] | Converts `sqlx::Error` into `DataError` (`.into_data_error()`) |
//! | [`SqlxResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Error bridging
//!
//! | `sqlx::Error` | `DataError` |
//! |---|---|
//! | `RowNotFound` | `NotFound` |
//! | unique / foreign key / not-null / check violation | `Persistence(Constraint)` |
//! | I/O, TLS, pool timed out or closed | `Persistence(Unavailable)` |
//! | encode / decode failures | `Persistence(Serialization)` |
//! | anything else | `Persistence(Other)` |
//!
//! The schema is not managed here: the entity's table must exist before the
//! repository is used.

pub mod entity;
pub mod error;
pub mod repository;

pub use entity::{SqliteQueryAs, SqlxEntity};
pub use error::{SqlxErrorExt, SqlxResult};
pub use repository::SqlxRepository;

/// Re-exports of the most commonly used types from both `clientele-data` and this crate.
pub mod prelude {
    pub use crate::{SqliteQueryAs, SqlxEntity, SqlxErrorExt, SqlxRepository};
    pub use clientele_data::prelude::*;
}

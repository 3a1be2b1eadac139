use clientele_data::Entity;
use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};

/// A `query_as` statement returning `O`, as built by [`SqlxRepository`](crate::SqlxRepository).
pub type SqliteQueryAs<'q, O> = QueryAs<'q, Sqlite, O, SqliteArguments<'q>>;

/// An [`Entity`] the SQLite engine can read and write.
///
/// Rows decode through `sqlx::FromRow`; writes bind the non-identifier
/// columns through [`bind_values`](SqlxEntity::bind_values).
///
/// ```ignore
/// impl SqlxEntity for Customer {
///     fn bind_values<'q>(&'q self, query: SqliteQueryAs<'q, Self>) -> SqliteQueryAs<'q, Self> {
///         query.bind(&self.name)
///     }
/// }
/// ```
pub trait SqlxEntity: Entity<Id = i64> + for<'r> FromRow<'r, SqliteRow> {
    /// Bind every column of [`Entity::value_columns`], in that order.
    fn bind_values<'q>(&'q self, query: SqliteQueryAs<'q, Self>) -> SqliteQueryAs<'q, Self>;
}

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait representing a persisted entity: a record type with one identifier
/// plus the table metadata the SQL engine needs.
///
/// The identifier is `None` until the persistence layer assigns one.
///
/// # Example
///
/// ```ignore
/// impl Entity for Customer {
///     type Id = i64;
///     fn table_name() -> &'static str { "customers" }
///     fn id_column() -> &'static str { "id" }
///     fn columns() -> &'static [&'static str] { &["id", "name"] }
///     fn id(&self) -> Option<i64> { self.id }
///     fn with_id(self, id: i64) -> Self { Self { id: Some(id), ..self } }
/// }
/// ```
pub trait Entity: Clone + Send + Sync + Unpin + 'static {
    type Id: Copy + Eq + Hash + Ord + Debug + Display + Send + Sync + 'static;

    fn table_name() -> &'static str;

    fn id_column() -> &'static str;

    /// All columns, identifier column first.
    fn columns() -> &'static [&'static str];

    fn id(&self) -> Option<Self::Id>;

    /// Return the entity with its identifier set.
    fn with_id(self, id: Self::Id) -> Self;

    /// Columns other than the identifier, in `columns()` order.
    fn value_columns() -> Vec<&'static str> {
        Self::columns()
            .iter()
            .copied()
            .filter(|c| *c != Self::id_column())
            .collect()
    }
}

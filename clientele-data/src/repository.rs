use crate::entity::Entity;
use crate::error::DataError;
use crate::page::{Page, Pageable, Sort};
use std::future::Future;
use std::str::FromStr;

/// How `delete_by_id` treats an identifier with no stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingIdPolicy {
    /// Fail with [`DataError::NotFound`].
    #[default]
    Error,
    /// Succeed without doing anything.
    Ignore,
}

impl MissingIdPolicy {
    /// Outcome of deleting `id` from `table` when nothing was removed.
    pub fn on_missing(self, table: &str, id: impl std::fmt::Display) -> Result<(), DataError> {
        match self {
            MissingIdPolicy::Error => Err(DataError::not_found(table, id)),
            MissingIdPolicy::Ignore => Ok(()),
        }
    }
}

impl FromStr for MissingIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" | "fail" => Ok(MissingIdPolicy::Error),
            "ignore" | "noop" => Ok(MissingIdPolicy::Ignore),
            other => Err(format!("unknown missing-id policy '{other}' (expected error or ignore)")),
        }
    }
}

/// Generic async repository trait for CRUD, paging and sorting operations.
///
/// Uses RPITIT (return-position `impl Trait` in traits), no `async-trait` needed.
/// Engines implement the required methods; the provided ones are expressed
/// through them.
pub trait Repository<T, ID>: Send + Sync
where
    T: Entity<Id = ID>,
    ID: Copy + std::fmt::Display + Send + Sync + 'static,
{
    /// Insert when the entity has no identifier, otherwise update the record
    /// with that identifier (inserting it under that identifier if absent).
    /// Returns the stored entity with its identifier populated.
    fn save(&self, entity: &T) -> impl Future<Output = Result<T, DataError>> + Send;

    fn find_by_id(&self, id: ID) -> impl Future<Output = Result<Option<T>, DataError>> + Send;

    fn exists_by_id(&self, id: ID) -> impl Future<Output = Result<bool, DataError>> + Send;

    /// All records, in ascending identifier order.
    fn find_all(&self) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;

    /// Records whose identifier is listed. Missing identifiers are skipped.
    fn find_all_by_id(&self, ids: &[ID]) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;

    fn find_all_sorted(
        &self,
        sort: &Sort,
    ) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;

    fn find_all_paged(
        &self,
        pageable: &Pageable,
    ) -> impl Future<Output = Result<Page<T>, DataError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Remove the record. A missing identifier follows the engine's [`MissingIdPolicy`].
    fn delete_by_id(&self, id: ID) -> impl Future<Output = Result<(), DataError>> + Send;

    /// Remove the listed records; returns how many were removed.
    fn delete_all_by_id(&self, ids: &[ID]) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Remove every record; returns how many were removed.
    fn delete_all(&self) -> impl Future<Output = Result<u64, DataError>> + Send;

    fn save_all(&self, entities: &[T]) -> impl Future<Output = Result<Vec<T>, DataError>> + Send {
        async move {
            let mut saved = Vec::with_capacity(entities.len());
            for entity in entities {
                saved.push(self.save(entity).await?);
            }
            Ok(saved)
        }
    }

    /// Like [`find_by_id`](Self::find_by_id), but a missing record is an error.
    fn get_by_id(&self, id: ID) -> impl Future<Output = Result<T, DataError>> + Send {
        async move {
            self.find_by_id(id)
                .await?
                .ok_or_else(|| DataError::not_found(T::table_name(), id))
        }
    }

    /// Delete by instance. The entity must carry an identifier.
    fn delete(&self, entity: &T) -> impl Future<Output = Result<(), DataError>> + Send {
        let id = entity.id();
        async move {
            let id = id.ok_or_else(|| {
                DataError::invalid_entity(format!(
                    "cannot delete {} entity without an identifier",
                    T::table_name()
                ))
            })?;
            self.delete_by_id(id).await
        }
    }
}

/// Reject sort columns the entity does not declare.
pub fn check_sort<T: Entity>(sort: &Sort) -> Result<(), DataError> {
    for (column, _) in sort.orders() {
        if !T::columns().contains(&column) {
            return Err(DataError::invalid_query(format!(
                "unknown column '{column}' for {}",
                T::table_name()
            )));
        }
    }
    Ok(())
}

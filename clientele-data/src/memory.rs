//! Process-local storage engine.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

use crate::entity::Entity;
use crate::error::{DataError, PersistenceError, PersistenceErrorKind};
use crate::page::{Page, Pageable, Sort};
use crate::repository::{check_sort, MissingIdPolicy, Repository};

/// A thread-safe repository backed by `DashMap`, with identifiers drawn from
/// an atomic sequence starting at 1.
///
/// Clones share the same storage.
///
/// Sorting compares the entity's serialized fields named after the sort
/// columns, so entities must serialize with their column names as field names.
pub struct InMemoryRepository<T> {
    inner: Arc<DashMap<i64, T>>,
    /// Last identifier handed out (or seen, for caller-supplied identifiers).
    sequence: Arc<AtomicI64>,
    missing_id: MissingIdPolicy,
}

impl<T: Entity<Id = i64>> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            sequence: Arc::new(AtomicI64::new(0)),
            missing_id: MissingIdPolicy::default(),
        }
    }

    pub fn with_missing_id_policy(mut self, policy: MissingIdPolicy) -> Self {
        self.missing_id = policy;
        self
    }

    pub fn missing_id_policy(&self) -> MissingIdPolicy {
        self.missing_id
    }

    /// Fails once the sequence has reached `i64::MAX`, which a caller-supplied
    /// identifier can force.
    fn next_id(&self) -> Result<i64, DataError> {
        self.sequence
            .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |last| {
                last.checked_add(1)
            })
            .map(|last| last + 1)
            .map_err(|_| {
                DataError::from(PersistenceError::new(
                    PersistenceErrorKind::Constraint,
                    format!("{} identifier sequence exhausted", T::table_name()),
                ))
            })
    }

    fn snapshot(&self) -> Vec<T> {
        let mut all: Vec<T> = self.inner.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|e| e.id());
        all
    }
}

impl<T: Entity<Id = i64> + Serialize> InMemoryRepository<T> {
    fn sorted(&self, sort: &Sort) -> Result<Vec<T>, DataError> {
        check_sort::<T>(sort)?;
        let all = self.snapshot();
        if sort.is_unsorted() {
            return Ok(all);
        }
        let mut keyed = all
            .into_iter()
            .map(|e| {
                serde_json::to_value(&e)
                    .map(|v| (v, e))
                    .map_err(|err| DataError::persistence(PersistenceErrorKind::Serialization, err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        // Stable sort keeps identifier order for ties.
        keyed.sort_by(|(a, _), (b, _)| {
            for (column, direction) in sort.orders() {
                let ord = compare_values(a.get(column), b.get(column));
                let ord = if direction.is_ascending() { ord } else { ord.reverse() };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        Ok(keyed.into_iter().map(|(_, e)| e).collect())
    }
}

impl<T: Entity<Id = i64>> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            sequence: self.sequence.clone(),
            missing_id: self.missing_id,
        }
    }
}

impl<T: Entity<Id = i64> + Serialize> Repository<T, i64> for InMemoryRepository<T> {
    async fn save(&self, entity: &T) -> Result<T, DataError> {
        let stored = match entity.id() {
            Some(id) => {
                self.sequence.fetch_max(id, AtomicOrdering::SeqCst);
                entity.clone()
            }
            None => entity.clone().with_id(self.next_id()?),
        };
        let id = stored.id().ok_or_else(|| {
            DataError::invalid_entity(format!("{} entity lost its identifier", T::table_name()))
        })?;
        let previous = self.inner.insert(id, stored.clone());
        tracing::debug!(
            table = T::table_name(),
            id,
            updated = previous.is_some(),
            "saved entity"
        );
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, DataError> {
        Ok(self.inner.get(&id).map(|e| e.value().clone()))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, DataError> {
        Ok(self.inner.contains_key(&id))
    }

    async fn find_all(&self) -> Result<Vec<T>, DataError> {
        Ok(self.snapshot())
    }

    async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<T>, DataError> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids
            .into_iter()
            .filter_map(|id| self.inner.get(&id).map(|e| e.value().clone()))
            .collect())
    }

    async fn find_all_sorted(&self, sort: &Sort) -> Result<Vec<T>, DataError> {
        self.sorted(sort)
    }

    async fn find_all_paged(&self, pageable: &Pageable) -> Result<Page<T>, DataError> {
        let all = self.sorted(&pageable.sort)?;
        let total = all.len() as u64;
        let content = all
            .into_iter()
            .skip(usize::try_from(pageable.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(pageable.size).unwrap_or(usize::MAX))
            .collect();
        Ok(Page::new(content, pageable, total))
    }

    async fn count(&self) -> Result<u64, DataError> {
        Ok(self.inner.len() as u64)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DataError> {
        if self.inner.remove(&id).is_some() {
            tracing::debug!(table = T::table_name(), id, "deleted entity");
            return Ok(());
        }
        tracing::debug!(
            table = T::table_name(),
            id,
            policy = ?self.missing_id,
            "delete of missing id"
        );
        self.missing_id.on_missing(T::table_name(), id)
    }

    async fn delete_all_by_id(&self, ids: &[i64]) -> Result<u64, DataError> {
        let removed = ids
            .iter()
            .filter(|id| self.inner.remove(*id).is_some())
            .count() as u64;
        tracing::debug!(table = T::table_name(), removed, "deleted entities by id");
        Ok(removed)
    }

    async fn delete_all(&self) -> Result<u64, DataError> {
        let keys: Vec<i64> = self.inner.iter().map(|e| *e.key()).collect();
        let removed = keys
            .iter()
            .filter(|id| self.inner.remove(*id).is_some())
            .count() as u64;
        tracing::debug!(table = T::table_name(), removed, "deleted all entities");
        Ok(removed)
    }
}

/// Nulls first, then booleans, numbers, strings; anything else last.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

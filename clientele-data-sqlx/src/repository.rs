use std::marker::PhantomData;

use clientele_data::{
    check_sort, DataError, Entity, IdentifierPolicy, MissingIdPolicy, Page, Pageable,
    QueryBuilder, QueryError, Repository, Sort,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Database, Pool, Sqlite};

use crate::entity::SqlxEntity;
use crate::error::{SqlxErrorExt, SqlxResult};

/// Upper bound on identifiers bound into a single `IN (...)` list.
const BIND_CHUNK: usize = 500;

/// A generic SQL repository over an `sqlx::Pool<DB>`.
///
/// Statements are generated from the entity's [`Entity`] metadata with
/// validated, quoted identifiers. The table itself must already exist.
///
/// # Example
///
/// ```ignore
/// let repo = SqlxRepository::<Customer, Sqlite>::new(pool.clone());
/// let saved = repo.save(&Customer::new("Alice")).await?;
/// ```
pub struct SqlxRepository<T, DB: Database> {
    pool: Pool<DB>,
    missing_id: MissingIdPolicy,
    _marker: PhantomData<T>,
}

impl<T, DB: Database> SqlxRepository<T, DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Self {
            pool,
            missing_id: MissingIdPolicy::default(),
            _marker: PhantomData,
        }
    }

    pub fn with_missing_id_policy(mut self, policy: MissingIdPolicy) -> Self {
        self.missing_id = policy;
        self
    }

    pub fn missing_id_policy(&self) -> MissingIdPolicy {
        self.missing_id
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }
}

impl<T, DB: Database> Clone for SqlxRepository<T, DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            missing_id: self.missing_id,
            _marker: PhantomData,
        }
    }
}

impl<T> SqlxRepository<T, Sqlite> {
    /// Open a SQLite pool for `url`.
    ///
    /// An in-memory database lives inside a single connection, so in-memory
    /// URLs get exactly one connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> SqlxResult<Self> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };
        let pool = options
            .connect(url)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        tracing::info!(url, in_memory, "opened sqlite pool");
        Ok(Self::new(pool))
    }
}

impl<T: Entity> SqlxRepository<T, Sqlite> {
    /// A `QueryBuilder` pre-configured for this entity's table.
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new(T::table_name())
            .identifier_policy(IdentifierPolicy::Quote)
    }

    fn ordered(&self, sort: &Sort) -> SqlxResult<QueryBuilder> {
        check_sort::<T>(sort)?;
        let mut query = self.query();
        let mut has_id = false;
        for (column, direction) in sort.orders() {
            has_id |= column == T::id_column();
            query = query.order_by(column, direction.is_ascending());
        }
        if !has_id {
            query = query.order_by(T::id_column(), true);
        }
        Ok(query)
    }
}

fn statement(built: Result<String, QueryError>) -> SqlxResult<String> {
    built.map_err(|e| DataError::invalid_query(e.to_string()))
}

fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl<T: SqlxEntity> Repository<T, i64> for SqlxRepository<T, Sqlite> {
    async fn save(&self, entity: &T) -> Result<T, DataError> {
        match entity.id() {
            None => {
                let sql = statement(self.query().build_insert(&T::value_columns(), T::columns()))?;
                let query = entity.bind_values(sqlx::query_as::<_, T>(&sql));
                let saved = query
                    .fetch_one(&self.pool)
                    .await
                    .map_err(SqlxErrorExt::into_data_error)?;
                tracing::debug!(table = T::table_name(), id = ?saved.id(), "inserted entity");
                Ok(saved)
            }
            Some(id) => {
                let mut columns = vec![T::id_column()];
                columns.extend(T::value_columns());
                let sql = statement(self.query().build_upsert(
                    T::id_column(),
                    &columns,
                    T::columns(),
                ))?;
                let query = entity.bind_values(sqlx::query_as::<_, T>(&sql).bind(id));
                let saved = query
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(SqlxErrorExt::into_data_error)?;
                tracing::debug!(table = T::table_name(), id, "upserted entity");
                // An identifier-only entity that already exists returns no row.
                Ok(saved.unwrap_or_else(|| entity.clone()))
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, DataError> {
        let sql = statement(self.query().where_eq(T::id_column()).build_select(T::columns()))?;
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, DataError> {
        let sql = statement(self.query().where_eq(T::id_column()).build_count())?;
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        Ok(count > 0)
    }

    async fn find_all(&self) -> Result<Vec<T>, DataError> {
        let sql = statement(self.ordered(&Sort::unsorted())?.build_select(T::columns()))?;
        sqlx::query_as::<_, T>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<T>, DataError> {
        let ids = dedup_ids(ids);
        let mut found = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(BIND_CHUNK) {
            let sql = statement(
                self.ordered(&Sort::unsorted())?
                    .where_in(T::id_column(), chunk.len())
                    .build_select(T::columns()),
            )?;
            let mut query = sqlx::query_as::<_, T>(&sql);
            for id in chunk {
                query = query.bind(*id);
            }
            found.extend(
                query
                    .fetch_all(&self.pool)
                    .await
                    .map_err(SqlxErrorExt::into_data_error)?,
            );
        }
        Ok(found)
    }

    async fn find_all_sorted(&self, sort: &Sort) -> Result<Vec<T>, DataError> {
        let sql = statement(self.ordered(sort)?.build_select(T::columns()))?;
        sqlx::query_as::<_, T>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)
    }

    async fn find_all_paged(&self, pageable: &Pageable) -> Result<Page<T>, DataError> {
        let query = self
            .ordered(&pageable.sort)?
            .limit(pageable.size)
            .offset(pageable.offset());
        let sql = statement(query.build_select(T::columns()))?;
        let content = sqlx::query_as::<_, T>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        let total = self.count().await?;
        Ok(Page::new(content, pageable, total))
    }

    async fn count(&self) -> Result<u64, DataError> {
        let sql = statement(self.query().build_count())?;
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        Ok(count.max(0) as u64)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DataError> {
        let sql = statement(self.query().where_eq(T::id_column()).build_delete())?;
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?;
        if result.rows_affected() > 0 {
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
        let ids = dedup_ids(ids);
        let mut removed = 0;
        for chunk in ids.chunks(BIND_CHUNK) {
            let sql = statement(
                self.query()
                    .where_in(T::id_column(), chunk.len())
                    .build_delete(),
            )?;
            let mut query = sqlx::query(&sql);
            for id in chunk {
                query = query.bind(*id);
            }
            removed += query
                .execute(&self.pool)
                .await
                .map_err(SqlxErrorExt::into_data_error)?
                .rows_affected();
        }
        tracing::debug!(table = T::table_name(), removed, "deleted entities by id");
        Ok(removed)
    }

    async fn delete_all(&self) -> Result<u64, DataError> {
        let sql = statement(self.query().build_delete())?;
        let removed = sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_data_error)?
            .rows_affected();
        tracing::debug!(table = T::table_name(), removed, "deleted all entities");
        Ok(removed)
    }
}

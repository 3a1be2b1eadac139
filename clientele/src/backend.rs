use clientele_data::{DataError, Page, Pageable, Repository, Sort};

use crate::customer::{Customer, CustomerId};
use crate::settings::{BackendKind, StoreSettings};
use crate::store::{InMemoryCustomerStore, SqliteCustomerStore};

/// The customer store engine selected by [`StoreSettings`].
#[derive(Clone)]
pub enum CustomerStoreBackend {
    Memory(InMemoryCustomerStore),
    Sqlite(SqliteCustomerStore),
}

impl CustomerStoreBackend {
    /// Build the engine the settings select. For SQLite this opens the pool;
    /// the `customers` table must already exist.
    pub async fn open(settings: &StoreSettings) -> Result<Self, DataError> {
        let backend = match settings.backend {
            BackendKind::Memory => CustomerStoreBackend::Memory(
                InMemoryCustomerStore::new().with_missing_id_policy(settings.missing_id),
            ),
            BackendKind::Sqlite => CustomerStoreBackend::Sqlite(
                SqliteCustomerStore::connect(&settings.url, settings.max_connections)
                    .await?
                    .with_missing_id_policy(settings.missing_id),
            ),
        };
        tracing::info!(
            backend = ?settings.backend,
            missing_id = ?settings.missing_id,
            "customer store opened"
        );
        Ok(backend)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            CustomerStoreBackend::Memory(_) => BackendKind::Memory,
            CustomerStoreBackend::Sqlite(_) => BackendKind::Sqlite,
        }
    }
}

macro_rules! delegate {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            CustomerStoreBackend::Memory($store) => $call.await,
            CustomerStoreBackend::Sqlite($store) => $call.await,
        }
    };
}

impl Repository<Customer, CustomerId> for CustomerStoreBackend {
    async fn save(&self, entity: &Customer) -> Result<Customer, DataError> {
        delegate!(self, store => store.save(entity))
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataError> {
        delegate!(self, store => store.find_by_id(id))
    }

    async fn exists_by_id(&self, id: CustomerId) -> Result<bool, DataError> {
        delegate!(self, store => store.exists_by_id(id))
    }

    async fn find_all(&self) -> Result<Vec<Customer>, DataError> {
        delegate!(self, store => store.find_all())
    }

    async fn find_all_by_id(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, DataError> {
        delegate!(self, store => store.find_all_by_id(ids))
    }

    async fn find_all_sorted(&self, sort: &Sort) -> Result<Vec<Customer>, DataError> {
        delegate!(self, store => store.find_all_sorted(sort))
    }

    async fn find_all_paged(&self, pageable: &Pageable) -> Result<Page<Customer>, DataError> {
        delegate!(self, store => store.find_all_paged(pageable))
    }

    async fn count(&self) -> Result<u64, DataError> {
        delegate!(self, store => store.count())
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<(), DataError> {
        delegate!(self, store => store.delete_by_id(id))
    }

    async fn delete_all_by_id(&self, ids: &[CustomerId]) -> Result<u64, DataError> {
        delegate!(self, store => store.delete_all_by_id(ids))
    }

    async fn delete_all(&self) -> Result<u64, DataError> {
        delegate!(self, store => store.delete_all())
    }
}

use clientele_data::{InMemoryRepository, Repository};
use clientele_data_sqlx::SqlxRepository;
use sqlx::Sqlite;

use crate::customer::{Customer, CustomerId};

/// CRUD, paging and sorting over [`Customer`] records keyed by [`CustomerId`].
///
/// Every `Repository<Customer, CustomerId>` is a `CustomerStore`; code that
/// only needs customer persistence should depend on this trait.
pub trait CustomerStore: Repository<Customer, CustomerId> {}

impl<R: Repository<Customer, CustomerId>> CustomerStore for R {}

pub type InMemoryCustomerStore = InMemoryRepository<Customer>;

pub type SqliteCustomerStore = SqlxRepository<Customer, Sqlite>;

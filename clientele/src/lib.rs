//! # clientele
//!
//! Persistence for [`Customer`] records through the generic CRUD contract of
//! `clientele-data`. [`CustomerStore`] is that contract bound to `Customer`
//! and a 64-bit identifier; any engine implementing
//! `Repository<Customer, CustomerId>` is a `CustomerStore`.
//!
//! ```ignore
//! use clientele::prelude::*;
//!
//! let config = ClienteleConfig::load("dev")?;
//! init_tracing(&LogSettings::from_config(&config)?);
//! let store = CustomerStoreBackend::open(&StoreSettings::from_config(&config)?).await?;
//!
//! let alice = store.save(&Customer::new("Alice")).await?;
//! assert_eq!(store.find_by_id(alice.id.unwrap()).await?, Some(alice));
//! ```

pub mod backend;
pub mod customer;
pub mod settings;
pub mod store;

pub use backend::CustomerStoreBackend;
pub use customer::{Customer, CustomerId};
pub use settings::{BackendKind, StoreSettings};
pub use store::{CustomerStore, InMemoryCustomerStore, SqliteCustomerStore};

pub use clientele_core;
pub use clientele_data;
pub use clientele_data_sqlx;

pub mod prelude {
    //! Everything needed to configure and use a customer store.
    pub use crate::{
        BackendKind, Customer, CustomerId, CustomerStore, CustomerStoreBackend, StoreSettings,
    };
    pub use clientele_core::prelude::*;
    pub use clientele_data::prelude::*;
}

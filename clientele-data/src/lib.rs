//! # clientele-data
//!
//! The engine-independent half of the data layer: the [`Entity`] metadata
//! trait, the [`Repository`] CRUD contract, paging and sorting types, the
//! [`DataError`] kinds every engine reports, the SQL [`QueryBuilder`], and the
//! process-local [`InMemoryRepository`] engine.

pub mod entity;
pub mod error;
pub mod memory;
pub mod page;
pub mod query;
pub mod repository;

pub use entity::Entity;
pub use error::{DataError, PersistenceError, PersistenceErrorKind};
pub use memory::InMemoryRepository;
pub use page::{Direction, Page, Pageable, Sort};
pub use query::{IdentifierPolicy, QueryBuilder, QueryError};
pub use repository::{check_sort, MissingIdPolicy, Repository};

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{
        DataError, Direction, Entity, MissingIdPolicy, Page, Pageable, Repository, Sort,
    };
}

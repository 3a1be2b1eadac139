use clientele_data::Entity;
use clientele_data_sqlx::{SqliteQueryAs, SqlxEntity};
use serde::{Deserialize, Serialize};

pub type CustomerId = i64;

/// The customer record. `id` is `None` until the store assigns one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Option<CustomerId>,
    pub name: String,
}

impl Customer {
    /// A customer that has not been saved yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn table_name() -> &'static str {
        "customers"
    }

    fn id_column() -> &'static str {
        "id"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "name"]
    }

    fn id(&self) -> Option<CustomerId> {
        self.id
    }

    fn with_id(self, id: CustomerId) -> Self {
        Self { id: Some(id), ..self }
    }
}

impl SqlxEntity for Customer {
    fn bind_values<'q>(&'q self, query: SqliteQueryAs<'q, Self>) -> SqliteQueryAs<'q, Self> {
        query.bind(&self.name)
    }
}

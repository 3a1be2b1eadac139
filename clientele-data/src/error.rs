use std::error::Error;
use std::fmt;

/// What went wrong when the storage medium could not complete an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceErrorKind {
    /// Connectivity: the medium is unreachable, the pool is closed or timed out.
    Unavailable,
    /// A unique, foreign key, check or not-null constraint rejected the write.
    Constraint,
    /// A row could not be encoded or decoded.
    Serialization,
    /// The entity lacks what the operation needs (e.g. deleting an unsaved instance).
    InvalidEntity,
    /// The request names something the entity does not have (e.g. an unknown sort column).
    InvalidQuery,
    Other,
}

impl fmt::Display for PersistenceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PersistenceErrorKind::Unavailable => "storage unavailable",
            PersistenceErrorKind::Constraint => "constraint violation",
            PersistenceErrorKind::Serialization => "serialization failure",
            PersistenceErrorKind::InvalidEntity => "invalid entity",
            PersistenceErrorKind::InvalidQuery => "invalid query",
            PersistenceErrorKind::Other => "persistence failure",
        };
        f.write_str(label)
    }
}

/// The storage medium could not complete the requested operation.
#[derive(Debug)]
pub struct PersistenceError {
    kind: PersistenceErrorKind,
    message: String,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl PersistenceError {
    pub fn new(kind: PersistenceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the driver error that caused this failure.
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> PersistenceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// An operation addressed a non-existent identifier where existence was required.
    NotFound(String),
    Persistence(PersistenceError),
}

impl DataError {
    /// A `NotFound` error naming the table and identifier.
    pub fn not_found(table: &str, id: impl fmt::Display) -> Self {
        DataError::NotFound(format!("{table} with id {id}"))
    }

    /// Construct a `Persistence` error of the given kind from a driver error.
    ///
    /// Used by backend crates (e.g. `clientele-data-sqlx`) to wrap
    /// driver-specific errors.
    pub fn persistence(
        kind: PersistenceErrorKind,
        err: impl Error + Send + Sync + 'static,
    ) -> Self {
        DataError::Persistence(PersistenceError::new(kind, err.to_string()).with_source(err))
    }

    pub fn invalid_entity(message: impl Into<String>) -> Self {
        DataError::Persistence(PersistenceError::new(
            PersistenceErrorKind::InvalidEntity,
            message,
        ))
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        DataError::Persistence(PersistenceError::new(
            PersistenceErrorKind::InvalidQuery,
            message,
        ))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, DataError::Persistence(_))
    }

    /// The persistence kind, if this is a `Persistence` error.
    pub fn persistence_kind(&self) -> Option<PersistenceErrorKind> {
        match self {
            DataError::Persistence(err) => Some(err.kind()),
            DataError::NotFound(_) => None,
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::NotFound(msg) => write!(f, "Not found: {msg}"),
            DataError::Persistence(err) => write!(f, "Persistence error: {err}"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DataError::Persistence(err) => Some(err),
            DataError::NotFound(_) => None,
        }
    }
}

impl From<PersistenceError> for DataError {
    fn from(err: PersistenceError) -> Self {
        DataError::Persistence(err)
    }
}

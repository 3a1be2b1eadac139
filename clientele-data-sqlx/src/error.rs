use clientele_data::{DataError, PersistenceErrorKind};
use sqlx::error::ErrorKind;

/// Extension trait for converting `sqlx::Error` into `DataError`.
///
/// Due to Rust's orphan rules, we can't implement `From<sqlx::Error> for DataError`
/// in this crate. Use `.map_err(SqlxErrorExt::into_data_error)` instead.
pub trait SqlxErrorExt {
    fn into_data_error(self) -> DataError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_data_error(self) -> DataError {
        if matches!(self, sqlx::Error::RowNotFound) {
            return DataError::NotFound("Row not found".into());
        }
        let kind = persistence_kind(&self);
        tracing::warn!(error = %self, ?kind, "database operation failed");
        DataError::persistence(kind, self)
    }
}

fn persistence_kind(err: &sqlx::Error) -> PersistenceErrorKind {
    match err {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => PersistenceErrorKind::Constraint,
            _ => PersistenceErrorKind::Other,
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => PersistenceErrorKind::Unavailable,
        sqlx::Error::Encode(_)
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::TypeNotFound { .. } => PersistenceErrorKind::Serialization,
        _ => PersistenceErrorKind::Other,
    }
}

/// Convenience alias for data-layer results using `DataError`.
pub type SqlxResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_not_found() {
        assert!(sqlx::Error::RowNotFound.into_data_error().is_not_found());
    }

    #[test]
    fn pool_errors_are_unavailable() {
        let err = sqlx::Error::PoolTimedOut.into_data_error();
        assert_eq!(err.persistence_kind(), Some(PersistenceErrorKind::Unavailable));
        let err = sqlx::Error::PoolClosed.into_data_error();
        assert_eq!(err.persistence_kind(), Some(PersistenceErrorKind::Unavailable));
    }

    #[test]
    fn decode_errors_are_serialization() {
        let err = sqlx::Error::Decode("bad integer".into()).into_data_error();
        assert_eq!(err.persistence_kind(), Some(PersistenceErrorKind::Serialization));
    }
}

//! Domain error taxonomy.

use thiserror::Error;

/// Typed error values raised by domain services.
///
/// Services return these; the HTTP boundary translates them into response
/// codes. Persistence failures that are not part of the taxonomy surface as
/// `Internal` without leaking detail to callers.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Referenced entity is absent or soft-deleted.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation (MAC address, plate, email, enterprise name).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authenticated but not authorized for this entity.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Well-formed request with invalid domain values.
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// Unanticipated failure; logged, never surfaced verbatim.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if db_err.code().as_deref() == Some("23505") {
                    DomainError::Conflict("Resource already exists".into())
                } else if db_err.code().as_deref() == Some("23503") {
                    DomainError::NotFound("Referenced resource not found".into())
                } else {
                    DomainError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => DomainError::Internal(format!("Database error: {}", err)),
        }
    }
}

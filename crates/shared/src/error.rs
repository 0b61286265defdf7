//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// This is the closed set of error kinds that crosses the kernel boundary.
/// Each kind maps to a distinct status when surfaced over HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (e.g., duplicate account).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Validation error (bad input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Accounting constraint violation (entry direction, inverted balance).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database error, including trigger aborts.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Validation(_) => 400,
            Self::ConstraintViolation(_) => 422,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("x".into()).status_code(), 404);
        assert_eq!(AppError::Conflict("x".into()).status_code(), 409);
        assert_eq!(AppError::Validation("x".into()).status_code(), 400);
        assert_eq!(AppError::ConstraintViolation("x".into()).status_code(), 422);
        assert_eq!(AppError::Database("x".into()).status_code(), 500);
        assert_eq!(AppError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound("x".into()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::ConstraintViolation("x".into()).error_code(),
            "CONSTRAINT_VIOLATION"
        );
        assert_eq!(AppError::Database("x".into()).error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Validation("transaction must have at least 2 entries".into());
        assert_eq!(
            err.to_string(),
            "Validation error: transaction must have at least 2 entries"
        );
    }
}

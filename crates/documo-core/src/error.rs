//! Application error taxonomy
//!
//! Every error variant carries metadata (HTTP status, machine-readable code,
//! log level, recoverability) so transports and loggers never have to guess.
//! Validation failures keep the full list of violated rules, never just the
//! first one.

use thiserror::Error;

/// Severity used when an error is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Warn,
    Error,
}

/// Metadata exposed by every application error.
pub trait ErrorMetadata {
    /// Short classification, e.g. "not_found" or "validation".
    fn error_type(&self) -> &'static str;
    /// Machine-readable code for programmatic handling.
    fn error_code(&self) -> &'static str;
    /// HTTP status code this error maps to.
    fn http_status_code(&self) -> u16;
    /// Severity for logging.
    fn log_level(&self) -> LogLevel;
    /// Whether a retry is meaningful.
    fn is_recoverable(&self) -> bool;
    /// Whether details must be hidden from clients.
    fn is_sensitive(&self) -> bool;
    /// Message safe to return to a client.
    fn client_message(&self) -> String;
    /// Full message for logs and non-production responses.
    fn detailed_message(&self) -> String;
    /// Suggested client action, when there is a useful one.
    fn suggested_action(&self) -> Option<&'static str>;
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// One or more validation rules failed. Carries every violated rule.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Decryption authenticated transport-level bytes but the tag did not
    /// verify: tampering or wrong key. Retrying without a new key is useless.
    #[error("content integrity verification failed")]
    Integrity,

    /// A document is missing material it is expected to have (key, URL).
    #[error("{0}")]
    Configuration(String),

    /// Network or storage failure while fetching or persisting. Retriable.
    #[error("{0}")]
    Transient(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[cfg(feature = "sqlx")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Email dispatch failure. Never rolls back committed state.
    #[error("email dispatch failed: {0}")]
    Email(String),

    #[error("{0}")]
    Internal(String),
}

impl ErrorMetadata for AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Integrity => "integrity",
            AppError::Configuration(_) => "configuration",
            AppError::Transient(_) => "transient",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            #[cfg(feature = "sqlx")]
            AppError::Database(_) => "database",
            AppError::Email(_) => "email",
            AppError::Internal(_) => "internal",
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::Integrity => "INTEGRITY_FAILED",
            AppError::Configuration(_) => "MISSING_MATERIAL",
            AppError::Transient(_) => "TRANSIENT_FAILURE",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            #[cfg(feature = "sqlx")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Email(_) => "EMAIL_DISPATCH_FAILED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn http_status_code(&self) -> u16 {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::PayloadTooLarge(_) => 413,
            AppError::Integrity => 422,
            AppError::Configuration(_) => 409,
            AppError::Transient(_) => 503,
            #[cfg(feature = "sqlx")]
            AppError::Database(_) => 500,
            AppError::Email(_) | AppError::Internal(_) => 500,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) | AppError::NotFound(_) => {
                LogLevel::Debug
            }
            AppError::Integrity
            | AppError::Configuration(_)
            | AppError::Transient(_)
            | AppError::PayloadTooLarge(_)
            | AppError::Email(_) => LogLevel::Warn,
            #[cfg(feature = "sqlx")]
            AppError::Database(_) => LogLevel::Error,
            AppError::Internal(_) => LogLevel::Error,
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            AppError::Transient(_) | AppError::Email(_) => true,
            #[cfg(feature = "sqlx")]
            AppError::Database(_) => true,
            _ => false,
        }
    }

    fn is_sensitive(&self) -> bool {
        match self {
            #[cfg(feature = "sqlx")]
            AppError::Database(_) => true,
            AppError::Internal(_) => true,
            _ => false,
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(errors) => errors.join("; "),
            // Hide cryptographic internals from the client.
            AppError::Integrity => "Document could not be decrypted".to_string(),
            #[cfg(feature = "sqlx")]
            AppError::Database(_) => "A storage error occurred".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }

    fn detailed_message(&self) -> String {
        self.to_string()
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Transient(_) => Some("Retry after a short delay"),
            #[cfg(feature = "sqlx")]
            AppError::Database(_) => Some("Retry after a short delay"),
            AppError::Validation(_) => Some("Fix the reported problems and upload again"),
            AppError::Integrity => Some("Re-upload the document"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_keeps_every_error() {
        let err = AppError::Validation(vec!["too big".into(), "wrong type".into()]);
        let msg = err.client_message();
        assert!(msg.contains("too big"));
        assert!(msg.contains("wrong type"));
    }

    #[test]
    fn test_integrity_is_not_recoverable() {
        assert!(!AppError::Integrity.is_recoverable());
        assert_eq!(AppError::Integrity.error_code(), "INTEGRITY_FAILED");
    }

    #[test]
    fn test_transient_is_recoverable() {
        let err = AppError::Transient("connection reset".into());
        assert!(err.is_recoverable());
        assert_eq!(err.http_status_code(), 503);
    }

    #[test]
    fn test_internal_hides_details_from_clients() {
        let err = AppError::Internal("pool exhausted at pg:5432".into());
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("pg:5432"));
        assert!(err.detailed_message().contains("pg:5432"));
    }
}

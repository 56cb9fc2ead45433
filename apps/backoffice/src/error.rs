//! # API Error Type
//!
//! Unified error type for back office commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Shelf                                  │
//! │                                                                         │
//! │  Caller (CLI / UI)           Rust Backend                               │
//! │  ─────────────────           ────────────                               │
//! │                                                                         │
//! │  update_product(...)                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ├── session.require(cap)? ── CoreError::Forbidden ──┐    │  │
//! │  │         │                                                   │    │  │
//! │  │         ├── repository call? ─────── DbError ───────────────┤    │  │
//! │  │         │                                                   ▼    │  │
//! │  │         │                                              ApiError ─┼─►│
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "FORBIDDEN", "message": "Role client is not allowed ..." }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal details are logged and replaced by generic messages here.

use serde::Serialize;
use shelf_core::CoreError;
use shelf_db::{DbError, SaleError};

use crate::config::ConfigError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Username already taken
    Conflict,

    /// Bad credentials
    Unauthorized,

    /// Session lacks the capability
    Forbidden,

    /// Not enough stock for the sale
    InsufficientStock,

    /// Store busy; retrying later may succeed
    TransientFailure,

    /// Database operation failed
    DatabaseError,

    /// Startup/configuration problem
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates the login failure error. Deliberately the same for unknown
    /// user and wrong password.
    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Invalid username or password")
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::Invalid(e) => ApiError::validation(e.to_string()),
            DbError::Busy(e) => {
                tracing::warn!("Database busy: {}", e);
                ApiError::new(ErrorCode::TransientFailure, "Database is busy, try again")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::TransientFailure, "Database connection failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::TransientFailure, "Database pool exhausted")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::Forbidden { .. } => ApiError::new(ErrorCode::Forbidden, err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::Overflow(what) => {
                tracing::error!("Arithmetic overflow computing {}", what);
                ApiError::internal(format!("Totals too large to compute: {}", what))
            }
        }
    }
}

/// Converts sale engine errors to API errors.
///
/// `register_sale` itself reports these inside `SaleResponse`; this is for
/// callers that use the engine directly.
impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::NotFound { product_id } => ApiError::not_found("Product", product_id),
            SaleError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            SaleError::InvalidQuantity { .. } => ApiError::validation(err.to_string()),
            SaleError::TotalOverflow { .. } => ApiError::validation(err.to_string()),
            SaleError::TransientFailure { .. } => {
                ApiError::new(ErrorCode::TransientFailure, "Store is busy, try the sale again")
            }
            SaleError::Storage(e) => ApiError::from(e),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::{Capability, Role};

    #[test]
    fn test_forbidden_maps_to_forbidden() {
        let err = ApiError::from(CoreError::Forbidden {
            role: Role::Client,
            capability: Capability::RegisterSale,
        });
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(err.message.contains("client"));
    }

    #[test]
    fn test_busy_is_transient() {
        let err = ApiError::from(DbError::Busy("database is locked".into()));
        assert_eq!(err.code, ErrorCode::TransientFailure);
    }

    #[test]
    fn test_query_details_are_hidden() {
        let err = ApiError::from(DbError::QueryFailed("no such column: secret".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("secret"));
    }

    #[test]
    fn test_overflow_is_internal() {
        let err = ApiError::from(CoreError::Overflow("stock value".into()));
        assert_eq!(err.code, ErrorCode::Internal);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::not_found("Product", 42)).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: 42");
    }
}

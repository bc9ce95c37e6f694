//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Folio                                  │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Form invalid? ──── ValidationError::Required ─────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Backend failed? ── ClientError::Api { detail } ── ApiError ───►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Shown to the user as:                                                  │
//! │    { "code": "ORDER_FAILED", "message": "out of stock" }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage problems never show up here: the cart store degrades to memory
//! instead of failing a command.

use folio_client::ClientError;
use folio_core::{CoreError, ValidationError};
use folio_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// API error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "name is required"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
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
    /// Book or cart line not found
    NotFound,

    /// Input validation failed; nothing was sent
    ValidationError,

    /// Catalog could not be loaded (network, non-2xx, malformed payload)
    CatalogUnavailable,

    /// A newer catalog request replaced this one before it finished
    Superseded,

    /// Orders endpoint refused or could not be reached
    OrderFailed,

    /// An order submission is already outstanding
    CheckoutInProgress,

    /// Checkout attempted with nothing in the cart
    EmptyCart,

    /// Bad configuration (backend URL, config file)
    ConfigError,

    /// Storage failure outside the cart store
    StorageError,

    /// Unexpected internal failure
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
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a catalog error carrying the message shown in the view.
    pub fn catalog(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CatalogUnavailable, message)
    }

    /// Creates an error for a catalog request replaced by a newer one.
    pub fn superseded() -> Self {
        ApiError::new(ErrorCode::Superseded, "A newer catalog request replaced this one")
    }

    /// Creates an order failure carrying the server's message.
    pub fn order_failed(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::OrderFailed, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BookNotInCart(id) => ApiError::not_found("Cart item", &id),
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, "Your cart is empty"),
            CoreError::InvalidPrice { reason } => {
                tracing::error!("Invalid price reached the storefront: {}", reason);
                ApiError::internal("Book has an invalid price")
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Converts client errors to API errors.
///
/// Messages come from [`ClientError::user_message`], so a backend `detail`
/// reaches the user verbatim.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match &err {
            ClientError::NotFound(id) => ApiError::not_found("Book", id),
            e if e.is_config_error() => ApiError::new(ErrorCode::ConfigError, e.to_string()),
            e => ApiError::catalog(e.user_message()),
        }
    }
}

/// Converts storage errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Storage error: {}", err);
        ApiError::new(ErrorCode::StorageError, "Cart storage failed")
    }
}

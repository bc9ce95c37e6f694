//! # folio-client: Bookstore Backend Client for Folio
//!
//! Talks to the bookstore HTTP API and turns its answers into view state.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Query Layer                              │
//! │                                                                         │
//! │  Storefront view (home / shop / book detail)                            │
//! │       │  QueryParams | BookId                                           │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  LiveQuery (live.rs)                                             │  │
//! │  │  Idle → Loading → Ready(data) | Failed(message)                  │  │
//! │  │  generation per request, late answers discarded                  │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  ApiClient (api.rs)                                              │  │
//! │  │  GET /api/books   GET /api/books/{id}   POST /api/orders         │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ reqwest                                 │
//! │                               ▼                                         │
//! │                    Bookstore backend (default :8000)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`api`] - HTTP client for the catalog and orders endpoints
//! - [`config`] - Backend URL, timeout and storage location (TOML + env)
//! - [`error`] - Client error types and user-facing messages
//! - [`live`] - Latest-request-wins query state
//! - [`query`] - Catalog filter parameters

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod error;
pub mod live;
pub mod query;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{ApiClient, REQUEST_ID_HEADER};
pub use config::{BackendSettings, ClientConfig, StorageSettings, StorefrontSettings};
pub use error::{ClientError, ClientResult, ORDER_FAILED_MESSAGE};
pub use live::{
    BookDetailQuery, BookListQuery, Generation, LiveQuery, QueryState, RequestTracker, Snapshot,
};
pub use query::{QueryParams, QueryValue};

//! # folio-store: Durable Cart Storage for Folio
//!
//! Keeps the storefront cart across sessions. The cart lives in memory as a
//! [`folio_core::Cart`] and is written in full, as a JSON array, to a
//! SQLite key/value table after every change.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Folio Data Flow                                  │
//! │                                                                         │
//! │  Storefront command (add_to_cart)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   folio-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │  CartStore    │    │   Storage     │    │  Migrations  │   │   │
//! │  │   │ (cart_store)  │───►│ Sqlite|Memory │    │  (embedded)  │   │   │
//! │  │   │ watch channel │    │ read / write  │    │ 001_storage  │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/folio/folio.db                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - SQLite pool and the key/value table
//! - [`storage`] - Backend enum with the in-memory fallback
//! - [`cart_store`] - The cart state cell
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_store::{CartStore, StorageConfig};
//!
//! let store = CartStore::open(StorageConfig::new("folio.db"), "cart").await;
//! let cart = store.update(|cart| cart.add(&book)).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart_store;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart_store::{CartStore, DEFAULT_CART_KEY};
pub use error::{StoreError, StoreResult};
pub use pool::{SqliteStorage, StorageConfig};
pub use storage::{MemoryStorage, Storage};

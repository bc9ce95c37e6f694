//! # State Module
//!
//! Manages application state for the storefront.
//!
//! Separate state types rather than one `AppState` struct, so each command
//! declares exactly what it touches:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │ CatalogState │  │  CartState   │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  ApiClient   │  │  CartStore   │  │  ClientConfig    │              │
//! │  │  list query  │  │  (SQLite or  │  │  currency        │              │
//! │  │  detail qry  │  │   memory)    │  │  tax rate        │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CatalogState: clones share the HTTP pool and query state            │
//! │  • CartState: store serializes writers internally                      │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod config;

pub use cart::CartState;
pub use catalog::CatalogState;
pub use config::ConfigState;

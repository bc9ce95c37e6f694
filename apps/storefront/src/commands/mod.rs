//! # Commands Module
//!
//! Every user intent the storefront supports.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── catalog.rs   ◄─── home, shop, book_details
//! ├── cart.rs      ◄─── Cart manipulation
//! └── checkout.rs  ◄─── Order placement and confirmation
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  $ folio cart add 42                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn add_to_cart(                                                  │
//! │      catalog: &CatalogState,  ◄── only the state it needs               │
//! │      cart: &CartState,                                                  │
//! │      book_id: &str,                                                     │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rendered as text, or as JSON with --json                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;

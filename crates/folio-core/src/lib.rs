//! # folio-core: Pure Business Logic for Folio
//!
//! The cart state machine, money math and order schemas for the bookstore
//! storefront, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Folio Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Storefront views / CLI                         │   │
//! │  │     Home ──► Shop ──► Book ──► Cart ──► Checkout ──► Order      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   order   │  │   │
//! │  │   │   Book    │  │   Money   │  │   Cart    │  │ OrderReq  │  │   │
//! │  │   │ Quantity  │  │  TaxRate  │  │  Totals   │  │ Customer  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────┐   ┌───────────────▼────────────────┐  │
//! │  │  folio-store (cart entry)   │   │  folio-client (backend HTTP)   │  │
//! │  └─────────────────────────────┘   └────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Book, BookId, Quantity
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart reducers and derived totals
//! - [`order`] - Customer details and the order payload
//! - [`error`] - Domain error types
//! - [`validation`] - Checkout and input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::{Book, BookId, Cart, Money};
//!
//! let book = Book::new(BookId::from("dune"), "Dune", "Frank Herbert", Money::from_cents(1000));
//!
//! let cart = Cart::new().add(&book).add(&book);
//! let totals = cart.totals();
//!
//! assert_eq!(totals.subtotal.cents(), 2000);
//! assert_eq!(totals.tax.cents(), 140);
//! assert_eq!(totals.total.cents(), 2140);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{compute_totals, compute_totals_with_rate, Cart, CartItem, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{CustomerDetails, OrderConfirmation, OrderLine, OrderRequest, OrderStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied to every storefront order, in basis points (7%).
pub const STOREFRONT_TAX_RATE_BPS: u32 = 700;

/// Maximum length of a free-text catalog search.
pub const MAX_SEARCH_LENGTH: usize = 200;

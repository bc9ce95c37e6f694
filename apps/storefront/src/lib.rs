//! # Folio Storefront Library
//!
//! Core library for the Folio bookstore storefront.
//! Builds state, exposes the view commands, and runs the `folio` CLI.
//!
//! ## Module Organization
//! ```text
//! folio_storefront/
//! ├── lib.rs          ◄─── You are here (state setup, logging)
//! ├── cli.rs          ◄─── clap definitions and dispatch
//! ├── render.rs       ◄─── Plain-text rendering of views
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── catalog.rs  ◄─── API client and live queries
//! │   ├── cart.rs     ◄─── Cart store wrapper
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── home, shop, book_details
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   └── checkout.rs ◄─── Order placement
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Startup                                │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: info,folio=debug,sqlx=warn (override with RUST_LOG)      │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • folio.toml, then FOLIO_* environment variables                    │
//! │                                                                         │
//! │  3. Open Cart Storage ────────────────────────────────────────────────► │
//! │     • SQLite with WAL mode, migrations applied                          │
//! │     • Falls back to an in-memory cart if the file can't be used         │
//! │                                                                         │
//! │  4. Initialize State Objects ─────────────────────────────────────────► │
//! │     • CatalogState, CartState, ConfigState, Checkout                    │
//! │                                                                         │
//! │  5. Run the requested command ────────────────────────────────────────► │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod render;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

use folio_client::ClientConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::checkout::Checkout;
use crate::error::ApiError;
use crate::state::{CartState, CatalogState, ConfigState};

/// Every state object a storefront session uses.
#[derive(Debug)]
pub struct Storefront {
    pub config: ConfigState,
    pub catalog: CatalogState,
    pub cart: CartState,
    pub checkout: Checkout,
}

impl Storefront {
    /// Builds state from configuration.
    ///
    /// ## Errors
    /// Only an unusable backend URL fails startup. Cart storage problems
    /// degrade to an in-memory cart instead.
    pub async fn init(client: ClientConfig) -> Result<Self, ApiError> {
        let catalog = CatalogState::new(&client)?;
        let cart = CartState::open(&client).await;

        if !cart.is_persistent() {
            warn!("Cart is not being saved this session");
        }

        info!(
            backend = %catalog.api().base_url(),
            items = cart.with_cart(|c| c.item_count()),
            "Storefront state initialized"
        );

        Ok(Storefront {
            config: ConfigState::new(client),
            catalog,
            cart,
            checkout: Checkout::new(),
        })
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=folio_client=trace` - Trace for one crate only
/// - Default: `info,folio=debug,sqlx=warn`
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,folio=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

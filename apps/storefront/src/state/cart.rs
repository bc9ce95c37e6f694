//! # Cart State
//!
//! Holds the session's cart store.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  User Action              Command                 Cart Reducer          │
//! │  ───────────              ───────                 ────────────          │
//! │                                                                         │
//! │  Add to Cart ────────────► add_to_cart() ───────► cart.add(&book)      │
//! │                                                                         │
//! │  "+" / "-" ──────────────► increment_item() ────► cart.increment(id)   │
//! │                            decrement_item() ────► cart.decrement(id)   │
//! │                                                                         │
//! │  Remove ─────────────────► remove_from_cart() ──► cart.remove(id)      │
//! │                                                                         │
//! │  Order placed ───────────► place_order() ───────► store.clear()        │
//! │                                                                         │
//! │  Every reducer result is published and written in full before the      │
//! │  command returns.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use folio_client::ClientConfig;
use folio_core::Cart;
use folio_store::{CartStore, StorageConfig};
use tokio::sync::watch;
use tracing::{info, warn};

/// Cart state for the storefront.
///
/// Clones share the same underlying store.
#[derive(Debug, Clone)]
pub struct CartState {
    store: CartStore,
}

impl CartState {
    pub fn new(store: CartStore) -> Self {
        CartState { store }
    }

    /// Opens the cart at the configured storage location.
    ///
    /// Never fails. If the database directory can't be created or the file
    /// can't be opened, the cart lives in memory for this session.
    pub async fn open(config: &ClientConfig) -> Self {
        let path = config.storage_path();
        ensure_parent_dir(&path);

        info!(?path, key = config.cart_key(), "Opening cart storage");
        let store = CartStore::open(StorageConfig::new(path), config.cart_key()).await;

        CartState::new(store)
    }

    /// Session-only cart, nothing written to disk.
    pub async fn in_memory() -> Self {
        CartState::new(CartStore::in_memory(folio_store::DEFAULT_CART_KEY).await)
    }

    /// Executes a function with read access to the current cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.store.cart())
    }

    /// Current cart snapshot.
    pub fn snapshot(&self) -> Cart {
        self.store.cart()
    }

    /// Applies a reducer and persists the result.
    pub async fn update<F>(&self, f: F) -> Cart
    where
        F: FnOnce(&Cart) -> Cart,
    {
        self.store.update(f).await
    }

    /// Empties the cart.
    pub async fn clear(&self) {
        self.store.clear().await;
    }

    /// Receives the cart after every change.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.store.subscribe()
    }

    /// False if the cart is not being saved this session.
    pub fn is_persistent(&self) -> bool {
        self.store.is_persistent()
    }
}

fn ensure_parent_dir(path: &Path) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!(?parent, error = %e, "Could not create cart storage directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Book, BookId, Money};

    #[tokio::test]
    async fn test_cart_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.storage.path = Some(dir.path().join("nested").join("folio.db"));

        let book = Book::new(BookId::from(1), "Dune", "Frank Herbert", Money::from_cents(1999));

        let state = CartState::open(&config).await;
        assert!(state.is_persistent());
        state.update(|cart| cart.add(&book).add(&book)).await;
        drop(state);

        let reopened = CartState::open(&config).await;
        let quantity = reopened.with_cart(|cart| cart.total_quantity());
        assert_eq!(quantity, 2);
    }

    #[tokio::test]
    async fn test_in_memory_cart() {
        let state = CartState::in_memory().await;
        assert!(!state.is_persistent());

        let book = Book::new(BookId::from("b"), "B", "Y", Money::from_cents(750));
        let mut rx = state.subscribe();
        state.update(|cart| cart.add(&book)).await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().item_count(), 1);

        state.clear().await;
        assert!(state.snapshot().is_empty());
    }
}

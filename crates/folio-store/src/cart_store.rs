//! # Cart Store
//!
//! The one shared mutable resource of the storefront: the current cart,
//! held in memory and mirrored in full to storage on every change.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CartStore                                       │
//! │                                                                         │
//! │  open(config, "cart")                                                   │
//! │       │                                                                 │
//! │       ├── SQLite ok? ──────────► Storage::Sqlite                        │
//! │       └── SQLite failed? ──────► Storage::Memory  (warn, keep going)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load()  ── missing / corrupt entry ──► empty cart (warn)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  replace(cart) / update(|c| c.add(&book))                               │
//! │       │                                                                 │
//! │       ├── 1. swap in-memory value (watch channel) ◄── subscribers      │
//! │       └── 2. write FULL JSON array under the key                        │
//! │                 │                                                       │
//! │                 └── write failed? warn, degrade to memory for the       │
//! │                     rest of the session; the new value stays visible    │
//! │                                                                         │
//! │  Nothing here returns an error to the caller.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Mutations are serialized by an async mutex around the storage handle, so
//! the persisted value always matches the last value published to
//! subscribers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use folio_core::Cart;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::pool::{SqliteStorage, StorageConfig};
use crate::storage::Storage;

/// Storage key used by the storefront for its cart.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Handle to the session's cart. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    key: String,
    storage: Mutex<Storage>,
    persistent: AtomicBool,
    state_tx: watch::Sender<Cart>,
}

impl CartStore {
    /// Opens the store over a SQLite file and loads the persisted cart.
    ///
    /// Never fails: if the database can't be opened the store runs on
    /// in-memory storage for this session.
    pub async fn open(config: StorageConfig, key: impl Into<String>) -> Self {
        let storage = match SqliteStorage::connect(config).await {
            Ok(sqlite) => Storage::Sqlite(sqlite),
            Err(e) => {
                warn!(error = %e, "Cart storage unavailable - cart will not persist this session");
                Storage::memory()
            }
        };

        Self::with_storage(storage, key).await
    }

    /// Builds a store over an already-open backend and loads from it.
    pub async fn with_storage(storage: Storage, key: impl Into<String>) -> Self {
        let (state_tx, _) = watch::channel(Cart::new());

        let store = CartStore {
            inner: Arc::new(Inner {
                key: key.into(),
                persistent: AtomicBool::new(storage.is_persistent()),
                storage: Mutex::new(storage),
                state_tx,
            }),
        };

        store.load().await;
        store
    }

    /// A store with no durable backing at all.
    pub async fn in_memory(key: impl Into<String>) -> Self {
        Self::with_storage(Storage::memory(), key).await
    }

    /// Re-reads the persisted cart and publishes it.
    ///
    /// ## Fallbacks
    /// - No entry → empty cart
    /// - Entry is not a valid cart array → empty cart (warned)
    /// - Storage read failed → empty cart, store degrades to memory
    pub async fn load(&self) -> Cart {
        let mut storage = self.inner.storage.lock().await;

        let cart = match storage.read(&self.inner.key).await {
            Ok(Some(json)) => match serde_json::from_str::<Cart>(&json) {
                Ok(cart) => cart,
                Err(e) => {
                    warn!(key = %self.inner.key, error = %e, "Persisted cart is unreadable - starting empty");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(key = %self.inner.key, error = %e, "Failed to read persisted cart - starting empty");
                self.degrade(&mut storage);
                Cart::new()
            }
        };

        debug!(
            key = %self.inner.key,
            items = cart.item_count(),
            persistent = self.is_persistent(),
            "Cart loaded"
        );

        self.inner.state_tx.send_replace(cart.clone());
        cart
    }

    /// Current cart snapshot.
    pub fn cart(&self) -> Cart {
        self.inner.state_tx.borrow().clone()
    }

    /// Receives every published cart, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.state_tx.subscribe()
    }

    /// Replaces the whole cart and persists it.
    pub async fn replace(&self, cart: Cart) {
        let mut storage = self.inner.storage.lock().await;
        self.commit(&mut storage, cart).await;
    }

    /// Applies a pure reducer to the current cart and persists the result.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let cart = store.update(|cart| cart.add(&book)).await;
    /// ```
    pub async fn update<F>(&self, f: F) -> Cart
    where
        F: FnOnce(&Cart) -> Cart,
    {
        let mut storage = self.inner.storage.lock().await;
        let next = f(&*self.inner.state_tx.borrow());
        self.commit(&mut storage, next.clone()).await;
        next
    }

    /// Empties the cart.
    pub async fn clear(&self) {
        self.replace(Cart::new()).await;
    }

    /// False once the store has fallen back to memory.
    pub fn is_persistent(&self) -> bool {
        self.inner.persistent.load(Ordering::SeqCst)
    }

    /// Storage key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    async fn commit(&self, storage: &mut Storage, cart: Cart) {
        let json = match serde_json::to_string(&cart) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart - keeping it in memory only");
                None
            }
        };

        self.inner.state_tx.send_replace(cart);

        let Some(json) = json else { return };

        if let Err(e) = storage.write(&self.inner.key, &json).await {
            warn!(key = %self.inner.key, error = %e, "Failed to persist cart - switching to memory storage");
            self.degrade(storage);
            // Memory writes only fail on a poisoned lock; nothing left to fall back to
            let _ = storage.write(&self.inner.key, &json).await;
        }
    }

    fn degrade(&self, storage: &mut Storage) {
        if storage.is_persistent() {
            info!(key = %self.inner.key, "Cart store degraded to in-memory storage");
        }
        *storage = Storage::memory();
        self.inner.persistent.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

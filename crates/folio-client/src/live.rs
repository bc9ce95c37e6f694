//! # Live Queries
//!
//! Server-backed view state that only ever shows the answer to the most
//! recent request.
//!
//! ## Stale Response Suppression
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request("dune")      gen 1 ──────────────────────────────► (slow)      │
//! │  request("hobbit")    gen 2 ────────► Ready(hobbit)                     │
//! │                                                   gen 1 lands late      │
//! │                                                   is_current(1)? NO     │
//! │                                                   → dropped             │
//! │                                                                         │
//! │  Published state: Idle → Loading → Ready(hobbit)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! In-flight requests are never aborted; a superseded result is simply
//! discarded when it arrives. The generation check and the publish happen
//! under one lock, so a late result cannot slip in between them.
//!
//! Every published state is stamped with its generation. A caller waiting
//! on `wait_for(gen 1)` gets `None` once gen 2 starts, never gen 2's books.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use folio_core::{Book, BookId};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::query::QueryParams;

// =============================================================================
// Request Tracker
// =============================================================================

/// Position of a request in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Hands out increasing generations and remembers the latest.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding every earlier one.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if no newer request has started since `generation`.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }
}

// =============================================================================
// Query State
// =============================================================================

/// What a view shows for a live query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready(T),
    /// Last request failed; carries the message for the user.
    Failed(String),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// =============================================================================
// Live Query
// =============================================================================

type BoxFuture<T> = Pin<Box<dyn Future<Output = ClientResult<T>> + Send>>;
type FetchFn<P, T> = dyn Fn(P) -> BoxFuture<T> + Send + Sync;

/// Live catalog list, keyed by filter parameters.
pub type BookListQuery = LiveQuery<QueryParams, Vec<Book>>;

/// Live book detail, keyed by book id.
pub type BookDetailQuery = LiveQuery<BookId, Book>;

/// Published state, stamped with the request it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub generation: Generation,
    pub state: QueryState<T>,
}

/// A request/response cell whose published state always belongs to the
/// latest request.
///
/// Cheap to clone; clones observe the same state.
pub struct LiveQuery<P, T> {
    inner: Arc<LiveQueryInner<P, T>>,
}

struct LiveQueryInner<P, T> {
    name: &'static str,
    tracker: RequestTracker,
    current: Mutex<Option<P>>,
    state_tx: watch::Sender<Snapshot<T>>,
    fetch: Box<FetchFn<P, T>>,
}

impl<P, T> Clone for LiveQuery<P, T> {
    fn clone(&self) -> Self {
        LiveQuery {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, T> LiveQuery<P, T>
where
    P: Clone + PartialEq + fmt::Debug + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates a query around an async fetch function.
    pub fn new<F, Fut>(name: &'static str, fetch: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let (state_tx, _) = watch::channel(Snapshot {
            generation: Generation(0),
            state: QueryState::Idle,
        });
        let fetch: Box<FetchFn<P, T>> =
            Box::new(move |params: P| -> BoxFuture<T> { Box::pin(fetch(params)) });

        LiveQuery {
            inner: Arc::new(LiveQueryInner {
                name,
                tracker: RequestTracker::new(),
                current: Mutex::new(None),
                state_tx,
                fetch,
            }),
        }
    }

    /// Requests data for `params` and returns the generation whose result
    /// answers it.
    ///
    /// When `params` equals the current parameters and the query is already
    /// loading or holds data, nothing is fetched and the generation already
    /// in flight (or published) is returned.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn request(&self, params: P) -> Generation {
        {
            let current = self.lock_current();
            let snapshot = self.inner.state_tx.borrow();
            let settled = matches!(snapshot.state, QueryState::Loading | QueryState::Ready(_));
            if settled && current.as_ref() == Some(&params) {
                debug!(query = self.inner.name, ?params, "Parameters unchanged, not refetching");
                return snapshot.generation;
            }
        }

        self.start(params)
    }

    /// Re-issues the current parameters even if nothing changed.
    pub fn refresh(&self) -> Option<Generation> {
        let params = self.lock_current().clone()?;
        Some(self.start(params))
    }

    /// Current published state.
    pub fn state(&self) -> QueryState<T> {
        self.inner.state_tx.borrow().state.clone()
    }

    /// Parameters of the latest request.
    pub fn params(&self) -> Option<P> {
        self.lock_current().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.inner.state_tx.subscribe()
    }

    /// Waits for the outcome of `generation`.
    ///
    /// Returns `None` once a newer request supersedes it; the caller never
    /// sees another request's result.
    pub async fn wait_for(&self, generation: Generation) -> Option<QueryState<T>> {
        let tracker = &self.inner.tracker;
        let mut rx = self.subscribe();

        let outcome = rx
            .wait_for(|snapshot| {
                let settled = snapshot.generation == generation && !snapshot.state.is_loading();
                settled || !tracker.is_current(generation)
            })
            .await
            .ok()
            .and_then(|snapshot| {
                let own = snapshot.generation == generation && !snapshot.state.is_loading();
                own.then(|| snapshot.state.clone())
            });
        outcome
    }

    fn start(&self, params: P) -> Generation {
        let generation = {
            let mut current = self.lock_current();
            let generation = self.inner.tracker.begin();
            *current = Some(params.clone());
            self.inner.state_tx.send_replace(Snapshot {
                generation,
                state: QueryState::Loading,
            });
            generation
        };

        debug!(
            query = self.inner.name,
            generation = generation.get(),
            ?params,
            "Starting request"
        );

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = (inner.fetch)(params).await;
            inner.settle(generation, result);
        });
        generation
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<P>> {
        self.inner.lock_current()
    }
}

impl<P, T> LiveQueryInner<P, T> {
    fn lock_current(&self) -> MutexGuard<'_, Option<P>> {
        // State stays consistent even if a holder panicked
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes a finished request, unless a newer one has started.
    fn settle(&self, generation: Generation, result: ClientResult<T>) {
        let _guard = self.lock_current();

        if !self.tracker.is_current(generation) {
            debug!(
                query = self.name,
                generation = generation.get(),
                "Discarding stale response"
            );
            return;
        }

        let state = match result {
            Ok(data) => QueryState::Ready(data),
            Err(err) => {
                warn!(query = self.name, error = %err, "Request failed");
                QueryState::Failed(err.user_message())
            }
        };
        self.state_tx.send_replace(Snapshot { generation, state });
    }
}

impl<P, T> fmt::Debug for LiveQuery<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveQuery")
            .field("name", &self.inner.name)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Catalog Queries
// =============================================================================

impl LiveQuery<QueryParams, Vec<Book>> {
    /// Book list backed by `GET /api/books`.
    pub fn book_list(api: ApiClient) -> Self {
        LiveQuery::new("book_list", move |params: QueryParams| {
            let api = api.clone();
            async move { api.fetch_books(&params).await }
        })
    }
}

impl LiveQuery<BookId, Book> {
    /// Single book backed by `GET /api/books/{id}`.
    pub fn book_detail(api: ApiClient) -> Self {
        LiveQuery::new("book_detail", move |id: BookId| {
            let api = api.clone();
            async move { api.fetch_book(&id).await }
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{dune, serve};
    use crate::error::ClientError;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Echoes `params` back after `delay_ms`.
    fn delayed_echo(calls: Arc<AtomicUsize>) -> LiveQuery<(u64, &'static str), String> {
        LiveQuery::new("echo", move |(delay_ms, label): (u64, &'static str)| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(label.to_string())
            }
        })
    }

    #[test]
    fn test_tracker_supersedes_older_generations() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        assert!(tracker.is_current(first));

        let second = tracker.begin();
        assert!(second > first);
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[tokio::test]
    async fn test_late_response_is_discarded() {
        let query = delayed_echo(Arc::new(AtomicUsize::new(0)));

        let slow = query.request((100, "slow"));
        let fast = query.request((5, "fast"));
        assert!(fast > slow);

        assert_eq!(
            query.wait_for(fast).await,
            Some(QueryState::Ready("fast".to_string()))
        );
        assert_eq!(query.wait_for(slow).await, None);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(query.state(), QueryState::Ready("fast".to_string()));
    }

    #[tokio::test]
    async fn test_superseded_waiter_never_sees_newer_result() {
        let query = delayed_echo(Arc::new(AtomicUsize::new(0)));

        let first = query.request((200, "dune"));
        let waiter = {
            let query = query.clone();
            tokio::spawn(async move { query.wait_for(first).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = query.request((5, "hobbit"));

        assert_eq!(waiter.await.unwrap(), None);
        assert_eq!(
            query.wait_for(second).await,
            Some(QueryState::Ready("hobbit".to_string()))
        );
    }

    #[tokio::test]
    async fn test_identical_params_do_not_refetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let query = delayed_echo(calls.clone());

        let first = query.request((1, "a"));
        query.wait_for(first).await.unwrap();
        assert_eq!(query.request((1, "a")), first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let refreshed = query.refresh().unwrap();
        assert!(refreshed > first);
        query.wait_for(refreshed).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_loading_then_ready() {
        let query = delayed_echo(Arc::new(AtomicUsize::new(0)));
        assert_eq!(query.state(), QueryState::Idle);
        assert!(query.refresh().is_none());

        let generation = query.request((20, "done"));
        assert!(query.state().is_loading());

        assert_eq!(
            query.wait_for(generation).await,
            Some(QueryState::Ready("done".to_string()))
        );
        let rx = query.subscribe();
        assert_eq!(rx.borrow().generation, generation);
        assert_eq!(query.params(), Some((20, "done")));
    }

    #[tokio::test]
    async fn test_failure_becomes_error_state_and_can_retry() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let query: LiveQuery<u8, u8> = LiveQuery::new("flaky", move |n: u8| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(ClientError::Timeout)
                } else {
                    Ok(n)
                }
            }
        });

        let first = query.request(7);
        let state = query.wait_for(first).await.unwrap();
        assert_eq!(state.error(), Some("The bookstore took too long to respond."));

        // A failed query is not "settled", so the same params fetch again
        let retry = query.request(7);
        assert_ne!(retry, first);
        assert_eq!(query.wait_for(retry).await.unwrap().data(), Some(&7));
    }

    #[tokio::test]
    async fn test_book_list_against_backend() {
        let router = Router::new().route(
            "/api/books",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                if q.get("search").map(String::as_str) == Some("dune") {
                    Json(json!([dune()]))
                } else {
                    Json(json!([]))
                }
            }),
        );
        let api = serve(router).await;

        let list = BookListQuery::book_list(api.clone());
        let generation = list.request(QueryParams::search("dune"));
        let books = list.wait_for(generation).await.unwrap().data().cloned().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");

        let detail = BookDetailQuery::book_detail(api);
        let generation = detail.request(BookId::from(1));
        let state = detail.wait_for(generation).await.unwrap();
        assert_eq!(state.error(), Some("Book not found"));
    }
}

//! # Bookstore API Client
//!
//! HTTP client for the catalog and orders endpoints.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /api/books?<query>   → [Book, ...]                                │
//! │  GET  /api/books/{id}      → Book            404 → ClientError::NotFound│
//! │  POST /api/orders          → { order_id, ... }                          │
//! │                              non-2xx → { detail } → ClientError::Api    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every payload is decoded into the typed schemas from `folio-core`; a
//! malformed book (say, a negative price) fails the whole response with
//! `ClientError::InvalidResponse` instead of leaking inward.

use std::sync::Arc;

use folio_core::{Book, BookId, OrderConfirmation, OrderRequest};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, ORDER_FAILED_MESSAGE};
use crate::query::QueryParams;

/// Header carrying a per-submission id, so the backend can spot duplicates.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Error body returned by the backend on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Bookstore API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = config.backend_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;

        info!(base_url = %base_url, "Bookstore API client ready");

        Ok(Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        })
    }

    /// Base URL requests are made against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Lists books matching `params`. Empty values are not sent.
    pub async fn fetch_books(&self, params: &QueryParams) -> ClientResult<Vec<Book>> {
        let mut url = self.endpoint(&["api", "books"])?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.encoded_pairs());
        }

        debug!(url = %url, "Fetching book list");

        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        self.handle_response(response, "Failed to load books").await
    }

    /// Fetches a single book. A missing book is an error, not `None`.
    pub async fn fetch_book(&self, id: &BookId) -> ClientResult<Book> {
        let url = self.endpoint(&["api", "books", id.as_str()])?;

        debug!(book_id = %id, "Fetching book");

        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id.to_string()));
        }

        self.handle_response(response, "Failed to load book").await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submits an order once. No automatic retry.
    ///
    /// ## Success
    /// Any 2xx answer means the order was accepted. A body without a usable
    /// `order_id` (or no body at all) yields a confirmation without an id,
    /// never an error: reporting it as failed would invite a duplicate order.
    ///
    /// ## Failure Message
    /// A non-2xx answer becomes `ClientError::Api` carrying the backend's
    /// `detail` text, or "Order failed" when there is none.
    pub async fn place_order(&self, order: &OrderRequest) -> ClientResult<OrderConfirmation> {
        let url = self.endpoint(&["api", "orders"])?;
        let request_id = Uuid::new_v4();

        info!(
            request_id = %request_id,
            items = order.items.len(),
            total = %order.total,
            "Submitting order"
        );

        let response = self
            .inner
            .client
            .post(url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(order)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.parse_error(response, ORDER_FAILED_MESSAGE).await);
        }

        let confirmation = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<OrderConfirmation>(&bytes).unwrap_or_else(|e| {
                warn!(request_id = %request_id, error = %e, "Order accepted with unreadable body");
                OrderConfirmation::default()
            }),
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "Order accepted, body not received");
                OrderConfirmation::default()
            }
        };

        info!(
            request_id = %request_id,
            status = status.as_u16(),
            order_id = confirmation.order_id.as_deref().unwrap_or("-"),
            "Order accepted"
        );

        Ok(confirmation)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Appends path segments to the base URL (segments are percent-encoded).
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Decode a 2xx body, or turn anything else into an error.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        fallback: &str,
    ) -> ClientResult<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await.map_err(ClientError::from_transport)?;
            return serde_json::from_slice(&bytes).map_err(|e| {
                warn!(error = %e, "Backend response did not match schema");
                ClientError::InvalidResponse(e.to_string())
            });
        }

        Err(self.parse_error(response, fallback).await)
    }

    /// Builds `ClientError::Api` from a failed response.
    async fn parse_error(&self, response: reqwest::Response, fallback: &str) -> ClientError {
        let status = response.status().as_u16();

        // Body may be empty, HTML, or JSON without a string `detail`
        let message = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<ErrorBody>(&bytes).ok())
            .and_then(|body| match body.detail {
                Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .unwrap_or_else(|| fallback.to_string());

        warn!(status, message = %message, "Backend returned an error");

        ClientError::Api { status, message }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::extract::{Path, RawQuery};
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use folio_core::{Cart, CustomerDetails, Money};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Starts `router` on an ephemeral port and returns a client for it.
    pub(crate) async fn serve(router: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let mut config = ClientConfig::default();
        config.backend.url = format!("http://{addr}");
        ApiClient::new(&config).unwrap()
    }

    pub(crate) fn dune() -> Value {
        json!({
            "id": 1,
            "title": "Dune",
            "author": "Frank Herbert",
            "short_description": "Desert planet.",
            "price": 19.99,
            "rating": 4.5,
            "featured": true
        })
    }

    fn sample_order() -> OrderRequest {
        let book = Book::new(BookId::from(1), "Dune", "Frank Herbert", Money::from_cents(1999));
        let cart = Cart::new().add(&book);
        OrderRequest::from_cart(
            &cart,
            CustomerDetails::new("Ada", "ada@example.com", "1 Main St"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_books_sends_only_non_empty_params() {
        let seen = Arc::new(Mutex::new(None::<String>));
        let recorder = seen.clone();

        let router = Router::new().route(
            "/api/books",
            get(move |RawQuery(query): RawQuery| {
                let recorder = recorder.clone();
                async move {
                    *recorder.lock().unwrap() = query;
                    Json(json!([dune()]))
                }
            }),
        );
        let client = serve(router).await;

        let params = QueryParams::search("dune")
            .with("featured", None::<bool>)
            .with("limit", "");
        let books = client.fetch_books(&params).await.unwrap();

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].price.cents(), 1999);
        assert_eq!(seen.lock().unwrap().as_deref(), Some("search=dune"));
    }

    #[tokio::test]
    async fn test_fetch_books_without_params_has_no_query() {
        let seen = Arc::new(Mutex::new(Some("unset".to_string())));
        let recorder = seen.clone();

        let router = Router::new().route(
            "/api/books",
            get(move |RawQuery(query): RawQuery| {
                let recorder = recorder.clone();
                async move {
                    *recorder.lock().unwrap() = query;
                    Json(json!([]))
                }
            }),
        );
        let client = serve(router).await;

        let books = client.fetch_books(&QueryParams::new()).await.unwrap();
        assert!(books.is_empty());
        assert_eq!(*seen.lock().unwrap(), None);
    }

    #[tokio::test]
    async fn test_fetch_books_rejects_malformed_payload() {
        let router = Router::new().route(
            "/api/books",
            get(|| async { Json(json!([{"id": 1, "title": "Bad", "price": -5}])) }),
        );
        let client = serve(router).await;

        let err = client.fetch_books(&QueryParams::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_fetch_books_server_error() {
        let router = Router::new().route(
            "/api/books",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = serve(router).await;

        let err = client.fetch_books(&QueryParams::new()).await.unwrap_err();
        match &err {
            ClientError::Api { status, message } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "Failed to load books");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_book_by_id() {
        let router = Router::new().route(
            "/api/books/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "1" {
                    Ok(Json(dune()))
                } else {
                    Err((StatusCode::NOT_FOUND, Json(json!({"detail": "Book not found"}))))
                }
            }),
        );
        let client = serve(router).await;

        let book = client.fetch_book(&BookId::from(1)).await.unwrap();
        assert_eq!(book.title, "Dune");

        let err = client.fetch_book(&BookId::parse("404")).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(ref id) if id == "404"));
    }

    #[tokio::test]
    async fn test_place_order_success() {
        let received = Arc::new(Mutex::new(None::<(Value, bool)>));
        let recorder = received.clone();

        let router = Router::new().route(
            "/api/orders",
            post(move |headers: AxumHeaders, Json(body): Json<Value>| {
                let recorder = recorder.clone();
                async move {
                    let has_request_id = headers.contains_key(REQUEST_ID_HEADER);
                    *recorder.lock().unwrap() = Some((body, has_request_id));
                    Json(json!({"order_id": "ord_1", "status": "paid"}))
                }
            }),
        );
        let client = serve(router).await;

        let confirmation = client.place_order(&sample_order()).await.unwrap();
        assert_eq!(confirmation.order_id.as_deref(), Some("ord_1"));

        let (body, has_request_id) = received.lock().unwrap().clone().unwrap();
        assert!(has_request_id);
        assert_eq!(body["status"], "paid");
        assert_eq!(body["total"], 21.39);
        assert_eq!(body["items"][0]["book_id"], 1);
        assert_eq!(body["customer"]["name"], "Ada");
    }

    #[tokio::test]
    async fn test_place_order_accepted_without_order_id() {
        let router = Router::new()
            .route(
                "/api/orders",
                post(|| async { (StatusCode::CREATED, Json(json!({"id": 17}))) }),
            );
        let client = serve(router).await;

        let confirmation = client.place_order(&sample_order()).await.unwrap();
        assert_eq!(confirmation.order_id, None);
        assert_eq!(confirmation.extra.get("id"), Some(&json!(17)));

        let router = Router::new().route("/api/orders", post(|| async { StatusCode::NO_CONTENT }));
        let client = serve(router).await;

        let confirmation = client.place_order(&sample_order()).await.unwrap();
        assert_eq!(confirmation, OrderConfirmation::default());
    }

    #[tokio::test]
    async fn test_place_order_surfaces_detail() {
        let router = Router::new().route(
            "/api/orders",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"detail": "out of stock"})),
                )
            }),
        );
        let client = serve(router).await;

        let err = client.place_order(&sample_order()).await.unwrap_err();
        assert_eq!(err.user_message(), "out of stock");
        assert!(matches!(err, ClientError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_place_order_falls_back_to_generic_message() {
        let router = Router::new().route(
            "/api/orders",
            post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": [{"loc": ["body"]}]}))) }),
        );
        let client = serve(router).await;

        let err = client.place_order(&sample_order()).await.unwrap_err();
        assert_eq!(err.user_message(), ORDER_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = ClientConfig::default();
        config.backend.url = format!("http://{addr}");
        let client = ApiClient::new(&config).unwrap();

        let err = client.fetch_books(&QueryParams::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_endpoint_respects_base_path() {
        let mut config = ClientConfig::default();
        config.backend.url = "https://books.example.com/store/".to_string();
        let client = ApiClient::new(&config).unwrap();

        let url = client.endpoint(&["api", "books", "a b"]).unwrap();
        assert_eq!(url.as_str(), "https://books.example.com/store/api/books/a%20b");
    }
}

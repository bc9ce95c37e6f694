//! # Catalog State
//!
//! The backend client plus one live query per catalog view.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  home / shop ─────────► books:  BookListQuery   (QueryParams)           │
//! │  book_details ────────► detail: BookDetailQuery (BookId)                │
//! │  add_to_cart, orders ─► api:    ApiClient       (direct calls)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Home and shop share the list query, so switching views supersedes any
//! list request still in flight.

use folio_client::{ApiClient, BookDetailQuery, BookListQuery, ClientConfig, ClientResult};

/// Catalog state for the storefront.
#[derive(Debug, Clone)]
pub struct CatalogState {
    api: ApiClient,
    books: BookListQuery,
    detail: BookDetailQuery,
}

impl CatalogState {
    /// Builds the client and its queries.
    ///
    /// # Errors
    ///
    /// Returns error if the backend URL in `config` is unusable.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(CatalogState::with_client(ApiClient::new(config)?))
    }

    pub fn with_client(api: ApiClient) -> Self {
        CatalogState {
            books: BookListQuery::book_list(api.clone()),
            detail: BookDetailQuery::book_detail(api.clone()),
            api,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn books(&self) -> &BookListQuery {
        &self.books
    }

    pub fn detail(&self) -> &BookDetailQuery {
        &self.detail
    }
}

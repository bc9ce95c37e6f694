//! # Catalog Commands
//!
//! Commands behind the home, shop and book detail views.
//!
//! ## View → Query Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  View          Input                       Backend request              │
//! │  ────          ─────                       ───────────────              │
//! │  home          (none)                      GET /api/books?featured=true │
//! │                                                          &limit=6       │
//! │  shop          "?search=dune&genre="       GET /api/books?search=dune   │
//! │  book_details  "42"                        GET /api/books/42            │
//! │                                                                         │
//! │  home and shop go through the shared list query: whichever view asked   │
//! │  last is the one whose books are shown.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use folio_client::{LiveQuery, QueryParams, QueryState, QueryValue};
use folio_core::validation::validate_search_query;
use folio_core::{Book, BookId};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CartState, CatalogState, ConfigState};

// =============================================================================
// View Models
// =============================================================================

/// A book as shown in a grid card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCardDto {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub short_description: String,
    pub image: String,
    pub price_cents: i64,
    pub price_display: String,
    pub rating: f64,
    /// Filled stars, `round(rating)`
    pub stars: u8,
    pub featured: bool,
}

impl BookCardDto {
    pub fn from_book(book: &Book, config: &ConfigState) -> Self {
        BookCardDto {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            short_description: book.short_description.clone(),
            image: book.image.clone(),
            price_cents: book.price.cents(),
            price_display: config.format_money(book.price),
            rating: book.rating,
            stars: book.star_count(),
            featured: book.featured,
        }
    }
}

/// Home view: the featured shelf.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub featured: Vec<BookCardDto>,
}

/// Shop view: the filtered catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopView {
    /// Query string actually sent (empty values dropped)
    pub query: String,
    pub books: Vec<BookCardDto>,
    pub result_count: usize,
}

/// Book detail view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetailsView {
    #[serde(flatten)]
    pub card: BookCardDto,
    pub description: String,
    pub author_bio: Option<String>,
    /// Copies already in the cart, if any
    pub in_cart: Option<u32>,
}

// =============================================================================
// Commands
// =============================================================================

/// Loads the featured shelf for the home view.
pub async fn home(catalog: &CatalogState, config: &ConfigState) -> Result<HomeView, ApiError> {
    let params = QueryParams::featured(config.home_featured_limit());
    debug!(query = %params.to_query_string(), "home command");

    let books = load(catalog.books(), params).await?;

    Ok(HomeView {
        featured: books.iter().map(|b| BookCardDto::from_book(b, config)).collect(),
    })
}

/// Lists books for the shop view.
///
/// ## Arguments
/// * `query_string` - The view address' query (`search=dune&featured=true`).
///   Keys are passed through as-is; empty values are dropped.
///
/// ## Errors
/// A search longer than 200 characters is rejected before any request.
pub async fn shop(
    catalog: &CatalogState,
    config: &ConfigState,
    query_string: &str,
) -> Result<ShopView, ApiError> {
    let mut params = QueryParams::from_query_string(query_string);

    if let Some(QueryValue::Text(search)) = params.get("search") {
        let search = validate_search_query(search)?;
        params.set("search", search);
    }

    let query = params.to_query_string();
    debug!(query = %query, "shop command");

    let books = load(catalog.books(), params).await?;
    info!(query = %query, results = books.len(), "Shop results loaded");

    Ok(ShopView {
        query,
        result_count: books.len(),
        books: books.iter().map(|b| BookCardDto::from_book(b, config)).collect(),
    })
}

/// Loads one book for the detail view.
///
/// A missing book is an error, never an empty view.
pub async fn book_details(
    catalog: &CatalogState,
    cart: &CartState,
    config: &ConfigState,
    book_id: &str,
) -> Result<BookDetailsView, ApiError> {
    let id = parse_book_id(book_id)?;
    debug!(book_id = %id, "book_details command");

    let book = load(catalog.detail(), id).await?;
    let in_cart = cart.with_cart(|c| c.find(&book.id).map(|item| item.quantity.get()));

    Ok(BookDetailsView {
        card: BookCardDto::from_book(&book, config),
        description: book.description.clone(),
        author_bio: book.author_bio.clone(),
        in_cart,
    })
}

// =============================================================================
// Helpers
// =============================================================================

/// Parses a book id taken from user input or a view address.
pub(crate) fn parse_book_id(raw: &str) -> Result<BookId, ApiError> {
    let id = BookId::parse(raw);
    if id.as_str().is_empty() {
        return Err(ApiError::validation("book id is required"));
    }
    Ok(id)
}

/// Issues `params` on `query` and waits for the outcome of that request.
///
/// If another view issues a newer request first, this one fails with
/// `Superseded` rather than returning the newer request's data.
async fn load<P, T>(query: &LiveQuery<P, T>, params: P) -> Result<T, ApiError>
where
    P: Clone + PartialEq + Debug + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    let generation = query.request(params);

    match query.wait_for(generation).await {
        Some(QueryState::Ready(data)) => Ok(data),
        Some(QueryState::Failed(message)) => Err(ApiError::catalog(message)),
        Some(QueryState::Idle | QueryState::Loading) => {
            Err(ApiError::internal("Catalog query did not run"))
        }
        None => {
            debug!(generation = generation.get(), "Catalog request superseded");
            Err(ApiError::superseded())
        }
    }
}

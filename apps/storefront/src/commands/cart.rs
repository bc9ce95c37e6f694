//! # Cart Commands
//!
//! Commands for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │   Form   │     │  Placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │               │              │
//! │                   add_to_cart       place_order          │              │
//! │                   increment_item    (checkout.rs)        │              │
//! │                   decrement_item         │               │              │
//! │                   set_item_quantity      │ failure:      │ success:     │
//! │                   remove_from_cart       │ cart kept     │ cart cleared │
//! │                        │                 ▼               ▼              │
//! │                   clear_cart ─────────────────────────► (back to empty) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use folio_core::validation::validate_quantity;
use folio_core::{Book, BookId, Cart, CartItem, CartTotals, CoreError};
use serde::Serialize;
use tracing::debug;

use crate::commands::catalog::parse_book_id;
use crate::error::ApiError;
use crate::state::{CartState, CatalogState};

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            totals: cart.totals(),
        }
    }
}

/// Gets the current cart contents.
///
/// ## Returns
/// Current cart with items and derived totals
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a book to the cart by id.
///
/// ## Behavior
/// - Fetches the book, so the cart line carries its current details
/// - Already in cart: quantity goes up by one, price stays as first added
/// - Not in cart: appended with quantity 1
pub async fn add_to_cart(
    catalog: &CatalogState,
    cart: &CartState,
    book_id: &str,
) -> Result<CartResponse, ApiError> {
    let id = parse_book_id(book_id)?;
    debug!(book_id = %id, "add_to_cart command");

    let book = catalog.api().fetch_book(&id).await?;
    Ok(add_book(cart, &book).await)
}

/// Adds a book the view already holds.
pub async fn add_book(cart: &CartState, book: &Book) -> CartResponse {
    debug!(book_id = %book.id, "add_book command");
    let updated = cart.update(|c| c.add(book)).await;
    CartResponse::from(&updated)
}

/// The "+" control.
pub async fn increment_item(cart: &CartState, book_id: &str) -> Result<CartResponse, ApiError> {
    let id = existing_line(cart, book_id)?;
    debug!(book_id = %id, "increment_item command");

    let updated = cart.update(|c| c.increment(&id)).await;
    Ok(CartResponse::from(&updated))
}

/// The "-" control. Stops at 1; use `remove_from_cart` to drop the line.
pub async fn decrement_item(cart: &CartState, book_id: &str) -> Result<CartResponse, ApiError> {
    let id = existing_line(cart, book_id)?;
    debug!(book_id = %id, "decrement_item command");

    let updated = cart.update(|c| c.decrement(&id)).await;
    Ok(CartResponse::from(&updated))
}

/// Sets a line's quantity directly.
///
/// ## Errors
/// - Quantity below 1: validation error, cart unchanged
/// - Book not in cart: not found
pub async fn set_item_quantity(
    cart: &CartState,
    book_id: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(book_id = %book_id, quantity = %quantity, "set_item_quantity command");

    let quantity = validate_quantity(quantity)?;
    let id = existing_line(cart, book_id)?;

    let updated = cart.update(|c| c.set_quantity(&id, quantity)).await;
    Ok(CartResponse::from(&updated))
}

/// Removes a line. Removing a book that isn't in the cart is a no-op.
pub async fn remove_from_cart(cart: &CartState, book_id: &str) -> Result<CartResponse, ApiError> {
    let id = parse_book_id(book_id)?;
    debug!(book_id = %id, "remove_from_cart command");

    let updated = cart.update(|c| c.remove(&id)).await;
    Ok(CartResponse::from(&updated))
}

/// Clears all items from the cart.
pub async fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");
    cart.clear().await;
    cart.with_cart(|c| CartResponse::from(c))
}

fn existing_line(cart: &CartState, book_id: &str) -> Result<BookId, ApiError> {
    let id = parse_book_id(book_id)?;
    if !cart.with_cart(|c| c.contains(&id)) {
        return Err(CoreError::BookNotInCart(id.to_string()).into());
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{book_json, serve_catalog};
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use folio_core::Money;

    fn book(id: i64, cents: i64) -> Book {
        Book::new(BookId::from(id), format!("Book {id}"), "Author", Money::from_cents(cents))
    }

    #[tokio::test]
    async fn test_add_same_book_twice_then_another() {
        let cart = CartState::in_memory().await;
        let a = book(1, 1000);
        let b = book(2, 750);

        add_book(&cart, &a).await;
        add_book(&cart, &a).await;
        let response = add_book(&cart, &b).await;

        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].quantity.get(), 2);
        assert_eq!(response.items[0].line_total().cents(), 2000);
        assert_eq!(response.items[1].quantity.get(), 1);
        assert_eq!(response.totals.subtotal.cents(), 2750);
        assert_eq!(response.totals.tax.cents(), 193);
        assert_eq!(response.totals.total.cents(), 2943);
    }

    #[tokio::test]
    async fn test_add_to_cart_fetches_book() {
        let router = Router::new().route(
            "/api/books/{id}",
            get(|Path(id): Path<i64>| async move {
                if id == 1 {
                    Ok(Json(book_json(1, "Dune", 19.99, 4.5)))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        );
        let catalog = serve_catalog(router).await;
        let cart = CartState::in_memory().await;

        let response = add_to_cart(&catalog, &cart, "1").await.unwrap();
        assert_eq!(response.items[0].book.title, "Dune");
        assert_eq!(response.totals.subtotal.cents(), 1999);

        let err = add_to_cart(&catalog, &cart, "2").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(get_cart(&cart).items.len(), 1);
    }

    #[tokio::test]
    async fn test_decrement_stops_at_one() {
        let cart = CartState::in_memory().await;
        add_book(&cart, &book(1, 500)).await;

        increment_item(&cart, "1").await.unwrap();
        decrement_item(&cart, "1").await.unwrap();
        let response = decrement_item(&cart, "1").await.unwrap();

        assert_eq!(response.items[0].quantity.get(), 1);
    }

    #[tokio::test]
    async fn test_set_quantity_rejects_zero() {
        let cart = CartState::in_memory().await;
        add_book(&cart, &book(1, 500)).await;

        let err = set_item_quantity(&cart, "1", 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let response = set_item_quantity(&cart, "1", 4).await.unwrap();
        assert_eq!(response.totals.total_quantity, 4);
    }

    #[tokio::test]
    async fn test_unknown_line_is_not_found() {
        let cart = CartState::in_memory().await;

        let err = increment_item(&cart, "42").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = set_item_quantity(&cart, "42", 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let cart = CartState::in_memory().await;
        add_book(&cart, &book(1, 500)).await;
        add_book(&cart, &book(2, 700)).await;

        let once = remove_from_cart(&cart, "1").await.unwrap();
        let twice = remove_from_cart(&cart, "1").await.unwrap();

        assert_eq!(once.items, twice.items);
        assert_eq!(twice.items.len(), 1);
        assert!(clear_cart(&cart).await.items.is_empty());
    }
}

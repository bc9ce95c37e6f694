//! # Cart
//!
//! The cart state machine: pure reducers over an ordered list of line items.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Reducers (all pure)                             │
//! │                                                                         │
//! │  User Intent              Reducer                  Result               │
//! │  ───────────              ───────                  ──────               │
//! │                                                                         │
//! │  Add to cart ───────────► cart.add(&book) ───────► qty+1 or push(qty 1) │
//! │                                                                         │
//! │  + / - buttons ─────────► increment / decrement ─► qty±1 (floor 1)      │
//! │                                                                         │
//! │  Set quantity ──────────► set_quantity(id, q) ───► items[i].qty = q     │
//! │                                                                         │
//! │  Remove ────────────────► cart.remove(id) ───────► items without id     │
//! │                                                                         │
//! │  View cart ─────────────► cart.totals() ─────────► derived, not stored  │
//! │                                                                         │
//! │  NOTE: every reducer returns a NEW Cart. The input is never mutated,    │
//! │        so the store can swap the whole value in one step.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per book id (identity = `BookId`)
//! - Quantity is a [`Quantity`], so it is never zero or negative
//! - Lines stay in insertion order; new books are appended

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Book, BookId, Quantity, TaxRate};

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart: a snapshot of the book plus how many copies.
///
/// ## Price Freezing
/// The book is captured when first added. Adding it again only bumps the
/// quantity; the price is never re-fetched.
///
/// ## Wire Format
/// The book's fields are flattened next to `quantity`, which is also the
/// shape persisted to storage:
/// ```json
/// { "id": 1, "title": "Dune", "price": 19.99, ..., "quantity": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Frozen copy of the book.
    #[serde(flatten)]
    pub book: Book,

    /// Copies in the cart.
    pub quantity: Quantity,
}

impl CartItem {
    /// Creates a line with a single copy.
    pub fn new(book: Book) -> Self {
        CartItem {
            book,
            quantity: Quantity::ONE,
        }
    }

    /// Book identifier of this line.
    #[inline]
    pub fn id(&self) -> &BookId {
        &self.book.id
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.book.price.multiply_quantity(self.quantity.get() as i64)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart. Serialized as a bare JSON array of [`CartItem`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Cart::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from existing lines.
    ///
    /// Lines sharing a book id are merged into the first occurrence (their
    /// quantities summed), so a hand-edited persisted array cannot break the
    /// one-line-per-book invariant.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut merged: Vec<CartItem> = Vec::with_capacity(items.len());
        for item in items {
            match merged.iter_mut().find(|existing| existing.id() == item.id()) {
                Some(existing) => {
                    let sum = existing.quantity.get() as i64 + item.quantity.get() as i64;
                    existing.quantity = Quantity::clamped(sum);
                }
                None => merged.push(item),
            }
        }
        Cart { items: merged }
    }

    /// Adds one copy of a book.
    ///
    /// ## Behavior
    /// - Book already in cart: that line's quantity goes up by one, every
    ///   other field (price included) is left as it was
    /// - Book not in cart: a new line with quantity 1 is appended
    pub fn add(&self, book: &Book) -> Cart {
        if self.contains(&book.id) {
            return self.map_line(&book.id, |item| CartItem {
                quantity: item.quantity.increment(),
                ..item.clone()
            });
        }

        let mut items = self.items.clone();
        items.push(CartItem::new(book.clone()));
        Cart { items }
    }

    /// Sets the quantity of one line. Unknown ids leave the cart unchanged.
    pub fn set_quantity(&self, id: &BookId, quantity: Quantity) -> Cart {
        self.map_line(id, |item| CartItem {
            quantity,
            ..item.clone()
        })
    }

    /// One more copy of an existing line.
    pub fn increment(&self, id: &BookId) -> Cart {
        self.map_line(id, |item| CartItem {
            quantity: item.quantity.increment(),
            ..item.clone()
        })
    }

    /// One fewer copy of an existing line, never below 1.
    pub fn decrement(&self, id: &BookId) -> Cart {
        self.map_line(id, |item| CartItem {
            quantity: item.quantity.decrement(),
            ..item.clone()
        })
    }

    /// Drops the line for `id`. Removing an absent id is a no-op.
    pub fn remove(&self, id: &BookId) -> Cart {
        Cart {
            items: self
                .items
                .iter()
                .filter(|item| item.id() != id)
                .cloned()
                .collect(),
        }
    }

    /// Derived totals at the storefront tax rate.
    pub fn totals(&self) -> CartTotals {
        compute_totals(&self.items)
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up the line for a book.
    pub fn find(&self, id: &BookId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// True if the book has a line in the cart.
    pub fn contains(&self, id: &BookId) -> bool {
        self.find(id).is_some()
    }

    /// Number of distinct books.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total copies across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| item.quantity.get() as u64).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn map_line<F>(&self, id: &BookId, f: F) -> Cart
    where
        F: Fn(&CartItem) -> CartItem,
    {
        Cart {
            items: self
                .items
                .iter()
                .map(|item| if item.id() == id { f(item) } else { item.clone() })
                .collect(),
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Cart totals summary. Always recomputed from the lines, never cached.
///
/// Amounts are decimal dollars on the wire, like the line prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u64,
    #[serde(with = "crate::money::dollars")]
    pub subtotal: Money,
    #[serde(with = "crate::money::dollars")]
    pub tax: Money,
    #[serde(with = "crate::money::dollars")]
    pub total: Money,
}

/// Computes totals at the storefront tax rate (7%).
///
/// ## Example
/// ```rust
/// use folio_core::{compute_totals, Book, BookId, Cart, Money};
///
/// let a = Book::new(BookId::from(1), "A", "X", Money::from_cents(1999));
/// let b = Book::new(BookId::from(2), "B", "Y", Money::from_cents(500));
/// let cart = Cart::new().add(&a).add(&a).add(&b);
///
/// let totals = compute_totals(cart.items());
/// assert_eq!(totals.subtotal.to_string(), "$44.98");
/// assert_eq!(totals.tax.to_string(), "$3.15");
/// assert_eq!(totals.total.to_string(), "$48.13");
/// ```
pub fn compute_totals(items: &[CartItem]) -> CartTotals {
    compute_totals_with_rate(items, TaxRate::storefront())
}

/// Computes totals at an arbitrary tax rate.
///
/// Tax is rounded to the cent first and then added to the subtotal; it is
/// never derived as `total - subtotal`.
pub fn compute_totals_with_rate(items: &[CartItem], rate: TaxRate) -> CartTotals {
    let subtotal: Money = items.iter().map(CartItem::line_total).sum();
    let tax = subtotal.calculate_tax(rate);

    CartTotals {
        item_count: items.len(),
        total_quantity: items.iter().map(|item| item.quantity.get() as u64).sum(),
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, price_cents: i64) -> Book {
        Book::new(
            BookId::from(id),
            format!("Book {id}"),
            "Author",
            Money::from_cents(price_cents),
        )
    }

    #[test]
    fn test_add_distinct_books_one_line_each() {
        let books: Vec<Book> = (1..=5).map(|id| book(id, 1000)).collect();
        let cart = books.iter().fold(Cart::new(), |cart, b| cart.add(b));

        assert_eq!(cart.item_count(), 5);
        assert!(cart.items().iter().all(|item| item.quantity == Quantity::ONE));

        let ids: Vec<String> = cart.items().iter().map(|i| i.id().to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_add_same_book_twice_increments_quantity() {
        let a = book(1, 1000);
        let b = book(2, 750);
        let cart = Cart::new().add(&b).add(&a).add(&a);

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.find(&a.id).unwrap().quantity.get(), 2);
        assert_eq!(cart.find(&b.id).unwrap().quantity.get(), 1);
        assert_eq!(cart.items()[0].id(), &b.id);
    }

    #[test]
    fn test_add_keeps_frozen_price() {
        let original = book(1, 1000);
        let mut repriced = original.clone();
        repriced.price = Money::from_cents(9999);

        let cart = Cart::new().add(&original).add(&repriced);
        let line = cart.find(&original.id).unwrap();

        assert_eq!(line.book.price.cents(), 1000);
        assert_eq!(line.quantity.get(), 2);
    }

    #[test]
    fn test_reducers_do_not_mutate_input() {
        let a = book(1, 1000);
        let before = Cart::new().add(&a);
        let snapshot = before.clone();

        let _ = before.add(&a);
        let _ = before.remove(&a.id);
        let _ = before.set_quantity(&a.id, Quantity::new(9).unwrap());

        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_set_quantity_only_touches_target() {
        let a = book(1, 1000);
        let b = book(2, 500);
        let cart = Cart::new()
            .add(&a)
            .add(&b)
            .set_quantity(&b.id, Quantity::new(4).unwrap());

        assert_eq!(cart.find(&a.id).unwrap().quantity.get(), 1);
        assert_eq!(cart.find(&b.id).unwrap().quantity.get(), 4);
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let cart = Cart::new().add(&book(1, 1000));
        let same = cart.set_quantity(&BookId::from(99), Quantity::new(3).unwrap());
        assert_eq!(cart, same);
    }

    #[test]
    fn test_decrement_clamps_at_one() {
        let a = book(1, 1000);
        let cart = Cart::new().add(&a).decrement(&a.id).decrement(&a.id);
        assert_eq!(cart.find(&a.id).unwrap().quantity, Quantity::ONE);

        let cart = cart.increment(&a.id).increment(&a.id).decrement(&a.id);
        assert_eq!(cart.find(&a.id).unwrap().quantity.get(), 2);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let a = book(1, 1000);
        let b = book(2, 500);
        let cart = Cart::new().add(&a).add(&b);

        let once = cart.remove(&a.id);
        let twice = once.remove(&a.id);

        assert_eq!(once, twice);
        assert_eq!(once.item_count(), 1);
        assert_eq!(cart.remove(&BookId::from(42)), cart);
    }

    #[test]
    fn test_totals_example() {
        let cart = Cart::new()
            .add(&book(1, 1999))
            .add(&book(1, 1999))
            .add(&book(2, 500));
        let totals = cart.totals();

        assert_eq!(totals.subtotal.cents(), 4498);
        assert_eq!(totals.tax.cents(), 315);
        assert_eq!(totals.total.cents(), 4813);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
    }

    #[test]
    fn test_totals_scenario_two_books() {
        let a = book(1, 1000);
        let b = book(2, 750);
        let cart = Cart::new().add(&a).add(&a).add(&b);

        assert_eq!(cart.find(&a.id).unwrap().line_total().to_string(), "$20.00");
        assert_eq!(cart.find(&b.id).unwrap().line_total().to_string(), "$7.50");

        let totals = cart.totals();
        assert_eq!(totals.subtotal.to_string(), "$27.50");
        assert_eq!(totals.tax.to_string(), "$1.93");
        assert_eq!(totals.total.to_string(), "$29.43");
    }

    #[test]
    fn test_totals_empty_cart() {
        let totals = Cart::new().totals();
        assert!(totals.subtotal.is_zero());
        assert!(totals.tax.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_totals_with_custom_rate() {
        let cart = Cart::new().add(&book(1, 1000));
        let totals = compute_totals_with_rate(cart.items(), TaxRate::from_bps(825));

        // $10.00 × 8.25% = $0.825 → $0.83
        assert_eq!(totals.tax.cents(), 83);
        assert_eq!(totals.total.cents(), 1083);
    }

    #[test]
    fn test_totals_wire_shape_uses_dollars() {
        let cart = Cart::new().add(&book(1, 1000)).add(&book(1, 1000)).add(&book(2, 750));
        let json = serde_json::to_value(cart.totals()).unwrap();

        assert_eq!(json["subtotal"], 27.5);
        assert_eq!(json["tax"], 1.93);
        assert_eq!(json["total"], 29.43);
        assert_eq!(json["total_quantity"], 3);

        let restored: CartTotals = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart.totals());
    }

    #[test]
    fn test_huge_prices_do_not_overflow_totals() {
        let pricey = book(1, i64::MAX / 2);
        let cart = Cart::new().add(&pricey).add(&pricey).add(&pricey);

        let totals = cart.totals();
        assert_eq!(totals.subtotal.cents(), i64::MAX);
        assert_eq!(totals.total.cents(), i64::MAX);
    }

    #[test]
    fn test_cart_json_roundtrip() {
        let a = book(1, 1999);
        let b = Book::new(BookId::from("isbn-42"), "B", "Y", Money::from_cents(500));
        let cart = Cart::new()
            .add(&a)
            .add(&b)
            .add(&a)
            .set_quantity(&b.id, Quantity::new(3).unwrap());

        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));

        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
        assert_eq!(restored.totals(), cart.totals());
    }

    #[test]
    fn test_cart_item_wire_shape() {
        let json = r#"[{"id": 7, "title": "Dune", "author": "Frank Herbert",
                        "price": 19.99, "rating": 4.5, "quantity": 2}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        let line = &cart.items()[0];
        assert_eq!(line.id(), &BookId::from(7));
        assert_eq!(line.quantity.get(), 2);
        assert_eq!(line.line_total().cents(), 3998);
    }

    #[test]
    fn test_cart_rejects_zero_quantity_on_the_wire() {
        let json = r#"[{"id": 7, "title": "Dune", "price": 19.99, "quantity": 0}]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn test_from_items_merges_duplicates() {
        let a = book(1, 1000);
        let items = vec![
            CartItem::new(a.clone()),
            CartItem::new(book(2, 500)),
            CartItem {
                book: a.clone(),
                quantity: Quantity::new(2).unwrap(),
            },
        ];

        let cart = Cart::from_items(items);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.find(&a.id).unwrap().quantity.get(), 3);

        let json = r#"[{"id": 1, "title": "A", "price": 1, "quantity": 1},
                       {"id": "1", "title": "A", "price": 1, "quantity": 4}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity.get(), 5);
    }
}

//! # Orders
//!
//! Customer details, the order payload posted at checkout and the
//! backend's confirmation.
//!
//! ## Payload Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/orders                                                       │
//! │                                                                         │
//! │  {                                                                      │
//! │    "items":    [{ "book_id", "title", "price", "quantity" }, ...],      │
//! │    "customer": { "name", "email", "address" },                          │
//! │    "subtotal": 27.5,  "tax": 1.93,  "total": 29.43,                     │
//! │    "status":   "paid"                                                   │
//! │  }                                                                      │
//! │                                                                         │
//! │  Amounts are cents internally and decimal dollars on the wire.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::cart::{Cart, CartItem};
use crate::error::{CoreError, CoreResult};
use crate::money::{self, Money};
use crate::types::{BookId, Quantity};
use crate::validation::validate_customer;

// =============================================================================
// Customer
// =============================================================================

/// Contact details collected by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub address: String,
}

impl CustomerDetails {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        CustomerDetails {
            name: name.into(),
            email: email.into(),
            address: address.into(),
        }
    }

    /// Copy with surrounding whitespace stripped from every field.
    pub fn trimmed(&self) -> Self {
        CustomerDetails {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
        }
    }
}

// =============================================================================
// Order Request
// =============================================================================

/// Payment status sent with the order. Checkout has no payment step, so the
/// client always reports `paid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Paid,
}

/// One ordered book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub book_id: BookId,
    pub title: String,
    #[serde(with = "money::dollars")]
    pub price: Money,
    pub quantity: Quantity,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        OrderLine {
            book_id: item.book.id.clone(),
            title: item.book.title.clone(),
            price: item.book.price,
            quantity: item.quantity,
        }
    }
}

/// The order payload. Built once per checkout attempt and not retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderLine>,
    pub customer: CustomerDetails,
    #[serde(with = "money::dollars")]
    pub subtotal: Money,
    #[serde(with = "money::dollars")]
    pub tax: Money,
    #[serde(with = "money::dollars")]
    pub total: Money,
    pub status: OrderStatus,
}

impl OrderRequest {
    /// Snapshots the cart and its totals into an order.
    ///
    /// ## Errors
    /// - `CoreError::Validation` if a customer field is missing or the email
    ///   is malformed (nothing should be sent in that case)
    /// - `CoreError::EmptyCart` if there is nothing to order
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::{Book, BookId, Cart, CustomerDetails, Money, OrderRequest};
    ///
    /// let book = Book::new(BookId::from(1), "Dune", "Frank Herbert", Money::from_cents(1000));
    /// let cart = Cart::new().add(&book);
    /// let customer = CustomerDetails::new("Ada", "ada@example.com", "1 Main St");
    ///
    /// let order = OrderRequest::from_cart(&cart, customer).unwrap();
    /// assert_eq!(order.total.cents(), 1070);
    /// ```
    pub fn from_cart(cart: &Cart, customer: CustomerDetails) -> CoreResult<Self> {
        let customer = customer.trimmed();
        validate_customer(&customer)?;

        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let totals = cart.totals();

        Ok(OrderRequest {
            items: cart.items().iter().map(OrderLine::from).collect(),
            customer,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            status: OrderStatus::Paid,
        })
    }
}

// =============================================================================
// Order Confirmation
// =============================================================================

/// Successful response from the orders endpoint.
///
/// Only `order_id` is interpreted; any other fields are kept verbatim. A
/// 2xx answer is an accepted order even when it carries no usable id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Backend order identifier (string or integer on the wire).
    #[serde(
        default,
        deserialize_with = "order_id_from_wire",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn order_id_from_wire<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::Book;

    fn customer() -> CustomerDetails {
        CustomerDetails::new("Ada Lovelace", "ada@example.com", "12 Analytical Way")
    }

    fn sample_cart() -> Cart {
        let a = Book::new(BookId::from(1), "A", "X", Money::from_cents(1000));
        let b = Book::new(BookId::from("b-2"), "B", "Y", Money::from_cents(750));
        Cart::new().add(&a).add(&a).add(&b)
    }

    #[test]
    fn test_from_cart_snapshots_lines_and_totals() {
        let order = OrderRequest::from_cart(&sample_cart(), customer()).unwrap();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].quantity.get(), 2);
        assert_eq!(order.subtotal.cents(), 2750);
        assert_eq!(order.tax.cents(), 193);
        assert_eq!(order.total.cents(), 2943);
        assert_eq!(order.status, OrderStatus::Paid);
    }

    #[test]
    fn test_from_cart_rejects_empty_cart() {
        let result = OrderRequest::from_cart(&Cart::new(), customer());
        assert!(matches!(result, Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_from_cart_rejects_blank_name() {
        let mut details = customer();
        details.name = "   ".to_string();

        let result = OrderRequest::from_cart(&sample_cart(), details);
        match result {
            Err(CoreError::Validation(ValidationError::Required { field })) => {
                assert_eq!(field, "name")
            }
            other => panic!("expected name validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_cart_trims_customer_fields() {
        let details = CustomerDetails::new(" Ada ", " ada@example.com ", " 1 Main St ");
        let order = OrderRequest::from_cart(&sample_cart(), details).unwrap();

        assert_eq!(order.customer.name, "Ada");
        assert_eq!(order.customer.email, "ada@example.com");
        assert_eq!(order.customer.address, "1 Main St");
    }

    #[test]
    fn test_order_wire_format() {
        let order = OrderRequest::from_cart(&sample_cart(), customer()).unwrap();
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["status"], "paid");
        assert_eq!(json["subtotal"], 27.5);
        assert_eq!(json["tax"], 1.93);
        assert_eq!(json["total"], 29.43);
        assert_eq!(json["items"][0]["book_id"], 1);
        assert_eq!(json["items"][0]["price"], 10.0);
        assert_eq!(json["items"][1]["book_id"], "b-2");
        assert_eq!(json["items"][1]["quantity"], 1);
        assert_eq!(json["customer"]["email"], "ada@example.com");
    }

    #[test]
    fn test_confirmation_accepts_string_or_number_ids() {
        let c: OrderConfirmation =
            serde_json::from_str(r#"{"order_id": "ord_123", "status": "paid"}"#).unwrap();
        assert_eq!(c.order_id.as_deref(), Some("ord_123"));
        assert_eq!(c.extra.get("status"), Some(&Value::from("paid")));

        let c: OrderConfirmation = serde_json::from_str(r#"{"order_id": 42}"#).unwrap();
        assert_eq!(c.order_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_confirmation_without_usable_order_id() {
        let c: OrderConfirmation = serde_json::from_str(r#"{"id": 17}"#).unwrap();
        assert_eq!(c.order_id, None);
        assert_eq!(c.extra.get("id"), Some(&Value::from(17)));

        let c: OrderConfirmation = serde_json::from_str(r#"{"order_id": ""}"#).unwrap();
        assert_eq!(c.order_id, None);

        let c: OrderConfirmation = serde_json::from_str(r#"{"order_id": null}"#).unwrap();
        assert_eq!(c.order_id, None);
    }
}

//! # Checkout Commands
//!
//! Turns the cart into an order, once.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    place_order                                          │
//! │                                                                         │
//! │  CustomerDetails ──► validate (name, email, address)                    │
//! │                        │ invalid → VALIDATION_ERROR, nothing sent       │
//! │                        ▼                                                │
//! │                      cart empty? → EMPTY_CART, nothing sent             │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                      claim in-flight flag                               │
//! │                        │ taken → CHECKOUT_IN_PROGRESS                   │
//! │                        ▼                                                │
//! │                      POST /api/orders (once, no retry)                  │
//! │                        │                                                │
//! │            ┌───────────┴───────────┐                                    │
//! │            ▼                       ▼                                    │
//! │     2xx: clear cart,         non-2xx / network:                         │
//! │     confirmation view        ORDER_FAILED with `detail` or              │
//! │     /order/{order_id}        "Order failed"; cart untouched             │
//! │     (no id in body: still                                               │
//! │      a success, no path)                                                │
//! │                                                                         │
//! │  The flag is released on every path, so the user can resubmit.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use folio_core::{CustomerDetails, OrderRequest};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ErrorCode};
use crate::state::{CartState, CatalogState, ConfigState};

/// Heading of the confirmation view.
pub const CONFIRMATION_TITLE: &str = "Thank you for your purchase!";

/// Body of the confirmation view.
pub const CONFIRMATION_MESSAGE: &str =
    "Your order has been placed successfully. A confirmation has been sent to your email.";

/// Order confirmation view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmationView {
    /// Absent when the backend accepted the order without naming it
    pub order_id: Option<String>,
    pub title: String,
    pub message: String,
    /// Address of this view
    pub path: Option<String>,
    /// Charged total, when the confirmation follows a submission
    pub total_display: Option<String>,
    pub placed_at: Option<DateTime<Utc>>,
}

/// Single-shot order submission.
///
/// Holds the in-flight flag that stops a second submission while one is
/// outstanding.
#[derive(Debug, Default)]
pub struct Checkout {
    in_flight: AtomicBool,
}

/// Releases the in-flight flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Checkout {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an order is being submitted ("Processing...").
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Places an order for the current cart.
    ///
    /// ## Errors
    /// - `VALIDATION_ERROR`: a customer field is missing or malformed
    /// - `EMPTY_CART`: nothing to order
    /// - `CHECKOUT_IN_PROGRESS`: another submission is outstanding
    /// - `ORDER_FAILED`: the backend refused or could not be reached; the
    ///   message is the backend's `detail` when it sent one
    pub async fn place_order(
        &self,
        catalog: &CatalogState,
        cart: &CartState,
        config: &ConfigState,
        customer: CustomerDetails,
    ) -> Result<OrderConfirmationView, ApiError> {
        debug!("place_order command");

        let order = cart.with_cart(|c| OrderRequest::from_cart(c, customer))?;

        let _guard = self.claim()?;

        info!(
            items = order.items.len(),
            total = %order.total,
            "Placing order"
        );

        let confirmation = match catalog.api().place_order(&order).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                warn!(error = %e, "Order submission failed - cart kept for retry");
                return Err(ApiError::order_failed(e.user_message()));
            }
        };

        cart.clear().await;
        info!(
            order_id = confirmation.order_id.as_deref().unwrap_or("-"),
            "Order placed, cart cleared"
        );

        let mut view = confirmation_view(confirmation.order_id.as_deref());
        view.total_display = Some(config.format_money(order.total));
        view.placed_at = Some(Utc::now());
        Ok(view)
    }

    fn claim(&self) -> Result<InFlight<'_>, ApiError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| {
                ApiError::new(
                    ErrorCode::CheckoutInProgress,
                    "Your order is already being processed",
                )
            })?;
        Ok(InFlight(&self.in_flight))
    }
}

/// Renders the confirmation view for an order id.
pub fn order_confirmation(order_id: &str) -> Result<OrderConfirmationView, ApiError> {
    let order_id = order_id.trim();
    if order_id.is_empty() {
        return Err(ApiError::validation("order id is required"));
    }

    Ok(confirmation_view(Some(order_id)))
}

fn confirmation_view(order_id: Option<&str>) -> OrderConfirmationView {
    OrderConfirmationView {
        order_id: order_id.map(str::to_string),
        title: CONFIRMATION_TITLE.to_string(),
        message: CONFIRMATION_MESSAGE.to_string(),
        path: order_id.map(|id| format!("/order/{id}")),
        total_display: None,
        placed_at: None,
    }
}

//! # Validation Module
//!
//! Input validation for the checkout form and catalog search.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command handler (storefront)                                  │
//! │  └── Parses raw input (ids, quantities, form fields)                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Required checkout fields                                           │
//! │  └── Email shape, search length, quantity floor                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend API                                                   │
//! │  └── Authoritative checks (stock, pricing)                              │
//! │                                                                         │
//! │  A failure at layer 2 means NO network call is made.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::validation::{validate_email, validate_quantity};
//!
//! validate_email("reader@example.com").unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::order::CustomerDetails;
use crate::types::Quantity;
use crate::MAX_SEARCH_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LENGTH: usize = 200;
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_ADDRESS_LENGTH: usize = 500;

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates the checkout form.
///
/// ## Rules
/// - `name`: required, at most 200 characters
/// - `email`: required, well-formed (see [`validate_email`])
/// - `address`: required, at most 500 characters
///
/// Fields are checked in form order and the first failure is returned, so
/// the caller can point the user at that input.
pub fn validate_customer(customer: &CustomerDetails) -> ValidationResult<()> {
    validate_required("name", &customer.name, MAX_NAME_LENGTH)?;
    validate_email(&customer.email)?;
    validate_required("address", &customer.address, MAX_ADDRESS_LENGTH)?;
    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_email;
///
/// assert!(validate_email("ada@example.com").is_ok());
/// assert!(validate_email("ada@localhost").is_ok());
/// assert!(validate_email("ada@example..com").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email, MAX_EMAIL_LENGTH)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must be name@domain"));
    }

    // Same shape a browser's email input accepts: dot-separated labels,
    // no dot required
    let label_ok = |label: &str| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    if !domain.split('.').all(label_ok) {
        return Err(invalid("domain is malformed"));
    }

    Ok(())
}

fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (the shop then lists everything)
/// - Maximum 200 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LENGTH,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity typed by the user.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Set Quantity                                                     │
/// │                                                                         │
/// │  User enters quantity: 0                                                │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(0) ← THIS FUNCTION                                   │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"                │
/// │       │                                                                 │
/// │       └── OK → Quantity handed to Cart::set_quantity                    │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<Quantity> {
    Quantity::new(qty)
}

/// Validates a price in cents.
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());  // $10.99
/// assert!(validate_price_cents(0).is_ok());     // Free book
/// assert!(validate_price_cents(-100).is_err()); // Invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

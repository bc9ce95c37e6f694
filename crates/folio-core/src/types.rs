//! # Domain Types
//!
//! Core domain types used throughout Folio.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │     BookId      │   │    Quantity     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  "42" or 42     │   │  u32, always ≥1 │       │
//! │  │  title, author  │   │  compared by    │   │  decrement      │       │
//! │  │  price (Money)  │   │  its text form  │   │  clamps at 1    │       │
//! │  │  rating         │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                        ┌─────────────────┐                              │
//! │                        │    TaxRate      │                              │
//! │                        │  bps (u32)      │                              │
//! │                        │  700 = 7.00%    │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Boundary Validation
//! Books are read-only data owned by the backend. They are validated once,
//! when deserialized from the catalog payload: a negative price or a
//! non-finite rating rejects the whole payload instead of leaking inward.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{CoreError, ValidationError};
use crate::money::{self, Money};
use crate::validation::validate_price_cents;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 700 bps = 7%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The storefront's sales tax.
    #[inline]
    pub const fn storefront() -> Self {
        TaxRate(crate::STOREFRONT_TAX_RATE_BPS)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::storefront()
    }
}

// =============================================================================
// Book Identifier
// =============================================================================

/// Identifier of a catalog book.
///
/// The backend may emit ids as JSON strings or integers. The original kind
/// is remembered so the id goes back out exactly as it came in (the order
/// payload's `book_id`), while equality and hashing use the text form so a
/// typed-in `"42"` matches a catalog id of `42`.
#[derive(Debug, Clone)]
pub struct BookId {
    raw: String,
    numeric: bool,
}

impl BookId {
    /// Parses an id typed by a user or taken from an address.
    ///
    /// Digit-only ids are treated as numeric.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        BookId {
            raw: raw.to_string(),
            numeric: !raw.is_empty() && raw.parse::<i64>().is_ok(),
        }
    }

    /// Returns the id as text (used in URLs and lookups).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the backend sent this id as a JSON number.
    pub fn is_numeric(&self) -> bool {
        self.numeric
    }
}

impl From<&str> for BookId {
    fn from(raw: &str) -> Self {
        BookId {
            raw: raw.to_string(),
            numeric: false,
        }
    }
}

impl From<i64> for BookId {
    fn from(id: i64) -> Self {
        BookId {
            raw: id.to_string(),
            numeric: true,
        }
    }
}

impl PartialEq for BookId {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for BookId {}

impl std::hash::Hash for BookId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for BookId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.raw.parse::<i64>() {
            Ok(n) if self.numeric => serializer.serialize_i64(n),
            _ => serializer.serialize_str(&self.raw),
        }
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireId {
            Number(i64),
            Text(String),
        }

        match WireId::deserialize(deserializer)? {
            WireId::Number(n) => Ok(BookId::from(n)),
            WireId::Text(s) if s.trim().is_empty() => {
                Err(serde::de::Error::custom("book id must not be empty"))
            }
            WireId::Text(s) => Ok(BookId::from(s.as_str())),
        }
    }
}

// =============================================================================
// Book
// =============================================================================

/// A book in the catalog.
///
/// Immutable from the client's perspective; the cart snapshots it on add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BookRecord", into = "BookRecord")]
pub struct Book {
    /// Backend identifier.
    pub id: BookId,

    /// Display title.
    pub title: String,

    /// Author name.
    pub author: String,

    /// Optional short biography shown on the detail view.
    pub author_bio: Option<String>,

    /// One-line teaser shown on catalog cards.
    pub short_description: String,

    /// Full description for the detail view.
    pub description: String,

    /// Cover image reference (URL or path).
    pub image: String,

    /// Unit price.
    pub price: Money,

    /// Average rating, typically 0-5.
    pub rating: f64,

    /// Whether the book is promoted on the home feed.
    pub featured: bool,
}

impl Book {
    /// Creates a book with the required fields and empty descriptive text.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        price: Money,
    ) -> Self {
        Book {
            id,
            title: title.into(),
            author: author.into(),
            author_bio: None,
            short_description: String::new(),
            description: String::new(),
            image: String::new(),
            price,
            rating: 0.0,
            featured: false,
        }
    }

    /// Number of filled stars for the rating widget (0-5).
    pub fn star_count(&self) -> u8 {
        self.rating.round().clamp(0.0, 5.0) as u8
    }
}

/// Wire shape of a book as sent by `/api/books`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookRecord {
    id: BookId,
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author_bio: Option<String>,
    #[serde(default)]
    short_description: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
    #[serde(with = "money::dollars")]
    price: Money,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    featured: bool,
}

impl TryFrom<BookRecord> for Book {
    type Error = CoreError;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        validate_price_cents(record.price.cents()).map_err(|_| CoreError::InvalidPrice {
            reason: format!("book {} has a negative price", record.id),
        })?;

        if !record.rating.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "rating".to_string(),
                reason: "must be a finite number".to_string(),
            }
            .into());
        }

        Ok(Book {
            id: record.id,
            title: record.title,
            author: record.author,
            // An empty bio is the same as no bio for display purposes
            author_bio: record.author_bio.filter(|bio| !bio.trim().is_empty()),
            short_description: record.short_description,
            description: record.description,
            image: record.image,
            price: record.price,
            rating: record.rating,
            featured: record.featured,
        })
    }
}

impl From<Book> for BookRecord {
    fn from(book: Book) -> Self {
        BookRecord {
            id: book.id,
            title: book.title,
            author: book.author,
            author_bio: book.author_bio,
            short_description: book.short_description,
            description: book.description,
            image: book.image,
            price: book.price,
            rating: book.rating,
            featured: book.featured,
        }
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// Quantity of one book in the cart. Never zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Quantity(u32);

impl Quantity {
    /// A single copy.
    pub const ONE: Quantity = Quantity(1);

    /// Creates a quantity, rejecting anything below 1.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::Quantity;
    ///
    /// assert_eq!(Quantity::new(3).unwrap().get(), 3);
    /// assert!(Quantity::new(0).is_err());
    /// ```
    pub fn new(qty: i64) -> Result<Self, ValidationError> {
        if qty < 1 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }

        u32::try_from(qty)
            .map(Quantity)
            .map_err(|_| ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: u32::MAX as i64,
            })
    }

    /// Creates a quantity, flooring anything below 1 at 1.
    pub fn clamped(qty: i64) -> Self {
        Quantity(qty.clamp(1, u32::MAX as i64) as u32)
    }

    /// Returns the raw count.
    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// One more copy.
    pub fn increment(self) -> Self {
        Quantity(self.0.saturating_add(1))
    }

    /// One fewer copy, never below 1.
    pub fn decrement(self) -> Self {
        Quantity(self.0.saturating_sub(1).max(1))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Quantity::new(raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

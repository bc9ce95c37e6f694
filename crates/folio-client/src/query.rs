//! # Catalog Query Parameters
//!
//! The filter state of a catalog view, turned into a query string.
//!
//! ## Encoding Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  { search: "dune", featured: Null, limit: "" }                          │
//! │                    │                                                    │
//! │                    ▼  encoded_pairs()                                   │
//! │  [("search", "dune")]          ← Null and "" are dropped entirely,      │
//! │                    │             never sent as `featured=` or `limit=`  │
//! │                    ▼                                                    │
//! │  GET /api/books?search=dune                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keys are kept in a `BTreeMap`, so two parameter sets with the same
//! contents compare equal and encode identically whatever order they were
//! built in.

use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Query Value
// =============================================================================

/// A scalar filter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryValue {
    /// Unset. Never encoded.
    Null,
    Bool(bool),
    Int(i64),
    /// Free text. Encoded unless empty.
    Text(String),
}

impl QueryValue {
    /// True for values that must be left out of the request.
    pub fn is_empty(&self) -> bool {
        match self {
            QueryValue::Null => true,
            QueryValue::Text(s) => s.is_empty(),
            QueryValue::Bool(_) | QueryValue::Int(_) => false,
        }
    }

    /// The text sent on the wire, or `None` when the value is omitted.
    pub fn encode(&self) -> Option<String> {
        match self {
            QueryValue::Null => None,
            QueryValue::Bool(b) => Some(b.to_string()),
            QueryValue::Int(n) => Some(n.to_string()),
            QueryValue::Text(s) if s.is_empty() => None,
            QueryValue::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encode() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Int(n)
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        QueryValue::Int(n as i64)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Null, Into::into)
    }
}

// =============================================================================
// Query Params
// =============================================================================

/// Mapping of filter keys to scalar values.
///
/// ## Example
/// ```rust
/// use folio_client::QueryParams;
///
/// let params = QueryParams::new()
///     .with("search", "dune")
///     .with("featured", None::<bool>)
///     .with("limit", "");
///
/// assert_eq!(params.to_query_string(), "search=dune");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams {
    values: BTreeMap<String, QueryValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Home feed parameters: featured books, capped at `limit`.
    pub fn featured(limit: u32) -> Self {
        QueryParams::new().with("featured", true).with("limit", limit)
    }

    /// Free-text search.
    pub fn search(text: impl Into<String>) -> Self {
        QueryParams::new().with("search", text.into())
    }

    /// Parses a view address' query string (`search=dune&featured=true`).
    ///
    /// Values stay text and are passed through verbatim; a leading `?` is
    /// accepted. Repeated keys keep the last value.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.trim_start_matches('?');

        let values = url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), QueryValue::Text(value.into_owned())))
            .collect();

        QueryParams { values }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Inserts or replaces a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Removes a key.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.values.get(key)
    }

    /// True if nothing would be encoded.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(QueryValue::is_empty)
    }

    /// The key/value pairs that go on the wire, in key order.
    pub fn encoded_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter_map(|(key, value)| value.encode().map(|v| (key.clone(), v)))
            .collect()
    }

    /// Form-urlencoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.encoded_pairs())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

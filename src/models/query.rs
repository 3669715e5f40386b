//! Query result types.

use serde_json::Value as JsonValue;

/// One result row: column name mapped to a dialect-native scalar value.
///
/// `serde_json::Map` preserves insertion order (the `preserve_order` feature),
/// so key order matches the column order of the underlying result.
pub type RowObject = serde_json::Map<String, JsonValue>;

/// Column-oriented raw result as produced by a driver adapter: a column name
/// list plus positional value rows aligned to it. This is the single shape
/// the row mapper consumes, regardless of backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQueryResult {
    pub columns: Vec<String>,
    pub values: Vec<Vec<JsonValue>>,
}

impl RawQueryResult {
    pub fn new(columns: Vec<String>, values: Vec<Vec<JsonValue>>) -> Self {
        Self { columns, values }
    }
}

/// A page of rows plus the exact statement text that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    /// Rows in backend order; no reordering beyond LIMIT/OFFSET.
    pub rows: Vec<RowObject>,
    /// Fully-rendered statement with bind values substituted, for
    /// display and diagnostics only.
    pub sql: String,
}

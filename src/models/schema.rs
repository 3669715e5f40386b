//! Schema snapshot types.
//!
//! These are immutable snapshots taken at introspection time; engines never
//! cache them, so repeated calls always reflect the live schema.

use serde::{Deserialize, Serialize};

/// One column of a table, as reported by the backend's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Raw backend type name (e.g. `INTEGER`, `character varying(255)`).
    #[serde(rename = "type")]
    pub column_type: String,
    pub is_primary_key: bool,
    /// Logical negation of the backend's not-null flag.
    pub is_optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    /// Create a new column snapshot with no foreign key.
    pub fn new(name: impl Into<String>, column_type: impl Into<String>, is_optional: bool) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            is_primary_key: false,
            is_optional,
            foreign_key: None,
        }
    }

    /// Mark the column as part of the primary key.
    pub fn with_primary_key(mut self, is_primary_key: bool) -> Self {
        self.is_primary_key = is_primary_key;
        self
    }

    /// Attach a foreign key reference.
    pub fn with_foreign_key(mut self, foreign_key: Option<ForeignKey>) -> Self {
        self.foreign_key = foreign_key;
        self
    }
}

/// The table and column a foreign key column references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

impl ForeignKey {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

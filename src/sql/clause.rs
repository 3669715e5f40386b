//! Parametrized WHERE-clause construction.
//!
//! Filters are kept as an explicit ordered list of `(column, value)` entries
//! so the generated SQL is deterministic and reproducible. Values are always
//! bound as parameters. Column names cannot be bound in standard
//! parametrized-query APIs, so they are interpolated as raw text after
//! passing [`validate_identifier`] -- this is the documented trust boundary
//! for identifier interpolation throughout the crate.

use crate::error::{EngineError, EngineResult};
use crate::sql::dialect::Dialect;

/// Validate a table or column name before raw interpolation into SQL text.
///
/// Accepts `[A-Za-z_]` followed by `[A-Za-z0-9_$]`. Everything else, including
/// the empty string, is rejected -- quoting alone is not trusted to neutralize
/// hostile identifiers.
pub fn validate_identifier(name: &str) -> EngineResult<&str> {
    let mut chars = name.chars();
    let valid_first = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if valid_first && valid_rest {
        Ok(name)
    } else {
        Err(EngineError::invalid_identifier(name))
    }
}

/// Ordered substring filters, ANDed together by the query service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    entries: Vec<(String, String)>,
}

/// Clause fragments and the matching ordered bind values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltClause {
    pub fragments: Vec<String>,
    pub binds: Vec<String>,
}

impl BuiltClause {
    /// Render the fragments as a `WHERE ...` prefix, or an empty string when
    /// there are no filters.
    pub fn where_sql(&self) -> String {
        if self.fragments.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.fragments.join(" AND "))
        }
    }
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a substring filter on `column`. Entry order is preserved in the
    /// generated SQL.
    pub fn push(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((column.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Build `<column> LIKE <placeholder>` fragments plus bind values wrapped
    /// as `%value%`. Placeholders start at `start_ordinal` (1-based, relevant
    /// for dialects with numbered parameters).
    ///
    /// Fails if any filter column is not a valid identifier; values are never
    /// inspected since they travel as bind parameters.
    pub fn build(&self, dialect: Dialect, start_ordinal: usize) -> EngineResult<BuiltClause> {
        let mut fragments = Vec::with_capacity(self.entries.len());
        let mut binds = Vec::with_capacity(self.entries.len());

        for (i, (column, value)) in self.entries.iter().enumerate() {
            validate_identifier(column)?;
            fragments.push(format!(
                "{} LIKE {}",
                column,
                dialect.placeholder(start_ordinal + i)
            ));
            binds.push(format!("%{}%", value));
        }

        Ok(BuiltClause { fragments, binds })
    }
}

impl<C: Into<String>, V: Into<String>> FromIterator<(C, V)> for WhereClause {
    fn from_iter<T: IntoIterator<Item = (C, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(c, v)| (c.into(), v.into()))
                .collect(),
        }
    }
}

//! Row mapping.
//!
//! Converts a column-oriented raw result (column name list plus positional
//! value rows) into ordered row objects keyed by column name. Absent input --
//! a query that produced no result set at all -- maps to an empty sequence;
//! this function never fails.

use crate::models::{RawQueryResult, RowObject};

/// Map a raw result into one `RowObject` per value row. Keys follow the
/// column order of the result; values align positionally.
pub fn map_rows(result: Option<&RawQueryResult>) -> Vec<RowObject> {
    let Some(result) = result else {
        return Vec::new();
    };

    result
        .values
        .iter()
        .map(|row| {
            result
                .columns
                .iter()
                .zip(row.iter())
                .map(|(column, value)| (column.clone(), value.clone()))
                .collect()
        })
        .collect()
}

//! Data models for schema introspection and query results.

pub mod query;
pub mod schema;

pub use query::{QueryResponse, RawQueryResult, RowObject};
pub use schema::{Column, ForeignKey};

//! Shared SQL generation.
//!
//! This module owns everything that turns caller intent into dialect-correct
//! SQL text: the dialect policy, the parametrized WHERE-clause builder with
//! its identifier trust boundary, and the query service that composes both
//! and executes through an injected runner capability.

pub mod clause;
pub mod ddl;
pub mod dialect;
pub mod service;

pub use clause::{WhereClause, validate_identifier};
pub use dialect::Dialect;
pub use service::{ErrorSink, QueryRunner, QueryService, TracingErrorSink};

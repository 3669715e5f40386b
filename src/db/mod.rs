//! Database engines.
//!
//! One engine per backend, all fulfilling the same [`DatabaseEngine`]
//! capability surface: lifecycle, schema introspection, and paginated row
//! access. Value decoding and row shaping are shared across backends.

pub mod engine;
pub mod mapper;
pub mod mysql;
pub mod postgres;
pub mod sqlite;
pub mod values;

pub use engine::DatabaseEngine;
pub use mysql::MySqlEngine;
pub use postgres::PostgresEngine;
pub use sqlite::SqliteEngine;

//! Dialect-aware database introspection and paginated row access.
//!
//! The crate exposes one capability surface, [`DatabaseEngine`], implemented
//! for SQLite, PostgreSQL, and MySQL on top of sqlx. Engines answer schema
//! questions (tables, columns, foreign keys, DDL) and serve filtered,
//! paginated row pages whose SQL keeps values parametrized end to end.
//!
//! ```no_run
//! use dblens::{DatabaseEngine, SqliteEngine, WhereClause};
//!
//! # async fn demo() -> dblens::EngineResult<()> {
//! let mut engine = SqliteEngine::new("app.db");
//! engine.boot().await?;
//!
//! let tables = engine.tables().await;
//! let filter = WhereClause::new().push("name", "Jo");
//! let page = engine.rows("users", 50, 0, Some(&filter)).await;
//! let total = engine.total_rows("users", Some(&filter)).await;
//! # let _ = (tables, page, total);
//! engine.disconnect().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod provider;
pub mod sql;

pub use config::PoolOptions;
pub use db::{DatabaseEngine, MySqlEngine, PostgresEngine, SqliteEngine};
pub use error::{EngineError, EngineResult};
pub use models::{Column, ForeignKey, QueryResponse, RawQueryResult, RowObject};
pub use provider::SqliteFileProvider;
pub use sql::{Dialect, ErrorSink, QueryRunner, QueryService, TracingErrorSink, WhereClause};

//! SQLite engine.
//!
//! File-backed or in-memory, holding a single logical connection. A missing
//! or unreadable database file fails `boot()`; a structurally damaged one is
//! expected to be caught by `is_okay()` afterwards, which is the designed
//! recovery point for providers.

use crate::config::PoolOptions;
use crate::db::engine::DatabaseEngine;
use crate::db::{mapper, values};
use crate::error::{EngineError, EngineResult};
use crate::models::{Column, ForeignKey, QueryResponse, RowObject};
use crate::sql::{Dialect, QueryRunner, QueryService, WhereClause, ddl, validate_identifier};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Engine for one SQLite database, file-backed or in-memory.
pub struct SqliteEngine {
    source: Option<PathBuf>,
    options: PoolOptions,
    service: QueryService,
    pool: Option<SqlitePool>,
}

impl SqliteEngine {
    /// Create an engine for the given database file. The file must already
    /// exist and contain a database image.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            options: PoolOptions::default(),
            service: QueryService::new(),
            pool: None,
        }
    }

    /// Create an engine backed by a fresh in-memory database.
    pub fn in_memory() -> Self {
        Self {
            source: None,
            options: PoolOptions::default(),
            service: QueryService::new(),
            pool: None,
        }
    }

    /// Replace the query service (e.g. to inject an error sink).
    pub fn with_service(mut self, service: QueryService) -> Self {
        self.service = service;
        self
    }

    /// Override connection pool options.
    pub fn with_pool_options(mut self, options: PoolOptions) -> Self {
        self.options = options;
        self
    }

    /// The live pool, exposed so hosts and tests can run their own
    /// statements against the same database.
    pub fn pool(&self) -> Option<&SqlitePool> {
        self.pool.as_ref()
    }

    fn runner(&self) -> Option<SqliteRunner<'_>> {
        self.pool.as_ref().map(SqliteRunner)
    }
}

struct SqliteRunner<'a>(&'a SqlitePool);

#[async_trait]
impl QueryRunner for SqliteRunner<'_> {
    async fn run(&self, sql: &str, binds: &[String]) -> EngineResult<Vec<RowObject>> {
        let mut query = sqlx::query(sql);
        for bind in binds {
            query = query.bind(bind.as_str());
        }
        let rows = query.fetch_all(self.0).await?;
        let raw = values::sqlite::raw_result(&rows);
        Ok(mapper::map_rows(Some(&raw)))
    }
}

#[async_trait]
impl DatabaseEngine for SqliteEngine {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn boot(&mut self) -> EngineResult<()> {
        if self.pool.is_some() {
            return Ok(());
        }

        let connect_options = match &self.source {
            Some(path) => SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
                .map_err(|e| {
                    EngineError::initialization(format!("Invalid SQLite path: {}", e))
                })?
                .create_if_missing(false),
            None => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| EngineError::initialization(e.to_string()))?,
        };

        // A single connection held open for the engine's lifetime. For the
        // in-memory case this is load-bearing: the database lives and dies
        // with that connection.
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(self.options.max_connections_or_default(true))
            .acquire_timeout(Duration::from_secs(self.options.acquire_timeout_or_default()))
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                EngineError::initialization(format!("Failed to open database: {}", e))
            })?;

        debug!(source = ?self.source, "SQLite engine booted");
        self.pool = Some(pool);
        Ok(())
    }

    async fn disconnect(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            debug!(source = ?self.source, "SQLite engine disconnected");
        }
    }

    async fn is_okay(&self) -> bool {
        let Some(pool) = &self.pool else {
            return false;
        };

        match sqlx::query_scalar::<_, String>("PRAGMA integrity_check")
            .fetch_one(pool)
            .await
        {
            Ok(status) => status == "ok",
            Err(e) => {
                warn!(error = %e, "integrity check failed to run");
                false
            }
        }
    }

    async fn tables(&self) -> Vec<String> {
        let Some(pool) = &self.pool else {
            return Vec::new();
        };

        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "failed to list tables");
            Vec::new()
        })
    }

    async fn columns(&self, table: &str) -> Vec<Column> {
        let Some(pool) = &self.pool else {
            return Vec::new();
        };
        if validate_identifier(table).is_err() {
            warn!(table, "rejected table name for column introspection");
            return Vec::new();
        }

        let pragma = format!("PRAGMA table_info('{}')", table);
        let rows = match sqlx::query(&pragma).fetch_all(pool).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(table, error = %e, "failed to read table_info");
                return Vec::new();
            }
        };

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = row.get("name");
            let data_type: String = row.get("type");
            let notnull: i32 = row.get("notnull");
            let pk: i32 = row.get("pk");

            let foreign_key = self.foreign_key_for(table, &name).await;
            columns.push(
                Column::new(&name, &data_type, notnull == 0)
                    .with_primary_key(pk > 0)
                    .with_foreign_key(foreign_key),
            );
        }
        columns
    }

    async fn foreign_key_for(&self, table: &str, column: &str) -> Option<ForeignKey> {
        let pool = self.pool.as_ref()?;
        validate_identifier(table).ok()?;

        let pragma = format!("PRAGMA foreign_key_list('{}')", table);
        let rows = sqlx::query(&pragma).fetch_all(pool).await.ok()?;

        rows.iter()
            .find(|row| row.get::<String, _>("from") == column)
            .map(|row| ForeignKey::new(row.get::<String, _>("table"), row.get::<String, _>("to")))
    }

    async fn table_creation_sql(&self, table: &str) -> String {
        let Some(pool) = &self.pool else {
            return String::new();
        };

        let stored: Option<Option<String>> = sqlx::query_scalar(
            "SELECT sql FROM sqlite_master WHERE name = ? AND type = 'table'",
        )
        .bind(table)
        .fetch_optional(pool)
        .await
        .unwrap_or_else(|e| {
            warn!(table, error = %e, "failed to read stored DDL");
            None
        });

        match stored.flatten() {
            Some(raw) => ddl::normalize_ddl(Dialect::Sqlite, &raw),
            None => String::new(),
        }
    }

    async fn rows(
        &self,
        table: &str,
        limit: u32,
        offset: u32,
        filter: Option<&WhereClause>,
    ) -> Option<QueryResponse> {
        let runner = self.runner();
        self.service
            .fetch_rows(
                Dialect::Sqlite,
                runner.as_ref().map(|r| r as &dyn QueryRunner),
                table,
                limit,
                offset,
                filter,
            )
            .await
    }

    async fn total_rows(&self, table: &str, filter: Option<&WhereClause>) -> Option<u64> {
        let runner = self.runner();
        self.service
            .count_rows(
                Dialect::Sqlite,
                runner.as_ref().map(|r| r as &dyn QueryRunner),
                table,
                filter,
            )
            .await
    }
}

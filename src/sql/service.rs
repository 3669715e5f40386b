//! Dialect-aware query service.
//!
//! Builds full SELECT / COUNT statements from the dialect policy and the
//! clause builder, then executes them through an injected [`QueryRunner`]
//! capability. Execution failures are reported to an injected [`ErrorSink`]
//! and surfaced as `None` -- callers must treat `None` as "query failed",
//! distinct from an empty row set.

use crate::error::EngineResult;
use crate::models::{QueryResponse, RowObject};
use crate::sql::clause::WhereClause;
use crate::sql::dialect::Dialect;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};

/// Minimal execution capability the service depends on: run one rendered
/// statement with ordered string binds, return normalized row objects.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn run(&self, sql: &str, binds: &[String]) -> EngineResult<Vec<RowObject>>;
}

/// Sink for non-fatal query failures. Fire-and-forget; must not panic.
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Default sink that forwards to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, message: &str) {
        warn!(message, "query failed");
    }
}

/// Stateless-per-call SQL generation and execution service shared by all
/// engines. Owns no connection; the error sink is injected at construction
/// so tests can observe reports in isolation.
#[derive(Clone)]
pub struct QueryService {
    sink: Arc<dyn ErrorSink>,
}

impl QueryService {
    /// Create a service reporting failures through `tracing`.
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingErrorSink))
    }

    /// Create a service with an explicit error sink.
    pub fn with_sink(sink: Arc<dyn ErrorSink>) -> Self {
        Self { sink }
    }

    /// Fetch a page of rows from `table`.
    ///
    /// `limit == 0` omits the LIMIT clause entirely; a non-zero `offset`
    /// without a limit is rejected up front since several backends refuse
    /// OFFSET on its own. An absent runner means "engine not connected" and
    /// yields `None` without touching the sink.
    pub async fn fetch_rows(
        &self,
        dialect: Dialect,
        runner: Option<&dyn QueryRunner>,
        table: &str,
        limit: u32,
        offset: u32,
        filter: Option<&WhereClause>,
    ) -> Option<QueryResponse> {
        let runner = runner?;
        let (where_sql, binds) = self.build_filter(dialect, table, filter)?;

        let mut sql = format!("SELECT * FROM {}", dialect.quote(table));
        if !where_sql.is_empty() {
            sql.push(' ');
            sql.push_str(&where_sql);
        }
        if limit > 0 {
            sql.push_str(&format!(" LIMIT {}", limit));
            if offset > 0 {
                sql.push_str(&format!(" OFFSET {}", offset));
            }
        } else if offset > 0 {
            self.sink
                .report("OFFSET without LIMIT is not supported; supply a page size");
            return None;
        }

        debug!(%dialect, table, limit, offset, "fetching rows");

        match runner.run(&sql, &binds).await {
            Ok(rows) => Some(QueryResponse {
                rows,
                sql: render_display_sql(dialect, &sql, &binds),
            }),
            Err(e) => {
                self.sink.report(&e.to_string());
                None
            }
        }
    }

    /// Count the rows of `table` matching `filter`.
    ///
    /// The COUNT(*) value is extracted under the dialect's count key and
    /// coerced to an integer; a missing value counts as zero.
    pub async fn count_rows(
        &self,
        dialect: Dialect,
        runner: Option<&dyn QueryRunner>,
        table: &str,
        filter: Option<&WhereClause>,
    ) -> Option<u64> {
        let runner = runner?;
        let (where_sql, binds) = self.build_filter(dialect, table, filter)?;

        let mut sql = format!("SELECT COUNT(*) FROM {}", dialect.quote(table));
        if !where_sql.is_empty() {
            sql.push(' ');
            sql.push_str(&where_sql);
        }

        debug!(%dialect, table, "counting rows");

        let rows = match runner.run(&sql, &binds).await {
            Ok(rows) => rows,
            Err(e) => {
                self.sink.report(&e.to_string());
                return None;
            }
        };

        let count = rows
            .first()
            .and_then(|row| row.get(dialect.count_key()))
            .map(coerce_count)
            .unwrap_or(0);

        Some(count)
    }

    /// Validate the table identifier and build the WHERE fragment + binds.
    /// Reports and yields `None` on hostile identifiers.
    fn build_filter(
        &self,
        dialect: Dialect,
        table: &str,
        filter: Option<&WhereClause>,
    ) -> Option<(String, Vec<String>)> {
        if let Err(e) = crate::sql::clause::validate_identifier(table) {
            self.sink.report(&e.to_string());
            return None;
        }

        let built = match filter {
            Some(clause) => match clause.build(dialect, 1) {
                Ok(built) => built,
                Err(e) => {
                    self.sink.report(&e.to_string());
                    return None;
                }
            },
            None => Default::default(),
        };

        Some((built.where_sql(), built.binds))
    }
}

impl Default for QueryService {
    fn default() -> Self {
        Self::new()
    }
}

/// Coerce a driver-reported count value to an integer. Backends disagree on
/// the wire type (SQLite: i64, Postgres: i64 named `count`, MySQL: sometimes
/// a decimal string), so be liberal in what we accept.
fn coerce_count(value: &JsonValue) -> u64 {
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|v| v.max(0) as u64))
            .or_else(|| n.as_f64().map(|v| v.max(0.0) as u64))
            .unwrap_or(0),
        JsonValue::String(s) => s.parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Substitute bind values into a statement as quoted SQL literals, for
/// display and audit only. The result is never executed.
fn render_display_sql(dialect: Dialect, sql: &str, binds: &[String]) -> String {
    if binds.is_empty() {
        return sql.to_string();
    }

    match dialect {
        Dialect::Postgres => {
            // Replace highest ordinals first so $1 never clobbers $10.
            let mut out = sql.to_string();
            for (i, bind) in binds.iter().enumerate().rev() {
                out = out.replace(&format!("${}", i + 1), &quote_literal(bind));
            }
            out
        }
        Dialect::Sqlite | Dialect::MySql => {
            let mut out = String::with_capacity(sql.len());
            let mut remaining = binds.iter();
            for ch in sql.chars() {
                if ch == '?' {
                    match remaining.next() {
                        Some(bind) => out.push_str(&quote_literal(bind)),
                        None => out.push('?'),
                    }
                } else {
                    out.push(ch);
                }
            }
            out
        }
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Runner stub that records statements and replays canned results.
    struct StubRunner {
        seen: Mutex<Vec<(String, Vec<String>)>>,
        result: Box<dyn Fn() -> EngineResult<Vec<RowObject>> + Send + Sync>,
    }

    impl StubRunner {
        fn returning(rows: Vec<RowObject>) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                result: Box::new(move || Ok(rows.clone())),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                result: Box::new(move || Err(crate::error::EngineError::query(message, None))),
            }
        }

        fn last_sql(&self) -> String {
            self.seen.lock().unwrap().last().unwrap().0.clone()
        }
    }

    #[async_trait]
    impl QueryRunner for StubRunner {
        async fn run(&self, sql: &str, binds: &[String]) -> EngineResult<Vec<RowObject>> {
            self.seen
                .lock()
                .unwrap()
                .push((sql.to_string(), binds.to_vec()));
            (self.result)()
        }
    }

    #[derive(Default)]
    struct CapturingSink(Mutex<Vec<String>>);

    impl ErrorSink for CapturingSink {
        fn report(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    fn count_row(key: &str, value: JsonValue) -> RowObject {
        let mut row = RowObject::new();
        row.insert(key.to_string(), value);
        row
    }

    #[tokio::test]
    async fn test_absent_runner_returns_none() {
        let service = QueryService::new();
        let rows = service
            .fetch_rows(Dialect::Sqlite, None, "users", 10, 0, None)
            .await;
        assert!(rows.is_none());
        let count = service
            .count_rows(Dialect::Sqlite, None, "users", None)
            .await;
        assert!(count.is_none());
    }

    #[tokio::test]
    async fn test_fetch_rows_sql_shape() {
        let runner = StubRunner::returning(Vec::new());
        let service = QueryService::new();
        let response = service
            .fetch_rows(Dialect::Sqlite, Some(&runner), "users", 2, 4, None)
            .await
            .unwrap();
        assert_eq!(runner.last_sql(), "SELECT * FROM `users` LIMIT 2 OFFSET 4");
        assert_eq!(response.sql, "SELECT * FROM `users` LIMIT 2 OFFSET 4");
        assert!(response.rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_rows_omits_limit_when_zero() {
        let runner = StubRunner::returning(Vec::new());
        let service = QueryService::new();
        service
            .fetch_rows(Dialect::Sqlite, Some(&runner), "users", 0, 0, None)
            .await
            .unwrap();
        assert_eq!(runner.last_sql(), "SELECT * FROM `users`");
    }

    #[tokio::test]
    async fn test_offset_without_limit_rejected() {
        let runner = StubRunner::returning(Vec::new());
        let sink = Arc::new(CapturingSink::default());
        let service = QueryService::with_sink(sink.clone());
        let result = service
            .fetch_rows(Dialect::Sqlite, Some(&runner), "users", 0, 5, None)
            .await;
        assert!(result.is_none());
        assert!(sink.0.lock().unwrap()[0].contains("OFFSET without LIMIT"));
        assert!(runner.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filtered_fetch_binds_and_renders() {
        let runner = StubRunner::returning(Vec::new());
        let service = QueryService::new();
        let filter = WhereClause::new().push("name", "Jo");
        let response = service
            .fetch_rows(Dialect::Sqlite, Some(&runner), "users", 2, 0, Some(&filter))
            .await
            .unwrap();
        assert_eq!(
            runner.last_sql(),
            "SELECT * FROM `users` WHERE name LIKE ? LIMIT 2"
        );
        assert_eq!(
            response.sql,
            "SELECT * FROM `users` WHERE name LIKE '%Jo%' LIMIT 2"
        );
    }

    #[tokio::test]
    async fn test_postgres_dialect_quoting_and_placeholders() {
        let runner = StubRunner::returning(Vec::new());
        let service = QueryService::new();
        let filter = WhereClause::new().push("name", "Jo").push("city", "NY");
        service
            .fetch_rows(
                Dialect::Postgres,
                Some(&runner),
                "users",
                10,
                0,
                Some(&filter),
            )
            .await
            .unwrap();
        assert_eq!(
            runner.last_sql(),
            "SELECT * FROM \"users\" WHERE name LIKE $1 AND city LIKE $2 LIMIT 10"
        );
    }

    #[tokio::test]
    async fn test_execution_failure_reports_and_returns_none() {
        let runner = StubRunner::failing("no such table: ghosts");
        let sink = Arc::new(CapturingSink::default());
        let service = QueryService::with_sink(sink.clone());
        let result = service
            .fetch_rows(Dialect::Sqlite, Some(&runner), "ghosts", 10, 0, None)
            .await;
        assert!(result.is_none());
        assert!(sink.0.lock().unwrap()[0].contains("no such table"));
    }

    #[tokio::test]
    async fn test_hostile_table_name_reports_and_returns_none() {
        let runner = StubRunner::returning(Vec::new());
        let sink = Arc::new(CapturingSink::default());
        let service = QueryService::with_sink(sink.clone());
        let result = service
            .fetch_rows(
                Dialect::Sqlite,
                Some(&runner),
                "users`; DROP TABLE users",
                10,
                0,
                None,
            )
            .await;
        assert!(result.is_none());
        assert!(runner.seen.lock().unwrap().is_empty());
        assert!(sink.0.lock().unwrap()[0].contains("Invalid identifier"));
    }

    #[tokio::test]
    async fn test_count_extracts_dialect_key() {
        let runner = StubRunner::returning(vec![count_row("COUNT(*)", JsonValue::from(3))]);
        let service = QueryService::new();
        let count = service
            .count_rows(Dialect::Sqlite, Some(&runner), "users", None)
            .await;
        assert_eq!(count, Some(3));
        assert_eq!(runner.last_sql(), "SELECT COUNT(*) FROM `users`");
    }

    #[tokio::test]
    async fn test_count_postgres_key_and_string_coercion() {
        let runner = StubRunner::returning(vec![count_row(
            "count",
            JsonValue::String("42".to_string()),
        )]);
        let service = QueryService::new();
        let count = service
            .count_rows(Dialect::Postgres, Some(&runner), "users", None)
            .await;
        assert_eq!(count, Some(42));
    }

    #[tokio::test]
    async fn test_count_missing_value_is_zero() {
        let runner = StubRunner::returning(Vec::new());
        let service = QueryService::new();
        let count = service
            .count_rows(Dialect::MySql, Some(&runner), "users", None)
            .await;
        assert_eq!(count, Some(0));
    }

    #[test]
    fn test_quote_literal_escapes() {
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn test_render_display_sql_numbered_placeholders() {
        let binds: Vec<String> = (1..=10).map(|i| format!("v{}", i)).collect();
        let rendered = render_display_sql(Dialect::Postgres, "a $1 b $10", &binds);
        assert_eq!(rendered, "a 'v1' b 'v10'");
    }
}

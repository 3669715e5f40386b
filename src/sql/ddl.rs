//! DDL text normalization.
//!
//! Backends store (or synthesize) `CREATE TABLE` text with arbitrary
//! whitespace and line breaks. For display the statement is re-rendered
//! through sqlparser with the matching dialect, producing a single
//! whitespace-normalized statement that is semantically identical to the
//! stored one. Text sqlparser cannot parse falls back to whitespace collapse
//! so the host still gets something readable.

use crate::sql::Dialect;
use sqlparser::dialect::{Dialect as SqlParserDialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;
use tracing::debug;

fn parser_dialect(dialect: Dialect) -> Box<dyn SqlParserDialect> {
    match dialect {
        Dialect::Sqlite => Box::new(SQLiteDialect {}),
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::MySql => Box::new(MySqlDialect {}),
    }
}

/// Normalize stored DDL text for display.
pub fn normalize_ddl(dialect: Dialect, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let parsed = Parser::parse_sql(parser_dialect(dialect).as_ref(), trimmed)
        .or_else(|_| Parser::parse_sql(&GenericDialect {}, trimmed));

    match parsed {
        Ok(statements) if !statements.is_empty() => statements
            .iter()
            .map(|stmt| stmt.to_string())
            .collect::<Vec<_>>()
            .join("; "),
        _ => {
            debug!(%dialect, "DDL not parseable, collapsing whitespace");
            collapse_whitespace(trimmed)
        }
    }
}

fn collapse_whitespace(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

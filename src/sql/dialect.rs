//! Per-dialect SQL policy.
//!
//! A closed set of dialect variants behind one interface. Adding a backend
//! means adding a variant here, not editing branch logic elsewhere. All
//! methods are pure and total.

/// SQL dialect of a concrete backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
    MySql,
}

impl Dialect {
    /// Identifier quote character for this dialect.
    pub fn quote_char(self) -> char {
        match self {
            Dialect::Postgres => '"',
            Dialect::Sqlite | Dialect::MySql => '`',
        }
    }

    /// Column name under which the driver reports a `COUNT(*)` value.
    pub fn count_key(self) -> &'static str {
        match self {
            Dialect::Postgres => "count",
            Dialect::Sqlite | Dialect::MySql => "COUNT(*)",
        }
    }

    /// Bind-parameter placeholder for the given 1-based ordinal.
    pub fn placeholder(self, ordinal: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", ordinal),
            Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    /// Wrap an identifier in this dialect's quote character.
    pub fn quote(self, identifier: &str) -> String {
        let q = self.quote_char();
        format!("{q}{identifier}{q}")
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Sqlite => write!(f, "sqlite"),
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::MySql => write!(f, "mysql"),
        }
    }
}

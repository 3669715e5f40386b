//! The engine capability every backend implements.

use crate::error::EngineResult;
use crate::models::{Column, ForeignKey, QueryResponse};
use crate::sql::{Dialect, WhereClause};
use async_trait::async_trait;

/// A live, stateful connection to one database instance.
///
/// Lifecycle: constructed (not yet connected) -> booted -> disconnected
/// (terminal). Data-accessing operations invoked outside the booted state
/// return the type's empty/absent sentinel rather than failing -- "no data
/// yet" is a routine caller state. Schema results are never cached; every
/// call re-queries the live connection.
///
/// One logical connection per instance; callers must not issue overlapping
/// calls against the same engine.
#[async_trait]
pub trait DatabaseEngine: Send + Sync {
    /// SQL dialect of the backend this engine talks to.
    fn dialect(&self) -> Dialect;

    /// Open the connection. A malformed or unreachable source fails here,
    /// fatally for this instance.
    async fn boot(&mut self) -> EngineResult<()>;

    /// Release the connection. Idempotent; a no-op when not booted.
    async fn disconnect(&mut self);

    /// Run the backend's integrity check. `false` when not booted or when
    /// the backend does not report its "ok" status. Callers should invoke
    /// this after boot and treat `false` as "reject this source".
    async fn is_okay(&self) -> bool;

    /// Table names from the schema catalog, lexicographically sorted.
    async fn tables(&self) -> Vec<String>;

    /// Column snapshots for `table`, foreign keys merged in. The table name
    /// must come from [`tables`](Self::tables); it is validated and then
    /// interpolated as a raw identifier.
    async fn columns(&self, table: &str) -> Vec<Column>;

    /// First foreign key whose source column matches, if any.
    async fn foreign_key_for(&self, table: &str, column: &str) -> Option<ForeignKey>;

    /// The backend's `CREATE TABLE` text for `table`, whitespace-normalized.
    /// Empty when not booted or the table is unknown.
    async fn table_creation_sql(&self, table: &str) -> String;

    /// Fetch a page of rows. `None` means not booted or query failure,
    /// distinct from an empty page.
    async fn rows(
        &self,
        table: &str,
        limit: u32,
        offset: u32,
        filter: Option<&WhereClause>,
    ) -> Option<QueryResponse>;

    /// Count rows matching `filter`. Same `None` semantics as
    /// [`rows`](Self::rows).
    async fn total_rows(&self, table: &str, filter: Option<&WhereClause>) -> Option<u64>;
}

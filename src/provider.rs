//! Engine provisioning.
//!
//! Turns a user-selected data source into a booted, health-checked engine.
//! Failures are reported through the error sink as user-facing messages and
//! surface to the caller as `None`, never as a panic or a half-open engine.

use crate::db::{DatabaseEngine, SqliteEngine};
use crate::sql::{ErrorSink, QueryService, TracingErrorSink};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Resolves SQLite database files picked by the user into ready engines.
pub struct SqliteFileProvider {
    sink: Arc<dyn ErrorSink>,
}

impl SqliteFileProvider {
    pub fn new() -> Self {
        Self {
            sink: Arc::new(TracingErrorSink),
        }
    }

    pub fn with_sink(sink: Arc<dyn ErrorSink>) -> Self {
        Self { sink }
    }

    /// Open the file at `path`, boot an engine over it, and verify the file
    /// really is a SQLite database before handing the engine out.
    pub async fn resolve(&self, path: impl AsRef<Path>) -> Option<SqliteEngine> {
        let path = path.as_ref();
        let mut engine = SqliteEngine::new(path)
            .with_service(QueryService::with_sink(Arc::clone(&self.sink)));

        if let Err(e) = engine.boot().await {
            self.sink
                .report(&format!("Unable to open {}: {}", path.display(), e));
            return None;
        }

        if !engine.is_okay().await {
            engine.disconnect().await;
            self.sink.report(&format!(
                "{} is not a valid SQLite database",
                path.display()
            ));
            return None;
        }

        info!(path = %path.display(), "resolved SQLite database");
        Some(engine)
    }
}

impl Default for SqliteFileProvider {
    fn default() -> Self {
        Self::new()
    }
}

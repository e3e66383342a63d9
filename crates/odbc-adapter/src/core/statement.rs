//! Scoped ownership of catalog statement handles.

use tracing::{debug, warn};

use crate::error::Result;

use super::traits::{CatalogCursor, QueryResult};
use super::value::Row;

/// Owns a catalog cursor and releases it when dropped.
///
/// Release happens on every exit path, including early returns through
/// `?` while the rows are still being read.
pub struct StatementGuard<'a> {
    cursor: Box<dyn CatalogCursor + 'a>,
    call: &'static str,
}

impl<'a> StatementGuard<'a> {
    pub fn new(cursor: Box<dyn CatalogCursor + 'a>, call: &'static str) -> Self {
        debug!("Catalog call: {}", call);
        Self { cursor, call }
    }

    /// Fetch all rows. A missing result set reads as no rows.
    pub fn rows(&mut self) -> Result<Vec<Row>> {
        Ok(self.cursor.fetch_all()?.unwrap_or_default())
    }
}

impl Drop for StatementGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.cursor.release() {
            warn!("Failed to release {} statement: {}", self.call, e);
        }
    }
}

/// Cursor over rows that are already in memory.
#[derive(Debug, Default)]
pub struct BufferedCursor {
    rows: Option<Vec<Row>>,
}

impl BufferedCursor {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows: Some(rows) }
    }

    /// A cursor for a call that produced no result set.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<QueryResult> for BufferedCursor {
    fn from(result: QueryResult) -> Self {
        Self::new(result.rows)
    }
}

impl CatalogCursor for BufferedCursor {
    fn fetch_all(&mut self) -> Result<Option<Vec<Row>>> {
        Ok(self.rows.take())
    }

    fn release(&mut self) -> Result<()> {
        self.rows = None;
        Ok(())
    }
}

//! In-memory connection with canned catalog results.
//!
//! Records every statement it is asked to run and answers catalog calls
//! and queries from data supplied up front. Used by the test suites and
//! by the CLI's dry-run mode, where the recorded statements are the output.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::core::traits::{CatalogCursor, Connection, DatabaseMetadata, QueryResult};
use crate::core::value::Row;
use crate::error::{AdapterError, Result};

/// Cursor over canned rows that counts its releases.
struct ScriptedCursor<'a> {
    rows: Option<Vec<Row>>,
    fail: Option<String>,
    call: &'static str,
    released: bool,
    releases: &'a Cell<usize>,
}

impl CatalogCursor for ScriptedCursor<'_> {
    fn fetch_all(&mut self) -> Result<Option<Vec<Row>>> {
        if let Some(message) = &self.fail {
            return Err(AdapterError::driver(message.clone(), self.call));
        }
        Ok(self.rows.take())
    }

    fn release(&mut self) -> Result<()> {
        if !self.released {
            self.released = true;
            self.releases.set(self.releases.get() + 1);
        }
        Ok(())
    }
}

/// Connection double driven by canned data.
#[derive(Debug, Default)]
pub struct ScriptedConnection {
    metadata: DatabaseMetadata,
    tables: Option<Vec<Row>>,
    columns: HashMap<String, Vec<Row>>,
    indexes: HashMap<String, Vec<Row>>,
    foreign_keys: HashMap<String, Vec<Row>>,
    type_info: Vec<Row>,
    responses: Vec<(String, QueryResult)>,
    failures: Vec<(String, String)>,
    fetch_failures: HashMap<&'static str, String>,
    statements: RefCell<Vec<String>>,
    opened: Cell<usize>,
    releases: Cell<usize>,
}

impl ScriptedConnection {
    pub fn new(metadata: DatabaseMetadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }

    /// Rows returned by `SQLTables`.
    pub fn with_tables(mut self, rows: Vec<Row>) -> Self {
        self.tables = Some(rows);
        self
    }

    /// Rows returned by `SQLColumns` for `table`.
    pub fn with_columns(mut self, table: &str, rows: Vec<Row>) -> Self {
        self.columns.insert(table.to_string(), rows);
        self
    }

    /// Rows returned by `SQLStatistics` for `table`.
    pub fn with_indexes(mut self, table: &str, rows: Vec<Row>) -> Self {
        self.indexes.insert(table.to_string(), rows);
        self
    }

    /// Rows returned by `SQLForeignKeys` for `table`.
    pub fn with_foreign_keys(mut self, table: &str, rows: Vec<Row>) -> Self {
        self.foreign_keys.insert(table.to_string(), rows);
        self
    }

    /// Rows returned by `SQLGetTypeInfo`.
    pub fn with_type_info(mut self, rows: Vec<Row>) -> Self {
        self.type_info = rows;
        self
    }

    /// Answer queries containing `pattern` with `rows`.
    ///
    /// Earlier registrations win when several patterns match.
    pub fn respond(mut self, pattern: &str, rows: Vec<Row>) -> Self {
        self.responses.push((
            pattern.to_string(),
            QueryResult {
                columns: Vec::new(),
                rows,
            },
        ));
        self
    }

    /// Fail any statement or query containing `pattern`.
    pub fn fail_on(mut self, pattern: &str, message: &str) -> Self {
        self.failures.push((pattern.to_string(), message.to_string()));
        self
    }

    /// Make fetching from the given catalog call fail after the cursor opens.
    pub fn fail_fetch(mut self, call: &'static str, message: &str) -> Self {
        self.fetch_failures.insert(call, message.to_string());
        self
    }

    /// Every statement and query issued, in order.
    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    /// Statements issued after the first `skip`.
    pub fn statements_since(&self, skip: usize) -> Vec<String> {
        self.statements.borrow().iter().skip(skip).cloned().collect()
    }

    /// Catalog cursors opened and not yet released.
    pub fn open_cursors(&self) -> usize {
        self.opened.get() - self.releases.get()
    }

    /// Total catalog cursors released.
    pub fn released_cursors(&self) -> usize {
        self.releases.get()
    }

    fn record(&self, sql: &str) -> Result<()> {
        self.statements.borrow_mut().push(sql.to_string());
        match self.failures.iter().find(|(pattern, _)| sql.contains(pattern.as_str())) {
            Some((_, message)) => Err(AdapterError::driver(message.clone(), sql)),
            None => Ok(()),
        }
    }

    fn cursor(&self, call: &'static str, rows: Option<Vec<Row>>) -> Box<dyn CatalogCursor + '_> {
        self.opened.set(self.opened.get() + 1);
        Box::new(ScriptedCursor {
            rows,
            fail: self.fetch_failures.get(call).cloned(),
            call,
            released: false,
            releases: &self.releases,
        })
    }
}

impl Connection for ScriptedConnection {
    fn tables(&self) -> Result<Box<dyn CatalogCursor + '_>> {
        Ok(self.cursor("SQLTables", self.tables.clone()))
    }

    fn columns(&self, table: &str) -> Result<Box<dyn CatalogCursor + '_>> {
        Ok(self.cursor("SQLColumns", self.columns.get(table).cloned()))
    }

    fn indexes(&self, table: &str) -> Result<Box<dyn CatalogCursor + '_>> {
        Ok(self.cursor("SQLStatistics", self.indexes.get(table).cloned()))
    }

    fn foreign_keys(&self, table: &str) -> Result<Box<dyn CatalogCursor + '_>> {
        Ok(self.cursor("SQLForeignKeys", self.foreign_keys.get(table).cloned()))
    }

    fn type_info(&self) -> Result<Box<dyn CatalogCursor + '_>> {
        Ok(self.cursor("SQLGetTypeInfo", Some(self.type_info.clone())))
    }

    fn execute(&self, sql: &str) -> Result<()> {
        self.record(sql)
    }

    fn exec_query(&self, sql: &str) -> Result<QueryResult> {
        self.record(sql)?;
        Ok(self
            .responses
            .iter()
            .find(|(pattern, _)| sql.contains(pattern.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_default())
    }

    fn database_metadata(&self) -> &DatabaseMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::statement::StatementGuard;
    use crate::core::value::SqlValue;

    #[test]
    fn test_records_statements_and_failures() {
        let conn = ScriptedConnection::default().fail_on("DROP SEQUENCE", "sequence not found");
        conn.execute("DROP TABLE \"t\"").unwrap();
        let err = conn.execute("DROP SEQUENCE \"t_seq\"").unwrap_err();

        assert!(err.to_string().contains("sequence not found"));
        assert_eq!(conn.statements(), vec!["DROP TABLE \"t\"", "DROP SEQUENCE \"t_seq\""]);
    }

    #[test]
    fn test_query_responses() {
        let conn = ScriptedConnection::default().respond("NEXTVAL", vec![vec![SqlValue::Int(42)]]);
        let result = conn.exec_query("SELECT \"s\".NEXTVAL FROM DUMMY").unwrap();
        assert_eq!(result.rows, vec![vec![SqlValue::Int(42)]]);
        assert!(conn.exec_query("SELECT 1").unwrap().rows.is_empty());
    }

    #[test]
    fn test_cursor_release_is_counted_once() {
        let conn = ScriptedConnection::default().with_tables(Vec::new());
        {
            let mut guard = StatementGuard::new(conn.tables().unwrap(), "SQLTables");
            assert_eq!(conn.open_cursors(), 1);
            assert!(guard.rows().unwrap().is_empty());
        }
        assert_eq!(conn.open_cursors(), 0);
        assert_eq!(conn.released_cursors(), 1);
    }
}

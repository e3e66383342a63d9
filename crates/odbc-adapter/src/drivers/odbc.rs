//! ODBC driver connection.
//!
//! Holds one ODBC connection for the lifetime of the adapter, since the
//! schema set by `SET SCHEMA` is session state. Catalog cursors keep the
//! driver statement handle open until they are read or released.

use std::sync::OnceLock;

use odbc_api::buffers::TextRowSet;
use odbc_api::handles::StatementImpl;
use odbc_api::{ConnectionOptions, Cursor, CursorImpl, Environment, ResultSetMetadata};
use tracing::{debug, info, warn};

use crate::core::identifier::IdentifierCase;
use crate::core::statement::BufferedCursor;
use crate::core::traits::{CatalogCursor, Connection, DatabaseMetadata, QueryResult};
use crate::core::value::{Row, SqlValue};
use crate::error::{AdapterError, Result};

/// Rows fetched per round trip.
const BATCH_SIZE: usize = 100;

/// Upper bound, in bytes, for a single text cell.
///
/// Longer values (large column defaults, view definitions) come back cut at
/// this length; a warning is logged when a cell fills the buffer.
const MAX_TEXT_LEN: usize = 4096;

static ENVIRONMENT: OnceLock<Environment> = OnceLock::new();

/// Process-wide ODBC environment, created on first use.
fn environment() -> Result<&'static Environment> {
    if let Some(env) = ENVIRONMENT.get() {
        return Ok(env);
    }
    let env = Environment::new().map_err(|e| {
        AdapterError::Config(format!(
            "Failed to create ODBC environment: {}.\n\n\
             Install an ODBC driver manager (unixODBC on Linux/macOS) and the \
             database vendor's ODBC driver.",
            e
        ))
    })?;
    Ok(ENVIRONMENT.get_or_init(|| env))
}

/// Check that an ODBC driver manager is available.
pub fn check_odbc_available() -> Result<()> {
    environment().map(|_| ())
}

/// Read every row of a cursor as text cells.
fn read_rows(mut cursor: CursorImpl<StatementImpl<'_>>, context: &str) -> Result<Vec<Row>> {
    let num_cols = cursor
        .num_result_cols()
        .map_err(|e| AdapterError::driver(e.to_string(), context))?;
    if num_cols <= 0 {
        return Ok(Vec::new());
    }

    let mut buffers = TextRowSet::for_cursor(BATCH_SIZE, &mut cursor, Some(MAX_TEXT_LEN))
        .map_err(|e| AdapterError::driver(format!("create buffer failed: {}", e), context))?;
    let mut row_cursor = cursor
        .bind_buffer(&mut buffers)
        .map_err(|e| AdapterError::driver(format!("bind buffer failed: {}", e), context))?;

    let mut rows = Vec::new();
    while let Some(batch) = row_cursor
        .fetch()
        .map_err(|e| AdapterError::driver(format!("fetch failed: {}", e), context))?
    {
        for row_idx in 0..batch.num_rows() {
            let row = (0..batch.num_cols())
                .map(|col| match batch.at(col, row_idx) {
                    Some(bytes) => text_cell(bytes, context),
                    None => SqlValue::Null,
                })
                .collect();
            rows.push(row);
        }
    }
    Ok(rows)
}

fn text_cell(bytes: &[u8], context: &str) -> SqlValue {
    if bytes.len() >= MAX_TEXT_LEN {
        warn!(
            "{}: value reached the {} byte cell limit and may be truncated",
            context, MAX_TEXT_LEN
        );
    }
    SqlValue::Text(String::from_utf8_lossy(bytes).into_owned())
}

/// Catalog cursor owning an open ODBC statement.
struct OdbcCursor<'c> {
    cursor: Option<CursorImpl<StatementImpl<'c>>>,
    call: &'static str,
}

impl CatalogCursor for OdbcCursor<'_> {
    fn fetch_all(&mut self) -> Result<Option<Vec<Row>>> {
        match self.cursor.take() {
            Some(cursor) => read_rows(cursor, self.call).map(Some),
            None => Ok(None),
        }
    }

    fn release(&mut self) -> Result<()> {
        // Dropping the cursor frees the statement handle.
        self.cursor = None;
        Ok(())
    }
}

/// Live ODBC connection.
pub struct OdbcConnection {
    conn: odbc_api::Connection<'static>,
    metadata: DatabaseMetadata,
}

impl OdbcConnection {
    /// Connect with a complete ODBC connection string.
    pub fn connect(connection_string: &str) -> Result<Self> {
        let env = environment()?;
        let conn = env
            .connect_with_connection_string(connection_string, ConnectionOptions::default())
            .map_err(|e| AdapterError::driver(e.to_string(), "SQLDriverConnect"))?;

        let metadata = DatabaseMetadata {
            dbms_name: conn.database_management_system_name()?,
            database_name: conn.current_catalog().unwrap_or_default(),
            max_identifier_len: conn
                .max_column_name_len()
                .ok()
                .filter(|len| *len > 0)
                .map(usize::from),
            identifier_case: IdentifierCase::Mixed,
        };

        info!(
            "Connected via ODBC: {} (database '{}')",
            metadata.dbms_name,
            metadata.database_name.trim()
        );

        Ok(Self { conn, metadata })
    }

    fn catalog(
        &self,
        call: &'static str,
        result: std::result::Result<CursorImpl<StatementImpl<'_>>, odbc_api::Error>,
    ) -> Result<Box<dyn CatalogCursor + '_>> {
        let cursor = result.map_err(|e| AdapterError::driver(e.to_string(), call))?;
        Ok(Box::new(OdbcCursor {
            cursor: Some(cursor),
            call,
        }))
    }
}

impl Connection for OdbcConnection {
    fn tables(&self) -> Result<Box<dyn CatalogCursor + '_>> {
        self.catalog("SQLTables", self.conn.tables("", "", "", ""))
    }

    fn columns(&self, table: &str) -> Result<Box<dyn CatalogCursor + '_>> {
        self.catalog("SQLColumns", self.conn.columns("", "", table, ""))
    }

    fn indexes(&self, table: &str) -> Result<Box<dyn CatalogCursor + '_>> {
        Err(AdapterError::driver(
            "SQLStatistics is not exposed by the ODBC binding; use a dialect with an index catalog query",
            format!("SQLStatistics({})", table),
        ))
    }

    fn foreign_keys(&self, table: &str) -> Result<Box<dyn CatalogCursor + '_>> {
        self.catalog(
            "SQLForeignKeys",
            self.conn.foreign_keys("", "", "", "", "", table),
        )
    }

    fn type_info(&self) -> Result<Box<dyn CatalogCursor + '_>> {
        // Without SQLGetTypeInfo every abstract type uses the dialect default.
        debug!("SQLGetTypeInfo unavailable; using dialect type defaults");
        Ok(Box::new(BufferedCursor::empty()))
    }

    fn execute(&self, sql: &str) -> Result<()> {
        self.conn
            .execute(sql, ())
            .map_err(|e| AdapterError::driver(e.to_string(), sql))?;
        Ok(())
    }

    fn exec_query(&self, sql: &str) -> Result<QueryResult> {
        let cursor = self
            .conn
            .execute(sql, ())
            .map_err(|e| AdapterError::driver(e.to_string(), sql))?;

        let Some(mut cursor) = cursor else {
            return Ok(QueryResult::default());
        };

        let columns = cursor
            .column_names()
            .map_err(|e| AdapterError::driver(e.to_string(), sql))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AdapterError::driver(e.to_string(), sql))?;
        let rows = read_rows(cursor, sql)?;

        Ok(QueryResult { columns, rows })
    }

    fn database_metadata(&self) -> &DatabaseMetadata {
        &self.metadata
    }
}

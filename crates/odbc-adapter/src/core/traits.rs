//! Core traits for the driver contract and the dialect strategy.
//!
//! - [`Connection`]: the driver-level API the adapter consumes (catalog
//!   functions, statement execution, connection metadata)
//! - [`CatalogCursor`]: a result set produced by a catalog function
//! - [`Dialect`]: per-database capability overrides
//!
//! `SchemaStatements` only ever talks to these traits, so the same code
//! drives a live ODBC connection or the in-memory scripted connection.

use serde::Serialize;

use crate::error::Result;
use crate::typemap::{AbstractType, NativeType};

use super::identifier::IdentifierCase;
use super::value::Row;

/// Connection metadata reported by the driver (`SQLGetInfo`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatabaseMetadata {
    /// DBMS product name, e.g. "HDB".
    pub dbms_name: String,

    /// Current database (catalog) name.
    pub database_name: String,

    /// Maximum identifier length, when the driver reports one.
    pub max_identifier_len: Option<usize>,

    /// How unquoted identifiers are stored in the catalog.
    pub identifier_case: IdentifierCase,
}

/// Result of an ad-hoc query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Column labels.
    pub columns: Vec<String>,
    /// Row values, in column order.
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Values of the first column, skipping NULLs.
    pub fn first_column(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.first().and_then(|v| v.to_text()))
            .collect()
    }
}

/// A catalog result set.
///
/// The driver handle behind a cursor must be released exactly once callers
/// are done with it; wrap cursors in
/// [`StatementGuard`](super::statement::StatementGuard) rather than calling
/// [`release`](Self::release) by hand.
pub trait CatalogCursor {
    /// Fetch every remaining row. `None` means the driver produced no
    /// result set at all.
    fn fetch_all(&mut self) -> Result<Option<Vec<Row>>>;

    /// Release the underlying statement handle. Must be idempotent.
    fn release(&mut self) -> Result<()>;
}

/// Driver-level connection.
///
/// Catalog methods return rows shaped like the corresponding ODBC catalog
/// functions (`SQLTables`, `SQLColumns`, `SQLStatistics`, `SQLForeignKeys`,
/// `SQLGetTypeInfo`). Table arguments are passed through verbatim.
pub trait Connection {
    /// `SQLTables` for every table visible to the session.
    fn tables(&self) -> Result<Box<dyn CatalogCursor + '_>>;

    /// `SQLColumns` for one table.
    fn columns(&self, table: &str) -> Result<Box<dyn CatalogCursor + '_>>;

    /// `SQLStatistics` for one table.
    fn indexes(&self, table: &str) -> Result<Box<dyn CatalogCursor + '_>>;

    /// `SQLForeignKeys` with the table on the foreign key side.
    fn foreign_keys(&self, table: &str) -> Result<Box<dyn CatalogCursor + '_>>;

    /// `SQLGetTypeInfo` for all types.
    fn type_info(&self) -> Result<Box<dyn CatalogCursor + '_>>;

    /// Execute a statement that returns no rows.
    fn execute(&self, sql: &str) -> Result<()>;

    /// Execute a query and materialize its result.
    fn exec_query(&self, sql: &str) -> Result<QueryResult>;

    /// Connection metadata.
    fn database_metadata(&self) -> &DatabaseMetadata;
}

/// SQL capability strategy for a database product.
///
/// Everything product-specific that `SchemaStatements` needs is asked of
/// the dialect: identifier folding, which catalog rows to hide, type
/// names, and the literal catalog queries for products whose ODBC catalog
/// functions are incomplete.
pub trait Dialect {
    /// Dialect identifier (e.g. "hana", "generic").
    fn name(&self) -> &str;

    /// Identifier case policy, given what the driver reports.
    fn identifier_case(&self, reported: IdentifierCase) -> IdentifierCase;

    /// Whether a `tables()` row with this schema and table type is hidden.
    fn table_filtered(&self, schema: &str, table_type: &str) -> bool;

    /// Native type name that stores booleans.
    fn boolean_type(&self) -> &str;

    /// Column type text for an auto-created primary key.
    fn primary_key_type(&self) -> &str;

    /// Whether statements are prepared with bind parameters.
    fn prepared_statements(&self) -> bool;

    /// Whether primary key values are fetched from the sequence before insert.
    fn prefetch_primary_key(&self) -> bool;

    /// Whether the session is scoped to the configured database on connect.
    fn scopes_to_database(&self) -> bool;

    /// Literal column catalog query. `None` uses the driver's `SQLColumns`.
    ///
    /// The query must return, in order: name, default, type name or code,
    /// nullability, native type name, size, scale.
    fn columns_query(&self, schema: &str, table: &str) -> Option<String>;

    /// Literal index statistics query shaped like `SQLStatistics`.
    /// `None` uses the driver's catalog function.
    fn statistics_query(&self, schema: &str, table: &str) -> Option<String>;

    /// Query returning primary key column names of a table.
    fn primary_key_query(&self, schema: &str, table: &str) -> String;

    /// Query returning one schema name per row.
    fn schemas_query(&self) -> String;

    /// Query returning the next value of an already-quoted sequence name.
    fn next_value_query(&self, quoted_sequence: &str) -> String;

    /// Native type used when the driver's type catalog has no match.
    fn fallback_native_type(&self, abstract_type: AbstractType) -> NativeType;

    /// SQL text that reproduces a column default read from the catalog.
    fn catalog_default_sql(&self, default: &str, abstract_type: AbstractType) -> String;
}

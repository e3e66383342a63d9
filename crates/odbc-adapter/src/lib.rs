//! # odbc-adapter
//!
//! Schema introspection and DDL over ODBC-style database drivers.
//!
//! This library maps a driver-level connection (catalog functions plus
//! statement execution) onto an ORM-style schema interface:
//!
//! - **Quoting** of strings, identifiers, booleans and dates as SQL text
//! - **Introspection** of tables, columns, indexes, foreign keys, primary
//!   keys and schemas
//! - **DDL** for tables, columns, sequences, schemas and databases
//! - **Dialects** for SAP HANA and a generic ODBC fallback
//!
//! ## Example
//!
//! ```rust
//! use odbc_adapter::{
//!     AdapterSettings, ColumnOptions, CreateTableOptions, DatabaseMetadata, DialectImpl,
//!     SchemaStatements, ScriptedConnection,
//! };
//!
//! # fn main() -> odbc_adapter::Result<()> {
//! let conn = ScriptedConnection::new(DatabaseMetadata::default());
//! let adapter = SchemaStatements::new(conn, DialectImpl::from_db_type("hana")?, AdapterSettings::default())?;
//!
//! adapter.create_table("users", &CreateTableOptions::default(), |t| {
//!     t.string("name", ColumnOptions::default().limit(100));
//! })?;
//!
//! let sql = adapter.connection().statements();
//! assert_eq!(sql[1], "CREATE COLUMN TABLE \"users\" (\"id\" INT NOT NULL PRIMARY KEY, \"name\" NVARCHAR(100))");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod dialect;
pub mod drivers;
pub mod error;
pub mod quoting;
pub mod schema_statements;
pub mod typemap;

// Re-exports for convenient access
pub use config::{AdapterConfig, Config, ConnectionConfig};
pub use crate::core::{
    ColumnDefinition, ColumnOptions, ColumnSpec, ColumnType, Connection, DatabaseMetadata, Dialect,
    ForeignKeyDefinition, IdentifierCase, IndexDefinition, ReferentialAction, SqlTypeMetadata,
    SqlValue, TableDefinition,
};
pub use dialect::{DialectImpl, GenericDialect, HanaDialect};
#[cfg(feature = "odbc")]
pub use drivers::OdbcConnection;
pub use drivers::ScriptedConnection;
pub use error::{AdapterError, Result};
pub use quoting::{DefaultTimezone, Quoting};
pub use schema_statements::{
    AdapterSettings, CreateTableOptions, IndexNameSource, SchemaStatements, SequenceDropPolicy,
    StorageMode,
};
pub use typemap::AbstractType;

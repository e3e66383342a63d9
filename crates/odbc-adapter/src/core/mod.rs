//! Core abstractions shared by the schema layer and the drivers.
//!
//! - [`schema`]: column, index and foreign key descriptors, DDL column specs
//! - [`value`]: SQL value representation for catalog cells and literals
//! - [`traits`]: the driver contract and the dialect strategy
//! - [`statement`]: scoped release of catalog statement handles
//! - [`identifier`]: identifier quoting and case folding

pub mod identifier;
pub mod schema;
pub mod statement;
pub mod traits;
pub mod value;

pub use identifier::IdentifierCase;
pub use schema::{
    ColumnDefinition, ColumnOptions, ColumnSpec, ColumnType, ForeignKeyDefinition,
    IndexDefinition, ReferentialAction, SqlTypeMetadata, TableDefinition,
};
pub use statement::{BufferedCursor, StatementGuard};
pub use traits::{CatalogCursor, Connection, DatabaseMetadata, Dialect, QueryResult};
pub use value::{Row, RowExt, SqlValue};

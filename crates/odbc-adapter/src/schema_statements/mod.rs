//! Schema introspection and DDL over a driver connection.
//!
//! [`SchemaStatements`] owns a [`Connection`] and a [`DialectImpl`]. Catalog
//! results are reshaped into the descriptor types in [`crate::core::schema`];
//! DDL requests are rendered as literal SQL with [`Quoting`] and executed
//! directly. Driver failures propagate unchanged.
//!
//! The operations are split by concern:
//!
//! - [`introspection`]: tables, columns, indexes, keys, schemas, types
//! - [`ddl`]: tables, columns, schemas and databases
//! - [`sequences`]: the sequences backing primary keys
//! - [`indexes`]: index row grouping and index naming

pub mod ddl;
pub mod indexes;
pub mod introspection;
pub mod sequences;

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::identifier::{IdentifierCase, DEFAULT_MAX_IDENTIFIER_LENGTH};
use crate::core::traits::{Connection, Dialect, QueryResult};
use crate::dialect::DialectImpl;
use crate::error::Result;
use crate::quoting::{DefaultTimezone, Quoting};
use crate::typemap::NativeTypes;

pub use ddl::{CreateTableOptions, StorageMode};
pub use indexes::{group_index_rows, IndexNameSource};
pub use sequences::{default_sequence_name, SequenceDropPolicy};

/// Adapter behavior settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterSettings {
    /// Database (schema) the session is scoped to.
    pub database: Option<String>,

    /// Timezone for quoting timezone-aware values.
    pub default_timezone: DefaultTimezone,

    /// What `drop_table` does when dropping the backing sequence fails.
    pub sequence_drop_policy: SequenceDropPolicy,

    /// Overrides the driver-reported maximum identifier length.
    pub max_identifier_length: Option<usize>,
}

/// Schema statements for one connection.
pub struct SchemaStatements<C: Connection> {
    conn: C,
    dialect: DialectImpl,
    quoting: Quoting,
    settings: AdapterSettings,
    case: IdentifierCase,
    schema: String,
    native_types: OnceCell<NativeTypes>,
}

impl<C: Connection> SchemaStatements<C> {
    /// Wrap a connection.
    ///
    /// Dialects that scope the session to the configured database issue
    /// `SET SCHEMA` here.
    pub fn new(conn: C, dialect: DialectImpl, settings: AdapterSettings) -> Result<Self> {
        let metadata = conn.database_metadata();
        let case = dialect.identifier_case(metadata.identifier_case);
        let schema = settings
            .database
            .clone()
            .unwrap_or_else(|| metadata.database_name.trim().to_string());

        let adapter = Self {
            quoting: Quoting::new(settings.default_timezone),
            conn,
            dialect,
            settings,
            case,
            schema,
            native_types: OnceCell::new(),
        };

        if adapter.dialect.scopes_to_database() {
            if let Some(database) = adapter.settings.database.clone() {
                adapter.set_schema_statement(&database)?;
                info!("Session scoped to schema '{}'", database);
            }
        }

        Ok(adapter)
    }

    /// Underlying connection.
    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn dialect(&self) -> &DialectImpl {
        &self.dialect
    }

    pub fn quoting(&self) -> &Quoting {
        &self.quoting
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    /// Schema used to scope catalog queries.
    pub fn current_schema(&self) -> &str {
        &self.schema
    }

    /// Whether statements are prepared with bind parameters.
    pub fn prepared_statements(&self) -> bool {
        self.dialect.prepared_statements()
    }

    /// Whether primary keys are fetched from the sequence before insert.
    pub fn prefetch_primary_key(&self) -> bool {
        self.dialect.prefetch_primary_key()
    }

    /// Catalog name to application name.
    pub fn format_case(&self, identifier: &str) -> String {
        self.case.format_case(identifier)
    }

    /// Application name to catalog name.
    pub fn native_case(&self, identifier: &str) -> String {
        self.case.native_case(identifier)
    }

    /// Maximum identifier length: configured, then driver-reported, then 255.
    pub fn max_identifier_len(&self) -> usize {
        self.settings
            .max_identifier_length
            .or(self.conn.database_metadata().max_identifier_len)
            .unwrap_or(DEFAULT_MAX_IDENTIFIER_LENGTH)
    }

    /// Execute a statement.
    pub fn execute(&self, sql: &str) -> Result<()> {
        debug!("Executing SQL: {}", sql);
        self.conn.execute(sql)
    }

    /// Run a query and materialize its rows.
    pub fn exec_query(&self, sql: &str) -> Result<QueryResult> {
        debug!("Executing query: {}", sql);
        self.conn.exec_query(sql)
    }

    /// First column of every row a query returns.
    pub fn select_values(&self, sql: &str) -> Result<Vec<String>> {
        Ok(self.exec_query(sql)?.first_column())
    }

    fn set_schema_statement(&self, name: &str) -> Result<()> {
        self.execute(&format!("SET SCHEMA {}", self.quoting.quote_table_name(name)))
    }

    /// Native type map, computed from the driver's type catalog on first use.
    pub fn native_database_types(&self) -> Result<&NativeTypes> {
        if let Some(types) = self.native_types.get() {
            return Ok(types);
        }
        let types = self.load_native_types()?;
        Ok(self.native_types.get_or_init(|| types))
    }
}

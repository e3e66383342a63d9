//! Fallback dialect for DBMSs without a dedicated implementation.
//!
//! Relies on the driver's catalog functions and the identifier case the
//! driver reports, and only uses SQL that most products accept.

use crate::core::identifier::IdentifierCase;
use crate::core::traits::Dialect;
use crate::quoting::Quoting;
use crate::typemap::{AbstractType, NativeType};

/// Generic ODBC dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct GenericDialect;

impl GenericDialect {
    pub fn new() -> Self {
        Self
    }
}

/// Render a string as a single-quoted SQL literal.
fn literal(value: &str) -> String {
    format!("'{}'", Quoting::default().quote_string(value))
}

impl Dialect for GenericDialect {
    fn name(&self) -> &str {
        "generic"
    }

    fn identifier_case(&self, reported: IdentifierCase) -> IdentifierCase {
        reported
    }

    fn table_filtered(&self, _schema: &str, table_type: &str) -> bool {
        !table_type.eq_ignore_ascii_case("TABLE")
    }

    fn boolean_type(&self) -> &str {
        "BOOLEAN"
    }

    fn primary_key_type(&self) -> &str {
        "INTEGER NOT NULL PRIMARY KEY"
    }

    fn prepared_statements(&self) -> bool {
        false
    }

    fn prefetch_primary_key(&self) -> bool {
        false
    }

    fn scopes_to_database(&self) -> bool {
        false
    }

    fn columns_query(&self, _schema: &str, _table: &str) -> Option<String> {
        None
    }

    fn statistics_query(&self, _schema: &str, _table: &str) -> Option<String> {
        None
    }

    fn primary_key_query(&self, schema: &str, table: &str) -> String {
        format!(
            "SELECT KCU.COLUMN_NAME FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS TC \
             JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE KCU \
             ON KCU.CONSTRAINT_NAME = TC.CONSTRAINT_NAME AND KCU.TABLE_SCHEMA = TC.TABLE_SCHEMA \
             WHERE TC.CONSTRAINT_TYPE = 'PRIMARY KEY' AND TC.TABLE_SCHEMA = {} AND TC.TABLE_NAME = {} \
             ORDER BY KCU.ORDINAL_POSITION",
            literal(schema),
            literal(table)
        )
    }

    fn schemas_query(&self) -> String {
        "SELECT SCHEMA_NAME FROM INFORMATION_SCHEMA.SCHEMATA".to_string()
    }

    fn next_value_query(&self, quoted_sequence: &str) -> String {
        format!("SELECT NEXT VALUE FOR {}", quoted_sequence)
    }

    fn fallback_native_type(&self, abstract_type: AbstractType) -> NativeType {
        match abstract_type {
            AbstractType::PrimaryKey => NativeType::Raw(self.primary_key_type().to_string()),
            AbstractType::String => NativeType::named("VARCHAR", Some(255)),
            AbstractType::Text => NativeType::named("VARCHAR", Some(4000)),
            AbstractType::Integer => NativeType::named("INTEGER", None),
            AbstractType::Bigint => NativeType::named("BIGINT", None),
            AbstractType::Decimal => NativeType::named("DECIMAL", None),
            AbstractType::Float => NativeType::named("FLOAT", None),
            AbstractType::Datetime | AbstractType::Timestamp => NativeType::named("TIMESTAMP", None),
            AbstractType::Time => NativeType::named("TIME", None),
            AbstractType::Date => NativeType::named("DATE", None),
            AbstractType::Binary => NativeType::named("VARBINARY", Some(8000)),
            AbstractType::Boolean => NativeType::named(self.boolean_type(), None),
        }
    }

    // SQLColumns COLUMN_DEF is already SQL text.
    fn catalog_default_sql(&self, default: &str, _abstract_type: AbstractType) -> String {
        default.to_string()
    }
}

//! SAP HANA dialect.
//!
//! HANA's ODBC driver folds unquoted names to upper case, lists its own
//! system schemas in `SQLTables`, and reports column metadata more reliably
//! through `SYS.COLUMNS` than through `SQLColumns`, so those are all
//! overridden here.

use crate::core::identifier::IdentifierCase;
use crate::core::traits::Dialect;
use crate::quoting::Quoting;
use crate::typemap::{AbstractType, NativeType};

/// Column type text for auto-created primary keys.
pub const HANA_PRIMARY_KEY: &str = "INT NOT NULL PRIMARY KEY";

/// SAP HANA dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct HanaDialect;

impl HanaDialect {
    pub fn new() -> Self {
        Self
    }
}

/// Render a string as a single-quoted SQL literal.
fn literal(value: &str) -> String {
    format!("'{}'", Quoting::default().quote_string(value))
}

impl Dialect for HanaDialect {
    fn name(&self) -> &str {
        "hana"
    }

    fn identifier_case(&self, _reported: IdentifierCase) -> IdentifierCase {
        IdentifierCase::Upper
    }

    fn table_filtered(&self, schema: &str, table_type: &str) -> bool {
        let system_schema = schema.eq_ignore_ascii_case("SYS") || schema.starts_with("_SYS");
        system_schema || !table_type.eq_ignore_ascii_case("TABLE")
    }

    fn boolean_type(&self) -> &str {
        "BOOLEAN"
    }

    fn primary_key_type(&self) -> &str {
        HANA_PRIMARY_KEY
    }

    fn prepared_statements(&self) -> bool {
        false
    }

    fn prefetch_primary_key(&self) -> bool {
        true
    }

    fn scopes_to_database(&self) -> bool {
        true
    }

    fn columns_query(&self, schema: &str, table: &str) -> Option<String> {
        Some(format!(
            "SELECT COLUMN_NAME, DEFAULT_VALUE, DATA_TYPE_NAME, IS_NULLABLE, CS_DATA_TYPE_NAME, LENGTH, SCALE \
             FROM SYS.COLUMNS WHERE SCHEMA_NAME={} AND TABLE_NAME={} ORDER BY POSITION",
            literal(schema),
            literal(table)
        ))
    }

    fn statistics_query(&self, schema: &str, table: &str) -> Option<String> {
        // Same column positions as SQLStatistics: NON_UNIQUE 3, INDEX_NAME 5,
        // TYPE 6, ORDINAL_POSITION 7, COLUMN_NAME 8.
        Some(format!(
            "SELECT NULL, C.SCHEMA_NAME, C.TABLE_NAME, \
             CASE WHEN I.CONSTRAINT IN ('UNIQUE', 'PRIMARY KEY') THEN 0 ELSE 1 END, \
             NULL, C.INDEX_NAME, 3, C.POSITION, C.COLUMN_NAME \
             FROM SYS.INDEX_COLUMNS C JOIN SYS.INDEXES I \
             ON I.SCHEMA_NAME = C.SCHEMA_NAME AND I.TABLE_NAME = C.TABLE_NAME AND I.INDEX_NAME = C.INDEX_NAME \
             WHERE C.SCHEMA_NAME={} AND C.TABLE_NAME={} \
             ORDER BY C.INDEX_NAME, C.POSITION",
            literal(schema),
            literal(table)
        ))
    }

    fn primary_key_query(&self, schema: &str, table: &str) -> String {
        format!(
            "SELECT COLUMN_NAME FROM CONSTRAINTS WHERE SCHEMA_NAME={} AND TABLE_NAME={} AND IS_PRIMARY_KEY='TRUE'",
            literal(schema),
            literal(table)
        )
    }

    fn schemas_query(&self) -> String {
        "SELECT schema_name FROM schemas".to_string()
    }

    fn next_value_query(&self, quoted_sequence: &str) -> String {
        format!("SELECT {}.NEXTVAL FROM DUMMY", quoted_sequence)
    }

    fn fallback_native_type(&self, abstract_type: AbstractType) -> NativeType {
        match abstract_type {
            AbstractType::PrimaryKey => NativeType::Raw(HANA_PRIMARY_KEY.to_string()),
            AbstractType::String => NativeType::named("NVARCHAR", Some(255)),
            AbstractType::Text => NativeType::named("NCLOB", None),
            AbstractType::Integer => NativeType::named("INTEGER", None),
            AbstractType::Bigint => NativeType::named("BIGINT", None),
            AbstractType::Decimal => NativeType::named("DECIMAL", None),
            AbstractType::Float => NativeType::named("DOUBLE", None),
            AbstractType::Datetime | AbstractType::Timestamp => NativeType::named("TIMESTAMP", None),
            AbstractType::Time => NativeType::named("TIME", None),
            AbstractType::Date => NativeType::named("DATE", None),
            AbstractType::Binary => NativeType::named("BLOB", None),
            AbstractType::Boolean => NativeType::named("BOOLEAN", None),
        }
    }

    // SYS.COLUMNS.DEFAULT_VALUE holds the bare value, not a SQL literal.
    fn catalog_default_sql(&self, default: &str, abstract_type: AbstractType) -> String {
        match abstract_type {
            AbstractType::PrimaryKey
            | AbstractType::Integer
            | AbstractType::Bigint
            | AbstractType::Decimal
            | AbstractType::Float
            | AbstractType::Boolean => default.to_string(),
            _ if default.starts_with("CURRENT_") => default.to_string(),
            _ => literal(default),
        }
    }
}

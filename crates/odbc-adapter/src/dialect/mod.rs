//! Database dialects.
//!
//! - [`hana`]: SAP HANA
//! - [`generic`]: fallback for any other ODBC data source
//!
//! `SchemaStatements` holds a [`DialectImpl`], an enum over the concrete
//! dialects that implements [`Dialect`] by matching on the variant, so
//! calls are statically dispatched.

pub mod generic;
pub mod hana;

pub use generic::GenericDialect;
pub use hana::HanaDialect;

use crate::core::identifier::IdentifierCase;
use crate::core::traits::Dialect;
use crate::error::{AdapterError, Result};
use crate::typemap::{AbstractType, NativeType};

/// Enum-based static dispatch for dialects.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Hana(HanaDialect),
    Generic(GenericDialect),
}

impl DialectImpl {
    /// Create a dialect from its configured name.
    ///
    /// # Errors
    ///
    /// Returns a config error if the name is not recognized.
    pub fn from_db_type(db_type: &str) -> Result<Self> {
        match db_type.to_lowercase().as_str() {
            "hana" | "saphana" | "sap_hana" => Ok(DialectImpl::Hana(HanaDialect::new())),
            "generic" | "odbc" => Ok(DialectImpl::Generic(GenericDialect::new())),
            other => Err(AdapterError::Config(format!(
                "Unknown dialect: '{}'. Supported dialects: hana, generic",
                other
            ))),
        }
    }

    /// Pick a dialect from the DBMS name the driver reports.
    pub fn from_dbms_name(dbms_name: &str) -> Self {
        let upper = dbms_name.to_uppercase();
        if upper == "HDB" || upper.contains("HANA") {
            DialectImpl::Hana(HanaDialect::new())
        } else {
            DialectImpl::Generic(GenericDialect::new())
        }
    }
}

impl Dialect for DialectImpl {
    fn name(&self) -> &str {
        match self {
            DialectImpl::Hana(d) => d.name(),
            DialectImpl::Generic(d) => d.name(),
        }
    }

    fn identifier_case(&self, reported: IdentifierCase) -> IdentifierCase {
        match self {
            DialectImpl::Hana(d) => d.identifier_case(reported),
            DialectImpl::Generic(d) => d.identifier_case(reported),
        }
    }

    fn table_filtered(&self, schema: &str, table_type: &str) -> bool {
        match self {
            DialectImpl::Hana(d) => d.table_filtered(schema, table_type),
            DialectImpl::Generic(d) => d.table_filtered(schema, table_type),
        }
    }

    fn boolean_type(&self) -> &str {
        match self {
            DialectImpl::Hana(d) => d.boolean_type(),
            DialectImpl::Generic(d) => d.boolean_type(),
        }
    }

    fn primary_key_type(&self) -> &str {
        match self {
            DialectImpl::Hana(d) => d.primary_key_type(),
            DialectImpl::Generic(d) => d.primary_key_type(),
        }
    }

    fn prepared_statements(&self) -> bool {
        match self {
            DialectImpl::Hana(d) => d.prepared_statements(),
            DialectImpl::Generic(d) => d.prepared_statements(),
        }
    }

    fn prefetch_primary_key(&self) -> bool {
        match self {
            DialectImpl::Hana(d) => d.prefetch_primary_key(),
            DialectImpl::Generic(d) => d.prefetch_primary_key(),
        }
    }

    fn scopes_to_database(&self) -> bool {
        match self {
            DialectImpl::Hana(d) => d.scopes_to_database(),
            DialectImpl::Generic(d) => d.scopes_to_database(),
        }
    }

    fn columns_query(&self, schema: &str, table: &str) -> Option<String> {
        match self {
            DialectImpl::Hana(d) => d.columns_query(schema, table),
            DialectImpl::Generic(d) => d.columns_query(schema, table),
        }
    }

    fn statistics_query(&self, schema: &str, table: &str) -> Option<String> {
        match self {
            DialectImpl::Hana(d) => d.statistics_query(schema, table),
            DialectImpl::Generic(d) => d.statistics_query(schema, table),
        }
    }

    fn primary_key_query(&self, schema: &str, table: &str) -> String {
        match self {
            DialectImpl::Hana(d) => d.primary_key_query(schema, table),
            DialectImpl::Generic(d) => d.primary_key_query(schema, table),
        }
    }

    fn schemas_query(&self) -> String {
        match self {
            DialectImpl::Hana(d) => d.schemas_query(),
            DialectImpl::Generic(d) => d.schemas_query(),
        }
    }

    fn next_value_query(&self, quoted_sequence: &str) -> String {
        match self {
            DialectImpl::Hana(d) => d.next_value_query(quoted_sequence),
            DialectImpl::Generic(d) => d.next_value_query(quoted_sequence),
        }
    }

    fn fallback_native_type(&self, abstract_type: AbstractType) -> NativeType {
        match self {
            DialectImpl::Hana(d) => d.fallback_native_type(abstract_type),
            DialectImpl::Generic(d) => d.fallback_native_type(abstract_type),
        }
    }

    fn catalog_default_sql(&self, default: &str, abstract_type: AbstractType) -> String {
        match self {
            DialectImpl::Hana(d) => d.catalog_default_sql(default, abstract_type),
            DialectImpl::Generic(d) => d.catalog_default_sql(default, abstract_type),
        }
    }
}

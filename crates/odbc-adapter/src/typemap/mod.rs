//! Abstract column types and their native database equivalents.
//!
//! The native mapping is derived from the driver's type-info catalog
//! (`SQLGetTypeInfo`): each abstract type lists the ODBC SQL type codes
//! that can represent it, in order of preference, and the first code the
//! driver reports wins. Types the driver does not report fall back to the
//! dialect's defaults.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::value::{Row, RowExt};

/// ODBC SQL type codes (`sql.h` / `sqlext.h`).
pub mod sql_type {
    pub const SQL_CHAR: i32 = 1;
    pub const SQL_NUMERIC: i32 = 2;
    pub const SQL_DECIMAL: i32 = 3;
    pub const SQL_INTEGER: i32 = 4;
    pub const SQL_SMALLINT: i32 = 5;
    pub const SQL_FLOAT: i32 = 6;
    pub const SQL_REAL: i32 = 7;
    pub const SQL_DOUBLE: i32 = 8;
    pub const SQL_DATE: i32 = 9;
    pub const SQL_TIME: i32 = 10;
    pub const SQL_TIMESTAMP: i32 = 11;
    pub const SQL_VARCHAR: i32 = 12;
    pub const SQL_BOOLEAN: i32 = 16;
    pub const SQL_TYPE_DATE: i32 = 91;
    pub const SQL_TYPE_TIME: i32 = 92;
    pub const SQL_TYPE_TIMESTAMP: i32 = 93;
    pub const SQL_LONGVARCHAR: i32 = -1;
    pub const SQL_BINARY: i32 = -2;
    pub const SQL_VARBINARY: i32 = -3;
    pub const SQL_LONGVARBINARY: i32 = -4;
    pub const SQL_BIGINT: i32 = -5;
    pub const SQL_TINYINT: i32 = -6;
    pub const SQL_BIT: i32 = -7;
    pub const SQL_WCHAR: i32 = -8;
    pub const SQL_WVARCHAR: i32 = -9;
    pub const SQL_WLONGVARCHAR: i32 = -10;
}

use sql_type::*;

/// Dialect-independent column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstractType {
    PrimaryKey,
    String,
    Text,
    Integer,
    Bigint,
    Decimal,
    Float,
    Datetime,
    Timestamp,
    Time,
    Date,
    Binary,
    Boolean,
}

impl AbstractType {
    /// All abstract types, in mapping order.
    pub const ALL: [AbstractType; 13] = [
        AbstractType::PrimaryKey,
        AbstractType::String,
        AbstractType::Text,
        AbstractType::Integer,
        AbstractType::Bigint,
        AbstractType::Decimal,
        AbstractType::Float,
        AbstractType::Datetime,
        AbstractType::Timestamp,
        AbstractType::Time,
        AbstractType::Date,
        AbstractType::Binary,
        AbstractType::Boolean,
    ];

    /// Parse the snake_case name of an abstract type.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AbstractType::PrimaryKey => "primary_key",
            AbstractType::String => "string",
            AbstractType::Text => "text",
            AbstractType::Integer => "integer",
            AbstractType::Bigint => "bigint",
            AbstractType::Decimal => "decimal",
            AbstractType::Float => "float",
            AbstractType::Datetime => "datetime",
            AbstractType::Timestamp => "timestamp",
            AbstractType::Time => "time",
            AbstractType::Date => "date",
            AbstractType::Binary => "binary",
            AbstractType::Boolean => "boolean",
        }
    }

    /// ODBC type codes able to hold this type, most preferred first.
    pub fn candidate_codes(self) -> &'static [i32] {
        match self {
            AbstractType::PrimaryKey => &[SQL_INTEGER, SQL_SMALLINT],
            AbstractType::String => &[SQL_WVARCHAR, SQL_VARCHAR],
            AbstractType::Text => &[SQL_WLONGVARCHAR, SQL_LONGVARCHAR, SQL_WVARCHAR, SQL_VARCHAR],
            AbstractType::Integer => &[SQL_INTEGER, SQL_SMALLINT],
            AbstractType::Bigint => &[SQL_BIGINT, SQL_INTEGER],
            AbstractType::Decimal => &[SQL_DECIMAL, SQL_NUMERIC],
            AbstractType::Float => &[SQL_DOUBLE, SQL_FLOAT, SQL_REAL],
            AbstractType::Datetime | AbstractType::Timestamp => &[SQL_TYPE_TIMESTAMP, SQL_TIMESTAMP],
            AbstractType::Time => &[SQL_TYPE_TIME, SQL_TIME, SQL_TYPE_TIMESTAMP, SQL_TIMESTAMP],
            AbstractType::Date => &[SQL_TYPE_DATE, SQL_DATE, SQL_TYPE_TIMESTAMP, SQL_TIMESTAMP],
            AbstractType::Binary => &[SQL_LONGVARBINARY, SQL_VARBINARY],
            AbstractType::Boolean => &[SQL_BOOLEAN, SQL_BIT, SQL_TINYINT, SQL_SMALLINT, SQL_INTEGER],
        }
    }

    /// Abstract type for an ODBC SQL type code reported by a catalog.
    pub fn from_sql_code(code: i32) -> Option<Self> {
        let t = match code {
            SQL_CHAR | SQL_VARCHAR | SQL_WCHAR | SQL_WVARCHAR => AbstractType::String,
            SQL_LONGVARCHAR | SQL_WLONGVARCHAR => AbstractType::Text,
            SQL_INTEGER | SQL_SMALLINT | SQL_TINYINT => AbstractType::Integer,
            SQL_BIGINT => AbstractType::Bigint,
            SQL_DECIMAL | SQL_NUMERIC => AbstractType::Decimal,
            SQL_FLOAT | SQL_REAL | SQL_DOUBLE => AbstractType::Float,
            SQL_TYPE_TIMESTAMP | SQL_TIMESTAMP => AbstractType::Datetime,
            SQL_TYPE_TIME | SQL_TIME => AbstractType::Time,
            SQL_TYPE_DATE | SQL_DATE => AbstractType::Date,
            SQL_BINARY | SQL_VARBINARY | SQL_LONGVARBINARY => AbstractType::Binary,
            SQL_BIT | SQL_BOOLEAN => AbstractType::Boolean,
            _ => return None,
        };
        Some(t)
    }
}

impl fmt::Display for AbstractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a catalog type name (e.g. "NVARCHAR", "DECIMAL") to an ODBC code.
///
/// Catalog tables such as HANA's `SYS.COLUMNS` report names rather than
/// codes; this lets both shapes flow through the same column reshaping.
pub fn sql_code_for_name(name: &str) -> Option<i32> {
    let code = match name.trim().to_ascii_uppercase().as_str() {
        "CHAR" => SQL_CHAR,
        "VARCHAR" | "VARCHAR2" | "ALPHANUM" | "SHORTTEXT" => SQL_VARCHAR,
        "NCHAR" => SQL_WCHAR,
        "NVARCHAR" => SQL_WVARCHAR,
        "CLOB" | "TEXT" | "LONG VARCHAR" => SQL_LONGVARCHAR,
        "NCLOB" => SQL_WLONGVARCHAR,
        "TINYINT" => SQL_TINYINT,
        "SMALLINT" => SQL_SMALLINT,
        "INTEGER" | "INT" => SQL_INTEGER,
        "BIGINT" => SQL_BIGINT,
        "DECIMAL" | "SMALLDECIMAL" => SQL_DECIMAL,
        "NUMERIC" => SQL_NUMERIC,
        "REAL" => SQL_REAL,
        "FLOAT" => SQL_FLOAT,
        "DOUBLE" | "DOUBLE PRECISION" => SQL_DOUBLE,
        "DATE" | "DAYDATE" => SQL_TYPE_DATE,
        "TIME" | "SECONDTIME" => SQL_TYPE_TIME,
        "TIMESTAMP" | "SECONDDATE" | "LONGDATE" | "DATETIME" => SQL_TYPE_TIMESTAMP,
        "BINARY" => SQL_BINARY,
        "VARBINARY" => SQL_VARBINARY,
        "BLOB" | "LONG VARBINARY" => SQL_LONGVARBINARY,
        "BOOLEAN" => SQL_BOOLEAN,
        "BIT" => SQL_BIT,
        _ => return None,
    };
    Some(code)
}

/// Whether an ODBC code denotes an exact numeric type with precision/scale.
pub fn is_exact_numeric(code: i32) -> bool {
    code == SQL_DECIMAL || code == SQL_NUMERIC
}

/// Native rendering for an abstract type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NativeType {
    /// Complete column type text, emitted verbatim (primary key columns).
    Raw(String),
    /// Type name with an optional default length.
    Named { name: String, limit: Option<i64> },
}

impl NativeType {
    pub fn named(name: impl Into<String>, limit: Option<i64>) -> Self {
        NativeType::Named {
            name: name.into(),
            limit,
        }
    }
}

/// Map from abstract types to native types for one connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NativeTypes {
    types: BTreeMap<AbstractType, NativeType>,
}

/// `SQLGetTypeInfo` column positions.
const TYPE_INFO_TYPE_NAME: usize = 0;
const TYPE_INFO_DATA_TYPE: usize = 1;

impl NativeTypes {
    /// Build the mapping from type-info rows.
    ///
    /// `fallback` supplies a native type for abstract types the driver does
    /// not report. `primary_key` and `boolean` come from the dialect and
    /// always take precedence.
    pub fn from_type_info(
        rows: &[Row],
        primary_key: &str,
        boolean: &str,
        fallback: impl Fn(AbstractType) -> NativeType,
    ) -> Self {
        let mut by_code: BTreeMap<i32, String> = BTreeMap::new();
        for row in rows {
            let (Some(name), Some(code)) = (row.text(TYPE_INFO_TYPE_NAME), row.int(TYPE_INFO_DATA_TYPE))
            else {
                continue;
            };
            let Ok(code) = i32::try_from(code) else {
                continue;
            };
            // Drivers list the preferred type first for each code.
            by_code.entry(code).or_insert(name);
        }

        let mut types = BTreeMap::new();
        for abstract_type in AbstractType::ALL {
            let native = match abstract_type {
                AbstractType::PrimaryKey => NativeType::Raw(primary_key.to_string()),
                AbstractType::Boolean => NativeType::named(boolean, None),
                other => other
                    .candidate_codes()
                    .iter()
                    .find_map(|code| by_code.get(code))
                    .map(|name| NativeType::named(name.clone(), default_limit(other)))
                    .unwrap_or_else(|| fallback(other)),
            };
            types.insert(abstract_type, native);
        }

        Self { types }
    }

    /// Native type for an abstract type.
    pub fn get(&self, abstract_type: AbstractType) -> Option<&NativeType> {
        self.types.get(&abstract_type)
    }

    /// Iterate over all mappings.
    pub fn iter(&self) -> impl Iterator<Item = (&AbstractType, &NativeType)> {
        self.types.iter()
    }
}

/// Default length applied when a column does not specify one.
pub fn default_limit(abstract_type: AbstractType) -> Option<i64> {
    match abstract_type {
        AbstractType::String => Some(255),
        _ => None,
    }
}

/// Render a column type.
///
/// Decimals take `(precision,scale)` or `(precision)`; other named types
/// take `(limit)`, falling back to the native default length. Raw native
/// types are emitted unchanged.
pub fn type_to_sql(
    native: &NativeType,
    is_decimal: bool,
    limit: Option<i64>,
    precision: Option<i64>,
    scale: Option<i64>,
) -> String {
    match native {
        NativeType::Raw(sql) => sql.clone(),
        NativeType::Named {
            name,
            limit: default_limit,
        } => {
            if is_decimal {
                match (precision, scale) {
                    (Some(p), Some(s)) => format!("{}({},{})", name, p, s),
                    (Some(p), None) => format!("{}({})", name, p),
                    _ => name.clone(),
                }
            } else {
                match limit.or(*default_limit) {
                    Some(l) => format!("{}({})", name, l),
                    None => name.clone(),
                }
            }
        }
    }
}

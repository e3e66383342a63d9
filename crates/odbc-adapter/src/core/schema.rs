//! Schema descriptors returned by introspection and consumed by DDL.
//!
//! Every descriptor is a read-only snapshot of catalog state at the time of
//! the call. Nothing here is cached by the adapter.

use serde::{Deserialize, Serialize};

use super::value::SqlValue;
use crate::typemap::AbstractType;

/// Type information for a column, as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlTypeMetadata {
    /// Declared SQL type (e.g. "NVARCHAR", "DECIMAL", or "boolean").
    pub sql_type: String,

    /// ODBC SQL type code, when one could be determined.
    pub type_code: Option<i32>,

    /// Dialect-independent type.
    pub abstract_type: AbstractType,

    /// Column size.
    pub limit: Option<i64>,

    /// Numeric precision (decimal/numeric only).
    pub precision: Option<i64>,

    /// Numeric scale (decimal/numeric only).
    pub scale: Option<i64>,
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name, case-formatted for the application.
    pub name: String,

    /// Default expression as stored in the catalog.
    pub default: Option<String>,

    /// Type information.
    pub sql_type_metadata: SqlTypeMetadata,

    /// Whether the column allows NULL.
    pub null: bool,

    /// Owning table.
    pub table_name: String,

    /// Native type name reported by the driver.
    pub native_type: Option<String>,
}

impl ColumnDefinition {
    /// Declared SQL type.
    pub fn sql_type(&self) -> &str {
        &self.sql_type_metadata.sql_type
    }
}

/// Index metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Table the index belongs to.
    pub table: String,

    /// Index name.
    pub name: String,

    /// Whether the index is unique.
    pub unique: bool,

    /// Indexed column names, in key order.
    pub columns: Vec<String>,
}

/// Referential action for ON UPDATE / ON DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    NoAction,
    SetDefault,
}

impl ReferentialAction {
    /// Decode an ODBC `UPDATE_RULE`/`DELETE_RULE` code.
    pub fn from_odbc_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ReferentialAction::Cascade),
            1 => Some(ReferentialAction::Restrict),
            2 => Some(ReferentialAction::SetNull),
            3 => Some(ReferentialAction::NoAction),
            4 => Some(ReferentialAction::SetDefault),
            _ => None,
        }
    }

    /// SQL spelling of the action.
    pub fn as_sql(self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

/// Foreign key metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDefinition {
    /// Referenced (primary key side) table.
    pub parent_table: String,

    /// Referencing (foreign key side) table.
    pub child_table: String,

    /// Referenced column.
    pub parent_column: String,

    /// Referencing column.
    pub child_column: String,

    /// Constraint name.
    pub name: Option<String>,

    /// ON UPDATE action.
    pub on_update: Option<ReferentialAction>,

    /// ON DELETE action.
    pub on_delete: Option<ReferentialAction>,
}

/// A column type in a DDL request: either abstract or a literal native type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnType {
    Abstract(AbstractType),
    Raw(String),
}

impl From<AbstractType> for ColumnType {
    fn from(t: AbstractType) -> Self {
        ColumnType::Abstract(t)
    }
}

impl From<&str> for ColumnType {
    fn from(s: &str) -> Self {
        match AbstractType::parse(s) {
            Some(t) => ColumnType::Abstract(t),
            None => ColumnType::Raw(s.to_string()),
        }
    }
}

/// Per-column options for DDL.
///
/// `default` distinguishes "not given" (`None`) from "given as NULL"
/// (`Some(SqlValue::Null)`). `default_sql` is a default expression emitted
/// verbatim; a `default` value takes precedence over it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null: Option<bool>,
    #[serde(default, deserialize_with = "explicit_value")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<SqlValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sql: Option<String>,
}

/// Keep an explicit YAML/JSON `null` as `Some(SqlValue::Null)`.
fn explicit_value<'de, D>(deserializer: D) -> std::result::Result<Option<SqlValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    SqlValue::deserialize(deserializer).map(Some)
}

impl ColumnOptions {
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn precision(mut self, precision: i64, scale: i64) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn null(mut self, null: bool) -> Self {
        self.null = Some(null);
        self
    }

    pub fn default_value(mut self, value: impl Into<SqlValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Default given as SQL text, e.g. `CURRENT_TIMESTAMP`.
    pub fn default_sql(mut self, expression: impl Into<String>) -> Self {
        self.default_sql = Some(expression.into());
        self
    }
}

/// A column requested in `create_table` or `add_column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(flatten)]
    pub options: ColumnOptions,
}

/// Column list for a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    /// Trailing text appended after the column list.
    pub options: Option<String>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>, options: Option<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            options,
        }
    }

    /// Add the auto-created primary key column.
    pub fn primary_key(&mut self, name: impl Into<String>) -> &mut Self {
        self.column(name, AbstractType::PrimaryKey, ColumnOptions::default())
    }

    /// Add a column.
    pub fn column(
        &mut self,
        name: impl Into<String>,
        column_type: impl Into<ColumnType>,
        options: ColumnOptions,
    ) -> &mut Self {
        self.columns.push(ColumnSpec {
            name: name.into(),
            column_type: column_type.into(),
            options,
        });
        self
    }

    pub fn string(&mut self, name: impl Into<String>, options: ColumnOptions) -> &mut Self {
        self.column(name, AbstractType::String, options)
    }

    pub fn integer(&mut self, name: impl Into<String>, options: ColumnOptions) -> &mut Self {
        self.column(name, AbstractType::Integer, options)
    }

    /// Add `created_at` and `updated_at` datetime columns.
    pub fn timestamps(&mut self) -> &mut Self {
        self.column("created_at", AbstractType::Datetime, ColumnOptions::default().null(false));
        self.column("updated_at", AbstractType::Datetime, ColumnOptions::default().null(false))
    }

    /// Check whether a column with this name was already added.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

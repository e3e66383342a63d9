//! DDL for tables, columns, schemas and databases.

use serde::{Deserialize, Serialize};

use crate::core::schema::{ColumnOptions, ColumnSpec, ColumnType, TableDefinition};
use crate::core::traits::{Connection, Dialect};
use crate::core::value::SqlValue;
use crate::error::Result;

use super::sequences::default_sequence_name;
use super::SchemaStatements;

/// Table storage keyword placed between `CREATE` and `TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    Row,
    #[default]
    Column,
    History,
    GlobalTemporary,
    LocalTemporary,
}

impl StorageMode {
    pub fn keyword(self) -> &'static str {
        match self {
            StorageMode::Row => "ROW",
            StorageMode::Column => "COLUMN",
            StorageMode::History => "HISTORY COLUMN",
            StorageMode::GlobalTemporary => "GLOBAL TEMPORARY",
            StorageMode::LocalTemporary => "LOCAL TEMPORARY",
        }
    }
}

/// Options for [`SchemaStatements::create_table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTableOptions {
    /// Add a primary key column.
    pub id: bool,

    /// Primary key column name (default: "id").
    pub primary_key: Option<String>,

    /// Drop an existing table of the same name first.
    pub force: bool,

    /// Storage keyword.
    pub storage: StorageMode,

    /// Text appended after the column list.
    pub options: Option<String>,
}

impl Default for CreateTableOptions {
    fn default() -> Self {
        Self {
            id: true,
            primary_key: None,
            force: false,
            storage: StorageMode::default(),
            options: None,
        }
    }
}

impl<C: Connection> SchemaStatements<C> {
    /// Render one column definition: `"name" TYPE [DEFAULT x] [NOT NULL]`.
    fn column_sql(&self, name: &str, column_type: &ColumnType, options: &ColumnOptions) -> Result<String> {
        let mut sql = format!(
            "{} {}",
            self.quoting.quote_column_name(name),
            self.type_to_sql(column_type, options.limit, options.precision, options.scale)?
        );
        if let Some(default) = &options.default {
            sql.push_str(&format!(" DEFAULT {}", self.quoting.quote(default)));
        } else if let Some(expression) = &options.default_sql {
            sql.push_str(&format!(" DEFAULT {}", expression));
        }
        match options.null {
            Some(false) => sql.push_str(" NOT NULL"),
            Some(true) => sql.push_str(" NULL"),
            None => {}
        }
        Ok(sql)
    }

    fn create_table_sql(&self, td: &TableDefinition, storage: StorageMode) -> Result<String> {
        let columns = td
            .columns
            .iter()
            .map(|c: &ColumnSpec| self.column_sql(&c.name, &c.column_type, &c.options))
            .collect::<Result<Vec<_>>>()?;

        let mut sql = format!(
            "CREATE {} TABLE {} ({})",
            storage.keyword(),
            self.quoting.quote_table_name(&td.name),
            columns.join(", ")
        );
        if let Some(options) = td.options.as_deref().filter(|o| !o.trim().is_empty()) {
            sql.push(' ');
            sql.push_str(options);
        }
        Ok(sql)
    }

    /// Create a table and its backing sequence.
    ///
    /// `build` adds the columns after the primary key.
    pub fn create_table<F>(&self, name: &str, options: &CreateTableOptions, build: F) -> Result<()>
    where
        F: FnOnce(&mut TableDefinition),
    {
        let mut td = TableDefinition::new(name, options.options.clone());
        if options.id {
            td.primary_key(options.primary_key.as_deref().unwrap_or("id"));
        }
        build(&mut td);

        if options.force && self.table_exists(name)? {
            self.drop_table(name)?;
        }

        self.create_sequence(&default_sequence_name(name))?;
        let sql = self.create_table_sql(&td, options.storage)?;
        self.execute(&sql)
    }

    /// Drop a table, then its sequence.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        self.execute(&format!("DROP TABLE {}", self.quoting.quote_table_name(name)))?;
        self.drop_table_sequence(name)
    }

    /// Rename a table, then move its sequence.
    pub fn rename_table(&self, name: &str, new_name: &str) -> Result<()> {
        self.execute(&format!(
            "RENAME TABLE {} TO {}",
            self.quoting.quote_table_name(name),
            self.quoting.quote_table_name(new_name)
        ))?;
        self.rename_sequence(name, new_name)
    }

    pub fn add_column(
        &self,
        table: &str,
        column: &str,
        column_type: impl Into<ColumnType>,
        options: &ColumnOptions,
    ) -> Result<()> {
        let definition = self.column_sql(column, &column_type.into(), options)?;
        self.execute(&format!(
            "ALTER TABLE {} ADD ({})",
            self.quoting.quote_table_name(table),
            definition
        ))
    }

    /// Redefine a column.
    ///
    /// Without an explicit default the column keeps its current one.
    pub fn change_column(
        &self,
        table: &str,
        column: &str,
        column_type: impl Into<ColumnType>,
        options: &ColumnOptions,
    ) -> Result<()> {
        let mut options = options.clone();
        if options.default.is_none() && options.default_sql.is_none() {
            let existing = self.column_for(table, column)?;
            let abstract_type = existing.sql_type_metadata.abstract_type;
            options.default_sql = existing
                .default
                .map(|d| self.dialect.catalog_default_sql(&d, abstract_type));
        }

        let definition = self.column_sql(column, &column_type.into(), &options)?;
        self.execute(&format!(
            "ALTER TABLE {} ALTER ({})",
            self.quoting.quote_table_name(table),
            definition
        ))
    }

    /// Set a column's default, keeping its declared type.
    pub fn change_column_default(&self, table: &str, column: &str, default: SqlValue) -> Result<()> {
        let existing = self.column_for(table, column)?;
        let options = ColumnOptions {
            default: Some(default),
            ..Default::default()
        };
        self.change_column(
            table,
            column,
            ColumnType::Raw(self.column_type_sql(&existing)),
            &options,
        )
    }

    /// Change a column's nullability.
    ///
    /// When forbidding NULL with a replacement value, existing NULLs are
    /// back-filled before the column is altered.
    pub fn change_column_null(
        &self,
        table: &str,
        column: &str,
        null: bool,
        default: Option<SqlValue>,
    ) -> Result<()> {
        let existing = self.column_for(table, column)?;

        if let Some(value) = default.filter(|v| !null && !v.is_null()) {
            let quoted = self.quoting.quote_column_name(column);
            self.execute(&format!(
                "UPDATE {} SET {}={} WHERE {} IS NULL",
                self.quoting.quote_table_name(table),
                quoted,
                self.quoting.quote(&value),
                quoted
            ))?;
        }

        self.change_column(
            table,
            column,
            ColumnType::Raw(self.column_type_sql(&existing)),
            &ColumnOptions::default().null(null),
        )
    }

    pub fn rename_column(&self, table: &str, column: &str, new_name: &str) -> Result<()> {
        self.execute(&format!(
            "RENAME COLUMN {}.{} TO {}",
            self.quoting.quote_table_name(table),
            self.quoting.quote_column_name(column),
            self.quoting.quote_column_name(new_name)
        ))
    }

    pub fn remove_column(&self, table: &str, column: &str) -> Result<()> {
        self.execute(&format!(
            "ALTER TABLE {} DROP ({})",
            self.quoting.quote_table_name(table),
            self.quoting.quote_column_name(column)
        ))
    }

    /// Remove columns one statement at a time. Stops at the first failure.
    pub fn remove_columns<S: AsRef<str>>(&self, table: &str, columns: &[S]) -> Result<()> {
        for column in columns {
            self.remove_column(table, column.as_ref())?;
        }
        Ok(())
    }

    pub fn create_schema(&self, name: &str) -> Result<()> {
        self.execute(&format!("CREATE SCHEMA {}", self.quoting.quote_table_name(name)))
    }

    pub fn drop_schema(&self, name: &str) -> Result<()> {
        self.execute(&format!("DROP SCHEMA {}", self.quoting.quote_table_name(name)))
    }

    /// Switch the session schema. Later catalog queries are scoped to it.
    pub fn set_schema(&mut self, name: &str) -> Result<()> {
        self.set_schema_statement(name)?;
        self.schema = name.to_string();
        Ok(())
    }

    /// Databases map to schemas.
    pub fn create_database(&self, name: &str) -> Result<()> {
        self.create_schema(name)
    }

    pub fn drop_database(&self, name: &str) -> Result<()> {
        self.drop_schema(name)
    }
}

//! Catalog reads: tables, columns, indexes, keys, schemas and types.

use tracing::debug;

use crate::core::schema::{
    ColumnDefinition, ColumnType, ForeignKeyDefinition, IndexDefinition, ReferentialAction,
    SqlTypeMetadata,
};
use crate::core::statement::StatementGuard;
use crate::core::traits::{Connection, Dialect};
use crate::core::value::{Row, RowExt, SqlValue};
use crate::error::{AdapterError, Result};
use crate::typemap::{self, AbstractType, NativeType, NativeTypes};

use super::indexes::group_index_rows;
use super::SchemaStatements;

/// `SQLTables` positions.
mod tables_col {
    pub const SCHEM: usize = 1;
    pub const NAME: usize = 2;
    pub const TYPE: usize = 3;
}

/// `SQLColumns` positions.
mod columns_col {
    pub const COLUMN_NAME: usize = 3;
    pub const DATA_TYPE: usize = 4;
    pub const TYPE_NAME: usize = 5;
    pub const COLUMN_SIZE: usize = 6;
    pub const DECIMAL_DIGITS: usize = 8;
    pub const NULLABLE: usize = 10;
    pub const COLUMN_DEF: usize = 12;
    pub const IS_NULLABLE: usize = 17;
}

/// `SQLForeignKeys` positions.
mod fk_col {
    pub const PKTABLE_NAME: usize = 2;
    pub const PKCOLUMN_NAME: usize = 3;
    pub const FKTABLE_NAME: usize = 6;
    pub const FKCOLUMN_NAME: usize = 7;
    pub const UPDATE_RULE: usize = 9;
    pub const DELETE_RULE: usize = 10;
    pub const FK_NAME: usize = 11;
}

/// Reshape a `SQLColumns` row into the seven-field column structure
/// returned by dialect column queries.
fn remap_sqlcolumns_row(row: &[SqlValue]) -> Row {
    let nullable = match row.cell(columns_col::IS_NULLABLE) {
        SqlValue::Null => row.cell(columns_col::NULLABLE).clone(),
        flag => flag.clone(),
    };
    vec![
        row.cell(columns_col::COLUMN_NAME).clone(),
        row.cell(columns_col::COLUMN_DEF).clone(),
        row.cell(columns_col::DATA_TYPE).clone(),
        nullable,
        row.cell(columns_col::TYPE_NAME).clone(),
        row.cell(columns_col::COLUMN_SIZE).clone(),
        row.cell(columns_col::DECIMAL_DIGITS).clone(),
    ]
}

impl<C: Connection> SchemaStatements<C> {
    /// Names of the tables visible on this connection.
    pub fn tables(&self) -> Result<Vec<String>> {
        let mut stmt = StatementGuard::new(self.conn.tables()?, "SQLTables");
        let rows = stmt.rows()?;

        Ok(rows
            .iter()
            .filter_map(|row| {
                let schema = row.text(tables_col::SCHEM).unwrap_or_default();
                let table_type = row.text(tables_col::TYPE).unwrap_or_default();
                if self.dialect.table_filtered(&schema, &table_type) {
                    return None;
                }
                row.text(tables_col::NAME).map(|name| self.format_case(&name))
            })
            .collect())
    }

    /// View names. Views are not introspected.
    pub fn views(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let wanted = self.format_case(table);
        Ok(self.tables()?.iter().any(|t| *t == wanted))
    }

    /// Database name reported by the driver.
    pub fn current_database(&self) -> String {
        self.conn.database_metadata().database_name.trim().to_string()
    }

    fn column_rows(&self, table: &str) -> Result<Vec<Row>> {
        let native = self.native_case(table);
        match self.dialect.columns_query(&self.schema, &native) {
            Some(sql) => Ok(self.exec_query(&sql)?.rows),
            None => {
                let mut stmt = StatementGuard::new(self.conn.columns(&native)?, "SQLColumns");
                Ok(stmt.rows()?.iter().map(|row| remap_sqlcolumns_row(row)).collect())
            }
        }
    }

    fn column_from_row(&self, table: &str, row: &[SqlValue]) -> ColumnDefinition {
        let type_cell = row.cell(2);
        let native_type = row.text(4);

        // The type cell is an ODBC code from SQLColumns, a type name from
        // catalog tables.
        let (type_code, mut sql_type) = match type_cell.as_i64() {
            Some(code) => (
                i32::try_from(code).ok(),
                native_type.clone().unwrap_or_else(|| code.to_string()),
            ),
            None => {
                let name = type_cell.to_text().unwrap_or_default();
                (typemap::sql_code_for_name(&name), name)
            }
        };

        let mut abstract_type = type_code
            .and_then(AbstractType::from_sql_code)
            .unwrap_or(AbstractType::String);
        if native_type.as_deref() == Some(self.dialect.boolean_type()) {
            sql_type = "boolean".to_string();
            abstract_type = AbstractType::Boolean;
        }

        let limit = row.int(5);
        let (precision, scale) = match type_code {
            Some(code) if typemap::is_exact_numeric(code) => (limit, Some(row.int(6).unwrap_or(0))),
            _ => (None, None),
        };

        ColumnDefinition {
            name: self.format_case(&row.text(0).unwrap_or_default()),
            default: row.text(1),
            sql_type_metadata: SqlTypeMetadata {
                sql_type,
                type_code,
                abstract_type,
                limit,
                precision,
                scale,
            },
            null: row.cell(3).as_flag().unwrap_or(true),
            table_name: table.to_string(),
            native_type,
        }
    }

    /// Columns of a table. A blank table name has no columns.
    pub fn columns(&self, table: &str) -> Result<Vec<ColumnDefinition>> {
        if table.trim().is_empty() {
            return Ok(Vec::new());
        }
        let rows = self.column_rows(table)?;
        Ok(rows.iter().map(|row| self.column_from_row(table, row)).collect())
    }

    /// One column of a table.
    pub fn column_for(&self, table: &str, column: &str) -> Result<ColumnDefinition> {
        let wanted = self.format_case(column);
        self.columns(table)?
            .into_iter()
            .find(|c| c.name == wanted)
            .ok_or_else(|| AdapterError::no_such_column(table, column))
    }

    /// Indexes of a table, grouped from index statistics rows.
    pub fn indexes(&self, table: &str) -> Result<Vec<IndexDefinition>> {
        let native = self.native_case(table);
        let rows = match self.dialect.statistics_query(&self.schema, &native) {
            Some(sql) => self.exec_query(&sql)?.rows,
            None => StatementGuard::new(self.conn.indexes(&native)?, "SQLStatistics").rows()?,
        };
        Ok(group_index_rows(table, &rows, self.case))
    }

    /// Foreign keys declared on a table.
    pub fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyDefinition>> {
        let mut stmt = StatementGuard::new(
            self.conn.foreign_keys(&self.native_case(table))?,
            "SQLForeignKeys",
        );
        let rows = stmt.rows()?;

        Ok(rows
            .iter()
            .map(|row| ForeignKeyDefinition {
                parent_table: row.text(fk_col::PKTABLE_NAME).unwrap_or_default(),
                child_table: row.text(fk_col::FKTABLE_NAME).unwrap_or_default(),
                parent_column: row.text(fk_col::PKCOLUMN_NAME).unwrap_or_default(),
                child_column: row.text(fk_col::FKCOLUMN_NAME).unwrap_or_default(),
                name: row.text(fk_col::FK_NAME),
                on_update: row
                    .int(fk_col::UPDATE_RULE)
                    .and_then(ReferentialAction::from_odbc_code),
                on_delete: row
                    .int(fk_col::DELETE_RULE)
                    .and_then(ReferentialAction::from_odbc_code),
            })
            .collect())
    }

    /// Primary key column of a table, `"id"` when none is declared.
    pub fn primary_key(&self, table: &str) -> Result<String> {
        let sql = self.dialect.primary_key_query(&self.schema, &self.native_case(table));
        let values = self.select_values(&sql)?;
        Ok(values.into_iter().next().unwrap_or_else(|| "id".to_string()))
    }

    /// Schema names.
    pub fn schemas(&self) -> Result<Vec<String>> {
        self.select_values(&self.dialect.schemas_query())
    }

    pub(super) fn load_native_types(&self) -> Result<NativeTypes> {
        let mut stmt = StatementGuard::new(self.conn.type_info()?, "SQLGetTypeInfo");
        let rows = stmt.rows()?;
        debug!("Type catalog returned {} rows", rows.len());

        Ok(NativeTypes::from_type_info(
            &rows,
            self.dialect.primary_key_type(),
            self.dialect.boolean_type(),
            |t| self.dialect.fallback_native_type(t),
        ))
    }

    /// Native SQL for a column type.
    pub fn type_to_sql(
        &self,
        column_type: &ColumnType,
        limit: Option<i64>,
        precision: Option<i64>,
        scale: Option<i64>,
    ) -> Result<String> {
        let abstract_type = match column_type {
            ColumnType::Raw(sql) => return Ok(sql.clone()),
            ColumnType::Abstract(t) => *t,
        };
        let types = self.native_database_types()?;
        let native = match types.get(abstract_type) {
            Some(native) => native.clone(),
            None => self.dialect.fallback_native_type(abstract_type),
        };
        Ok(typemap::type_to_sql(
            &native,
            abstract_type == AbstractType::Decimal,
            limit,
            precision,
            scale,
        ))
    }

    /// Declared type of an existing column, with its size and scale.
    pub fn column_type_sql(&self, column: &ColumnDefinition) -> String {
        let meta = &column.sql_type_metadata;
        if meta.abstract_type == AbstractType::Boolean {
            return self.dialect.boolean_type().to_string();
        }
        let native = NativeType::named(meta.sql_type.clone(), None);
        let sized = matches!(
            meta.abstract_type,
            AbstractType::String | AbstractType::Binary
        );
        typemap::type_to_sql(
            &native,
            meta.abstract_type == AbstractType::Decimal,
            if sized { meta.limit } else { None },
            meta.precision,
            meta.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identifier::IdentifierCase;
    use crate::core::traits::DatabaseMetadata;
    use crate::dialect::DialectImpl;
    use crate::drivers::ScriptedConnection;
    use crate::schema_statements::AdapterSettings;

    fn generic(conn: ScriptedConnection) -> SchemaStatements<ScriptedConnection> {
        SchemaStatements::new(
            conn,
            DialectImpl::from_db_type("generic").unwrap(),
            AdapterSettings::default(),
        )
        .unwrap()
    }

    fn sqlcolumns_row(name: &str, code: i64, type_name: &str, size: i64, scale: Option<i64>) -> Row {
        let mut row = vec![SqlValue::Null; 18];
        row[3] = SqlValue::from(name);
        row[4] = SqlValue::Int(code);
        row[5] = SqlValue::from(type_name);
        row[6] = SqlValue::Int(size);
        row[8] = SqlValue::from(scale);
        row[10] = SqlValue::Int(1);
        row[17] = SqlValue::from("NO");
        row
    }

    #[test]
    fn test_columns_from_driver_catalog() {
        let meta = DatabaseMetadata {
            identifier_case: IdentifierCase::Mixed,
            ..Default::default()
        };
        let conn = ScriptedConnection::new(meta).with_columns(
            "orders",
            vec![
                sqlcolumns_row("total", 3, "DECIMAL", 10, None),
                sqlcolumns_row("paid", 16, "BOOLEAN", 1, None),
            ],
        );
        let adapter = generic(conn);
        let cols = adapter.columns("orders").unwrap();

        assert_eq!(cols.len(), 2);
        let total = &cols[0].sql_type_metadata;
        assert_eq!(total.precision, Some(10));
        assert_eq!(total.scale, Some(0));
        assert_eq!(total.abstract_type, AbstractType::Decimal);
        // IS_NULLABLE wins over NULLABLE
        assert!(!cols[0].null);

        assert_eq!(cols[1].sql_type(), "boolean");
        assert_eq!(adapter.connection().open_cursors(), 0);
    }

    #[test]
    fn test_blank_table_has_no_columns() {
        let adapter = generic(ScriptedConnection::default());
        assert!(adapter.columns("  ").unwrap().is_empty());
        assert!(adapter.connection().statements().is_empty());
    }

    #[test]
    fn test_column_for_missing_column() {
        let conn = ScriptedConnection::default()
            .with_columns("t", vec![sqlcolumns_row("a", 4, "INTEGER", 10, None)]);
        let adapter = generic(conn);

        assert_eq!(adapter.column_for("t", "a").unwrap().name, "a");
        let err = adapter.column_for("t", "b").unwrap_err();
        assert!(matches!(err, AdapterError::NoSuchColumn { .. }));
    }

    #[test]
    fn test_missing_result_sets_read_as_empty() {
        let adapter = generic(ScriptedConnection::default());
        assert!(adapter.tables().unwrap().is_empty());
        assert!(adapter.foreign_keys("t").unwrap().is_empty());
        assert!(adapter.indexes("t").unwrap().is_empty());
        assert!(adapter.views().unwrap().is_empty());
        assert_eq!(adapter.primary_key("t").unwrap(), "id");
    }

    #[test]
    fn test_type_to_sql_uses_type_catalog() {
        let conn = ScriptedConnection::default().with_type_info(vec![
            vec![SqlValue::from("VARCHAR"), SqlValue::Int(12)],
            vec![SqlValue::from("NUMERIC"), SqlValue::Int(2)],
        ]);
        let adapter = generic(conn);

        let string = ColumnType::Abstract(AbstractType::String);
        assert_eq!(adapter.type_to_sql(&string, None, None, None).unwrap(), "VARCHAR(255)");
        let decimal = ColumnType::Abstract(AbstractType::Decimal);
        assert_eq!(
            adapter.type_to_sql(&decimal, None, Some(8), Some(3)).unwrap(),
            "NUMERIC(8,3)"
        );
        let raw = ColumnType::Raw("ST_POINT".into());
        assert_eq!(adapter.type_to_sql(&raw, Some(4), None, None).unwrap(), "ST_POINT");

        // computed once
        adapter.native_database_types().unwrap();
        assert_eq!(adapter.connection().released_cursors(), 1);
    }
}

//! Schema operations read from a YAML file and applied in order.

use std::path::Path;

use odbc_adapter::{
    AdapterError, ColumnSpec, Connection, CreateTableOptions, Result, SchemaStatements, SqlValue,
    TableDefinition,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One schema change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    CreateTable {
        name: String,
        #[serde(flatten)]
        options: CreateTableOptions,
        #[serde(default)]
        columns: Vec<ColumnSpec>,
        /// Append `created_at` and `updated_at` columns.
        #[serde(default)]
        timestamps: bool,
    },
    DropTable {
        name: String,
    },
    RenameTable {
        name: String,
        new_name: String,
    },
    AddColumn {
        table: String,
        #[serde(flatten)]
        column: ColumnSpec,
    },
    ChangeColumn {
        table: String,
        #[serde(flatten)]
        column: ColumnSpec,
    },
    ChangeColumnDefault {
        table: String,
        column: String,
        default: SqlValue,
    },
    ChangeColumnNull {
        table: String,
        column: String,
        null: bool,
        #[serde(default)]
        default: Option<SqlValue>,
    },
    RenameColumn {
        table: String,
        column: String,
        new_name: String,
    },
    RemoveColumn {
        table: String,
        column: String,
    },
    RemoveColumns {
        table: String,
        columns: Vec<String>,
    },
    CreateSequence {
        name: String,
    },
    DropSequence {
        name: String,
    },
    RenameSequence {
        table: String,
        new_table: String,
    },
    CreateSchema {
        name: String,
    },
    DropSchema {
        name: String,
    },
    SetSchema {
        name: String,
    },
    CreateDatabase {
        name: String,
    },
    DropDatabase {
        name: String,
    },
}

impl Operation {
    /// Short label for logging.
    pub fn label(&self) -> String {
        match self {
            Operation::CreateTable { name, .. } => format!("create_table {}", name),
            Operation::DropTable { name } => format!("drop_table {}", name),
            Operation::RenameTable { name, new_name } => {
                format!("rename_table {} -> {}", name, new_name)
            }
            Operation::AddColumn { table, column } => format!("add_column {}.{}", table, column.name),
            Operation::ChangeColumn { table, column } => {
                format!("change_column {}.{}", table, column.name)
            }
            Operation::ChangeColumnDefault { table, column, .. } => {
                format!("change_column_default {}.{}", table, column)
            }
            Operation::ChangeColumnNull { table, column, .. } => {
                format!("change_column_null {}.{}", table, column)
            }
            Operation::RenameColumn { table, column, new_name } => {
                format!("rename_column {}.{} -> {}", table, column, new_name)
            }
            Operation::RemoveColumn { table, column } => format!("remove_column {}.{}", table, column),
            Operation::RemoveColumns { table, columns } => {
                format!("remove_columns {}.[{}]", table, columns.join(", "))
            }
            Operation::CreateSequence { name } => format!("create_sequence {}", name),
            Operation::DropSequence { name } => format!("drop_sequence {}", name),
            Operation::RenameSequence { table, new_table } => {
                format!("rename_sequence {} -> {}", table, new_table)
            }
            Operation::CreateSchema { name } => format!("create_schema {}", name),
            Operation::DropSchema { name } => format!("drop_schema {}", name),
            Operation::SetSchema { name } => format!("set_schema {}", name),
            Operation::CreateDatabase { name } => format!("create_database {}", name),
            Operation::DropDatabase { name } => format!("drop_database {}", name),
        }
    }

    /// Run the operation against an adapter.
    pub fn apply<C: Connection>(&self, adapter: &mut SchemaStatements<C>) -> Result<()> {
        match self {
            Operation::CreateTable {
                name,
                options,
                columns,
                timestamps,
            } => {
                let listed = table_columns(name, columns, *timestamps)?;
                adapter.create_table(name, options, |td| td.columns.extend(listed.columns))
            }
            Operation::DropTable { name } => adapter.drop_table(name),
            Operation::RenameTable { name, new_name } => adapter.rename_table(name, new_name),
            Operation::AddColumn { table, column } => adapter.add_column(
                table,
                &column.name,
                column.column_type.clone(),
                &column.options,
            ),
            Operation::ChangeColumn { table, column } => adapter.change_column(
                table,
                &column.name,
                column.column_type.clone(),
                &column.options,
            ),
            Operation::ChangeColumnDefault { table, column, default } => {
                adapter.change_column_default(table, column, default.clone())
            }
            Operation::ChangeColumnNull {
                table,
                column,
                null,
                default,
            } => adapter.change_column_null(table, column, *null, default.clone()),
            Operation::RenameColumn { table, column, new_name } => {
                adapter.rename_column(table, column, new_name)
            }
            Operation::RemoveColumn { table, column } => adapter.remove_column(table, column),
            Operation::RemoveColumns { table, columns } => adapter.remove_columns(table, columns),
            Operation::CreateSequence { name } => adapter.create_sequence(name),
            Operation::DropSequence { name } => adapter.drop_sequence(name),
            Operation::RenameSequence { table, new_table } => {
                adapter.rename_sequence(table, new_table)
            }
            Operation::CreateSchema { name } => adapter.create_schema(name),
            Operation::DropSchema { name } => adapter.drop_schema(name),
            Operation::SetSchema { name } => adapter.set_schema(name),
            Operation::CreateDatabase { name } => adapter.create_database(name),
            Operation::DropDatabase { name } => adapter.drop_database(name),
        }
    }
}

/// Collect the columns of a `create_table`, rejecting repeated names.
fn table_columns(name: &str, columns: &[ColumnSpec], timestamps: bool) -> Result<TableDefinition> {
    let mut td = TableDefinition::new(name, None);
    for column in columns {
        if td.has_column(&column.name) {
            return Err(AdapterError::Config(format!(
                "create_table {}: column '{}' is listed twice",
                name, column.name
            )));
        }
        td.column(
            column.name.clone(),
            column.column_type.clone(),
            column.options.clone(),
        );
    }
    if timestamps {
        if let Some(clash) = ["created_at", "updated_at"].into_iter().find(|c| td.has_column(c)) {
            return Err(AdapterError::Config(format!(
                "create_table {}: column '{}' clashes with timestamps",
                name, clash
            )));
        }
        td.timestamps();
    }
    Ok(td)
}

/// Parse a list of operations from YAML.
pub fn parse_operations(yaml: &str) -> Result<Vec<Operation>> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Load a list of operations from a YAML file.
pub fn load_operations<P: AsRef<Path>>(path: P) -> Result<Vec<Operation>> {
    let content = std::fs::read_to_string(path)?;
    parse_operations(&content)
}

/// Apply operations in order, stopping at the first failure.
pub fn apply_all<C: Connection>(
    adapter: &mut SchemaStatements<C>,
    operations: &[Operation],
) -> Result<usize> {
    for (idx, op) in operations.iter().enumerate() {
        info!("[{}/{}] {}", idx + 1, operations.len(), op.label());
        op.apply(adapter)?;
    }
    Ok(operations.len())
}

//! Index statistics grouping and index naming.

use crate::core::identifier::{truncate_identifier, IdentifierCase};
use crate::core::schema::IndexDefinition;
use crate::core::traits::Connection;
use crate::core::value::{Row, RowExt, SqlValue};

use super::SchemaStatements;

/// `SQLStatistics` column positions.
const NON_UNIQUE: usize = 3;
const INDEX_NAME: usize = 5;
const TYPE: usize = 6;
const ORDINAL_POSITION: usize = 7;
const COLUMN_NAME: usize = 8;

/// `SQL_TABLE_STAT`: a table statistics row, not an index column.
const TABLE_STAT: i64 = 0;

fn is_table_stat(row: &[SqlValue]) -> bool {
    // A missing TYPE cannot describe an index column.
    row.int(TYPE).map_or(true, |t| t == TABLE_STAT)
}

fn starts_index(row: &[SqlValue]) -> bool {
    row.int(ORDINAL_POSITION) == Some(1)
}

struct OpenIndex {
    name: String,
    unique: bool,
    columns: Vec<String>,
}

/// Group `SQLStatistics` rows into index definitions.
///
/// Rows are taken in driver order. A row with ordinal position 1 opens an
/// index; following rows append columns until the result ends, a table
/// statistics row appears, or another index opens. Column rows that arrive
/// while no index is open are ignored.
pub fn group_index_rows(table: &str, rows: &[Row], case: IdentifierCase) -> Vec<IndexDefinition> {
    let mut indexes = Vec::new();
    let mut open: Option<OpenIndex> = None;

    for (idx, row) in rows.iter().enumerate() {
        if is_table_stat(row) {
            continue;
        }

        if starts_index(row) {
            open = Some(OpenIndex {
                name: row.text(INDEX_NAME).unwrap_or_default(),
                unique: row.int(NON_UNIQUE) == Some(0),
                columns: Vec::new(),
            });
        }

        let Some(current) = open.as_mut() else {
            continue;
        };
        if let Some(column) = row.text(COLUMN_NAME) {
            current.columns.push(case.format_case(&column));
        }

        let closes = match rows.get(idx + 1) {
            None => true,
            Some(next) => is_table_stat(next) || starts_index(next),
        };
        if closes {
            if let Some(done) = open.take() {
                indexes.push(IndexDefinition {
                    table: table.to_string(),
                    name: case.format_case(&done.name),
                    unique: done.unique,
                    columns: done.columns,
                });
            }
        }
    }

    indexes
}

/// What an index name is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexNameSource {
    /// Generate `index_<table>_on_<c1>_and_<c2>...`.
    Columns(Vec<String>),
    /// Use this name as given.
    Name(String),
}

impl<C: Connection> SchemaStatements<C> {
    /// Index name for a table, cut to the maximum identifier length.
    ///
    /// Truncation can make two long names collide; no uniqueness check is made.
    pub fn index_name(&self, table: &str, source: &IndexNameSource) -> String {
        let name = match source {
            IndexNameSource::Columns(columns) => {
                format!("index_{}_on_{}", table, columns.join("_and_"))
            }
            IndexNameSource::Name(name) => name.clone(),
        };
        truncate_identifier(&name, self.max_identifier_len())
    }
}

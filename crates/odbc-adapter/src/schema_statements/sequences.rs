//! Sequences backing table primary keys.
//!
//! Every table created through `create_table` gets a sequence named
//! `<table>_seq`. Renaming a table renames its sequence in two steps: a
//! new sequence is created starting at the old one's next value, then the
//! old one is dropped. The steps are not atomic; if the drop fails, both
//! sequences exist and the error is returned.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::traits::{Connection, Dialect};
use crate::core::value::RowExt;
use crate::error::Result;

use super::SchemaStatements;

/// What `drop_table` does when dropping the table's sequence fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceDropPolicy {
    /// Return the driver error. The table is already dropped.
    #[default]
    Propagate,
    /// Log a warning and report success.
    Ignore,
}

/// Sequence name for a table.
pub fn default_sequence_name(table: &str) -> String {
    format!("{}_seq", table)
}

impl<C: Connection> SchemaStatements<C> {
    fn create_sequence_starting_at(&self, sequence: &str, start: i64) -> Result<()> {
        self.execute(&format!(
            "CREATE SEQUENCE {} INCREMENT BY 1 START WITH {} NO CYCLE",
            self.quoting.quote_table_name(sequence),
            start
        ))
    }

    /// `CREATE SEQUENCE "s" INCREMENT BY 1 START WITH 1 NO CYCLE`.
    pub fn create_sequence(&self, sequence: &str) -> Result<()> {
        self.create_sequence_starting_at(sequence, 1)
    }

    pub fn drop_sequence(&self, sequence: &str) -> Result<()> {
        self.execute(&format!("DROP SEQUENCE {}", self.quoting.quote_table_name(sequence)))
    }

    /// Next value of a sequence. Advances the sequence.
    pub fn next_sequence_value(&self, sequence: &str) -> Result<Option<i64>> {
        let sql = self
            .dialect
            .next_value_query(&self.quoting.quote_table_name(sequence));
        let result = self.exec_query(&sql)?;
        Ok(result.rows.first().and_then(|row| row.int(0)))
    }

    /// Move a table's sequence to the name for `new_table`.
    ///
    /// The new sequence continues from the old one's next value, or from 1
    /// when the driver returns no value.
    pub fn rename_sequence(&self, table: &str, new_table: &str) -> Result<()> {
        let old = default_sequence_name(table);
        let new = default_sequence_name(new_table);

        let start = self.next_sequence_value(&old)?.unwrap_or(1);
        self.create_sequence_starting_at(&new, start)?;
        self.drop_sequence(&old)
    }

    /// Drop a table's sequence, applying the configured failure policy.
    pub(super) fn drop_table_sequence(&self, table: &str) -> Result<()> {
        let sequence = default_sequence_name(table);
        match self.drop_sequence(&sequence) {
            Ok(()) => Ok(()),
            Err(e) => match self.settings.sequence_drop_policy {
                SequenceDropPolicy::Propagate => Err(e),
                SequenceDropPolicy::Ignore => {
                    warn!("Ignoring failure to drop sequence '{}': {}", sequence, e);
                    Ok(())
                }
            },
        }
    }
}

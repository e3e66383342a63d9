//! Rendering of values as SQL literal text.
//!
//! Quoting is lexical only. Nothing is validated or rejected: a value the
//! database would refuse still produces a literal, and the driver reports
//! the failure when the statement runs.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identifier::quote_ident;
use crate::core::value::SqlValue;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timezone that timezone-aware values are converted to before quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultTimezone {
    #[default]
    Utc,
    Local,
}

/// Values that can be rendered by [`Quoting::quoted_date`].
pub trait QuotedDate {
    fn format_for(&self, timezone: DefaultTimezone) -> String;
}

impl QuotedDate for NaiveDate {
    fn format_for(&self, _timezone: DefaultTimezone) -> String {
        self.format(DATE_FORMAT).to_string()
    }
}

impl QuotedDate for NaiveDateTime {
    fn format_for(&self, _timezone: DefaultTimezone) -> String {
        self.format(DATETIME_FORMAT).to_string()
    }
}

impl<Tz: TimeZone> QuotedDate for DateTime<Tz> {
    fn format_for(&self, timezone: DefaultTimezone) -> String {
        let naive = match timezone {
            DefaultTimezone::Utc => self.with_timezone(&Utc).naive_utc(),
            DefaultTimezone::Local => self.with_timezone(&Local).naive_local(),
        };
        naive.format(DATETIME_FORMAT).to_string()
    }
}

/// Literal and identifier quoting for one adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quoting {
    pub default_timezone: DefaultTimezone,
}

impl Quoting {
    pub fn new(default_timezone: DefaultTimezone) -> Self {
        Self { default_timezone }
    }

    /// Escape string content for use inside single quotes.
    ///
    /// Backslashes and single quotes are doubled.
    ///
    /// ```
    /// use odbc_adapter::Quoting;
    /// assert_eq!(Quoting::default().quote_string("O'Brien"), "O''Brien");
    /// ```
    pub fn quote_string(&self, s: &str) -> String {
        s.replace('\\', "\\\\").replace('\'', "''")
    }

    pub fn quoted_true(&self) -> &'static str {
        "1"
    }

    pub fn quoted_false(&self) -> &'static str {
        "0"
    }

    pub fn unquoted_true(&self) -> i64 {
        1
    }

    pub fn unquoted_false(&self) -> i64 {
        0
    }

    /// Quote a column name with double quotes.
    pub fn quote_column_name(&self, name: &str) -> String {
        quote_ident(name)
    }

    /// Quote a table name. Same rule as column names; the name is never
    /// split on dots.
    pub fn quote_table_name(&self, name: &str) -> String {
        quote_ident(name)
    }

    /// Format a date or date-time for embedding in SQL.
    ///
    /// Timezone-aware values are first converted to the configured default
    /// timezone; no offset is emitted.
    pub fn quoted_date<D: QuotedDate + ?Sized>(&self, value: &D) -> String {
        value.format_for(self.default_timezone)
    }

    /// Render a value as a complete SQL literal.
    pub fn quote(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(true) => self.quoted_true().to_string(),
            SqlValue::Bool(false) => self.quoted_false().to_string(),
            SqlValue::Int(v) => v.to_string(),
            SqlValue::Float(v) => v.to_string(),
            SqlValue::Decimal(d) => d.to_string(),
            SqlValue::Text(s) => format!("'{}'", self.quote_string(s)),
            SqlValue::Bytes(b) => format!("X'{}'", hex::encode_upper(b)),
            SqlValue::Date(d) => format!("'{}'", self.quoted_date(d)),
            SqlValue::DateTime(dt) => format!("'{}'", self.quoted_date(dt)),
            SqlValue::DateTimeTz(dt) => format!("'{}'", self.quoted_date(dt)),
            SqlValue::Time(t) => format!("'{}'", t.format("%H:%M:%S")),
        }
    }
}

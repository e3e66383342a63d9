//! SQL values for catalog rows, column defaults and literals.
//!
//! Catalog cursors from ODBC drivers frequently hand back every cell as
//! text, so the accessors here are lenient: an integer field may arrive as
//! `Int(4)` from one driver and `Text("4")` from another.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single SQL value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL NULL.
    Null,

    /// Boolean value.
    Bool(bool),

    /// Any integer type.
    Int(i64),

    /// Any floating point type.
    Float(f64),

    /// Character data.
    ///
    /// Listed before the remaining variants so untagged deserialization
    /// keeps strings as text.
    Text(String),

    /// Exact decimal.
    Decimal(Decimal),

    /// Binary data.
    Bytes(Vec<u8>),

    /// Date without time component.
    Date(NaiveDate),

    /// Timestamp without timezone.
    DateTime(NaiveDateTime),

    /// Timestamp with timezone offset.
    DateTimeTz(DateTime<FixedOffset>),

    /// Time without date component.
    Time(NaiveTime),
}

impl SqlValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Borrow the value as a string slice if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Interpret the value as an integer.
    ///
    /// Text is parsed after trimming; booleans map to 0/1.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            SqlValue::Bool(b) => Some(i64::from(*b)),
            SqlValue::Decimal(d) => d.trunc().to_string().parse().ok(),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Render the value as plain text (no SQL quoting). NULL is `None`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            SqlValue::Null => None,
            SqlValue::Bool(b) => Some(b.to_string()),
            SqlValue::Int(v) => Some(v.to_string()),
            SqlValue::Float(v) => Some(v.to_string()),
            SqlValue::Decimal(d) => Some(d.to_string()),
            SqlValue::Text(s) => Some(s.clone()),
            SqlValue::Bytes(b) => Some(hex::encode(b)),
            SqlValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            SqlValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            SqlValue::DateTimeTz(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S %:z").to_string()),
            SqlValue::Time(t) => Some(t.format("%H:%M:%S").to_string()),
        }
    }

    /// Interpret the value as a nullability flag.
    ///
    /// Accepts the spellings drivers use for `IS_NULLABLE`/`NULLABLE`:
    /// `TRUE`/`FALSE`, `YES`/`NO`, `1`/`0`.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(b) => Some(*b),
            SqlValue::Int(v) => Some(*v != 0),
            SqlValue::Text(s) => match s.trim().to_ascii_uppercase().as_str() {
                "TRUE" | "YES" | "Y" | "1" => Some(true),
                "FALSE" | "NO" | "N" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A catalog or query result row.
pub type Row = Vec<SqlValue>;

/// Positional accessors for driver rows.
///
/// Out-of-range positions read as NULL, matching the "absent means
/// nothing there" treatment of driver results.
pub trait RowExt {
    /// Cell at `idx`, or NULL.
    fn cell(&self, idx: usize) -> &SqlValue;

    /// Cell at `idx` as owned text.
    fn text(&self, idx: usize) -> Option<String> {
        self.cell(idx).to_text()
    }

    /// Cell at `idx` as an integer.
    fn int(&self, idx: usize) -> Option<i64> {
        self.cell(idx).as_i64()
    }
}

static NULL: SqlValue = SqlValue::Null;

impl RowExt for [SqlValue] {
    fn cell(&self, idx: usize) -> &SqlValue {
        self.get(idx).unwrap_or(&NULL)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::DateTime(v)
    }
}

impl From<DateTime<FixedOffset>> for SqlValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        SqlValue::DateTimeTz(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

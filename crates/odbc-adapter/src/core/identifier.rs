//! Identifier quoting, case folding and length limits.
//!
//! SQL identifiers (table names, column names, schema names) cannot be
//! passed as statement parameters, so DDL and catalog queries embed them
//! as quoted text. Quoting here is purely lexical: the name is wrapped in
//! double quotes and embedded double quotes are doubled. Nothing is
//! rejected; a malformed name produces malformed SQL.

use serde::{Deserialize, Serialize};

/// Fallback maximum identifier length when the driver does not report one.
pub const DEFAULT_MAX_IDENTIFIER_LENGTH: usize = 255;

/// Quote an identifier with double quotes.
///
/// # Examples
///
/// ```
/// use odbc_adapter::core::identifier::quote_ident;
/// assert_eq!(quote_ident("users"), "\"users\"");
/// assert_eq!(quote_ident("my\"col"), "\"my\"\"col\"");
/// ```
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Truncate an identifier to at most `max` characters.
///
/// Counts characters, not bytes, so multi-byte names are never split
/// inside a code point.
pub fn truncate_identifier(name: &str, max: usize) -> String {
    match name.char_indices().nth(max) {
        Some((byte_idx, _)) => name[..byte_idx].to_string(),
        None => name.to_string(),
    }
}

/// How a database stores unquoted identifiers in its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierCase {
    /// Catalog names are folded to upper case (HANA, Oracle, DB2).
    Upper,
    /// Catalog names are folded to lower case (PostgreSQL).
    Lower,
    /// Catalog names are stored as written.
    #[default]
    Mixed,
}

impl IdentifierCase {
    /// Convert a catalog-reported name into the application's convention.
    ///
    /// With upper-case catalogs, a name that is entirely upper case is
    /// lowered; a name that already contains lower-case letters was
    /// created quoted and is left alone.
    pub fn format_case(self, identifier: &str) -> String {
        match self {
            IdentifierCase::Upper if !identifier.chars().any(char::is_lowercase) => {
                identifier.to_lowercase()
            }
            _ => identifier.to_string(),
        }
    }

    /// Convert an application name into the form stored in the catalog.
    ///
    /// The inverse of [`format_case`](Self::format_case): only names
    /// without letters of the opposite case are folded.
    pub fn native_case(self, identifier: &str) -> String {
        match self {
            IdentifierCase::Upper if !identifier.chars().any(char::is_uppercase) => {
                identifier.to_uppercase()
            }
            IdentifierCase::Lower if !identifier.chars().any(char::is_lowercase) => {
                identifier.to_lowercase()
            }
            _ => identifier.to_string(),
        }
    }
}

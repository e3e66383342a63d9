//! Configuration validation.

use super::Config;
use crate::dialect::DialectImpl;
use crate::error::{AdapterError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let conn = &config.connection;

    if DialectImpl::from_db_type(&conn.dialect).is_err() {
        return Err(AdapterError::Config(format!(
            "connection.dialect must be 'hana' or 'generic', got '{}'",
            conn.dialect
        )));
    }

    // A raw connection string carries host and credentials itself.
    let has_dsn = conn
        .connection_string
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty());
    if !has_dsn {
        if conn.host.is_empty() {
            return Err(AdapterError::Config(
                "connection.host or connection.connection_string is required".into(),
            ));
        }
        if conn.user.is_empty() {
            return Err(AdapterError::Config("connection.user is required".into()));
        }
    }

    if conn.database.is_empty() {
        return Err(AdapterError::Config("connection.database is required".into()));
    }

    if let Some(0) = config.adapter.max_identifier_length {
        return Err(AdapterError::Config(
            "adapter.max_identifier_length must be at least 1".into(),
        ));
    }

    Ok(())
}

//! Error types for the adapter.

use thiserror::Error;

/// Main error type for adapter operations.
///
/// Driver failures are carried through unchanged; the adapter never retries
/// or rewrites them.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the underlying driver, with the statement or
    /// catalog call that raised it.
    #[error("Driver error: {message}\n  Context: {context}")]
    Driver { message: String, context: String },

    /// Column lookup on a table that does not have it.
    #[error("No such column: {table}.{column}")]
    NoSuchColumn { table: String, column: String },

    /// ODBC driver manager error
    #[cfg(feature = "odbc")]
    #[error("ODBC error: {0}")]
    Odbc(#[from] odbc_api::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdapterError {
    /// Create a Driver error with the statement or call that produced it.
    pub fn driver(message: impl Into<String>, context: impl Into<String>) -> Self {
        AdapterError::Driver {
            message: message.into(),
            context: context.into(),
        }
    }

    /// Create a NoSuchColumn error.
    pub fn no_such_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        AdapterError::NoSuchColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            AdapterError::Config(_) | AdapterError::Yaml(_) => 1,
            AdapterError::Driver { .. } | AdapterError::NoSuchColumn { .. } => 2,
            #[cfg(feature = "odbc")]
            AdapterError::Odbc(_) => 2,
            AdapterError::Io(_) => 7,
            AdapterError::Json(_) => 10,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

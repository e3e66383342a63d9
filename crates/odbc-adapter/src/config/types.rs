//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quoting::DefaultTimezone;
use crate::schema_statements::SequenceDropPolicy;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection.
    pub connection: ConnectionConfig,

    /// Adapter behavior.
    #[serde(default)]
    pub adapter: AdapterConfig,
}

/// Database connection configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Dialect name: "hana" or "generic" (default: "hana").
    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// ODBC driver name (default: "HDBODBC").
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Database host.
    #[serde(default)]
    pub host: String,

    /// Database port (default: 30015).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database (schema) to scope the session to.
    pub database: String,

    /// Username.
    #[serde(default)]
    pub user: String,

    /// Password. Never written back out.
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Complete ODBC connection string, used instead of the fields above.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("dialect", &self.dialect)
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field(
                "connection_string",
                &self.connection_string.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Adapter behavior configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Timezone for quoting timezone-aware values (default: utc).
    #[serde(default)]
    pub default_timezone: DefaultTimezone,

    /// Sequence drop failure handling in drop_table (default: propagate).
    #[serde(default)]
    pub sequence_drop_policy: SequenceDropPolicy,

    /// Override for the driver-reported maximum identifier length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_identifier_length: Option<usize>,
}

// Default value functions for serde
fn default_dialect() -> String {
    "hana".to_string()
}

fn default_driver() -> String {
    "HDBODBC".to_string()
}

fn default_port() -> u16 {
    30015
}

//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use crate::dialect::DialectImpl;
use crate::error::Result;
use crate::schema_statements::AdapterSettings;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Dialect selected by `connection.dialect`.
    pub fn dialect(&self) -> Result<DialectImpl> {
        DialectImpl::from_db_type(&self.connection.dialect)
    }

    /// Adapter settings for [`SchemaStatements`](crate::SchemaStatements).
    pub fn settings(&self) -> AdapterSettings {
        AdapterSettings {
            database: Some(self.connection.database.clone()),
            default_timezone: self.adapter.default_timezone,
            sequence_drop_policy: self.adapter.sequence_drop_policy,
            max_identifier_length: self.adapter.max_identifier_length,
        }
    }
}

impl ConnectionConfig {
    /// Build the ODBC connection string.
    ///
    /// An explicit `connection_string` is returned unchanged.
    pub fn connection_string(&self) -> String {
        if let Some(raw) = self.connection_string.as_deref().filter(|s| !s.trim().is_empty()) {
            return raw.to_string();
        }

        match self.dialect.to_lowercase().as_str() {
            "hana" | "saphana" | "sap_hana" => format!(
                "DRIVER={{{}}};SERVERNODE={}:{};UID={};PWD={};DATABASENAME={};",
                self.driver, self.host, self.port, self.user, self.password, self.database
            ),
            _ => format!(
                "Driver={{{}}};Server={};Port={};Database={};UID={};PWD={};",
                self.driver, self.host, self.port, self.database, self.user, self.password
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::Dialect;
    use crate::quoting::DefaultTimezone;
    use crate::schema_statements::SequenceDropPolicy;

    const YAML: &str = r#"
connection:
  host: hana.local
  database: APP
  user: SYSTEM
  password: secret
adapter:
  default_timezone: local
  sequence_drop_policy: ignore
"#;

    #[test]
    fn test_from_yaml_defaults() {
        let config = Config::from_yaml(YAML).unwrap();
        assert_eq!(config.connection.dialect, "hana");
        assert_eq!(config.connection.port, 30015);
        assert_eq!(config.adapter.default_timezone, DefaultTimezone::Local);
        assert_eq!(config.adapter.sequence_drop_policy, SequenceDropPolicy::Ignore);

        let settings = config.settings();
        assert_eq!(settings.database.as_deref(), Some("APP"));
        assert_eq!(config.dialect().unwrap().name(), "hana");
    }

    #[test]
    fn test_adapter_section_optional() {
        let yaml = "connection:\n  host: h\n  database: D\n  user: u\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.adapter.sequence_drop_policy, SequenceDropPolicy::Propagate);
        assert_eq!(config.adapter.default_timezone, DefaultTimezone::Utc);
    }

    #[test]
    fn test_password_not_serialized() {
        let config = Config::from_yaml(YAML).unwrap();
        let out = serde_yaml::to_string(&config).unwrap();
        assert!(!out.contains("secret"));
        assert!(out.contains("hana.local"));
    }

    #[test]
    fn test_hana_connection_string() {
        let config = Config::from_yaml(YAML).unwrap();
        assert_eq!(
            config.connection.connection_string(),
            "DRIVER={HDBODBC};SERVERNODE=hana.local:30015;UID=SYSTEM;PWD=secret;DATABASENAME=APP;"
        );
    }

    #[test]
    fn test_raw_connection_string_wins() {
        let yaml = "connection:\n  database: D\n  connection_string: DSN=prod\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.connection.connection_string(), "DSN=prod");
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(Config::from_yaml("connection: [").is_err());
    }
}

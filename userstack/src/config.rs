//! Configuration management

use serde::Deserialize;
use std::path::Path;
use userstack_api::{ApiSettings, CreateMode, ErrorMapping};
use userstack_store::DynamoDbStoreConfig;

/// Main configuration structure
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum StoreConfig {
    #[default]
    #[serde(rename = "ephemeral")]
    Ephemeral,

    #[serde(rename = "dynamodb")]
    DynamoDb {
        table_name: String,
        #[serde(default)]
        endpoint_url: Option<String>,
        #[serde(default)]
        region: Option<String>,
    },
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default)]
    pub create_mode: CreateMode,

    #[serde(default)]
    pub error_mapping: ErrorMapping,

    #[serde(default)]
    pub base_path: Option<String>,

    #[serde(default = "default_true")]
    pub cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            create_mode: CreateMode::default(),
            error_mapping: ErrorMapping::default(),
            base_path: None,
            cors: true,
        }
    }
}

impl ApiConfig {
    pub fn settings(&self) -> ApiSettings {
        ApiSettings {
            create_mode: self.create_mode,
            error_mapping: self.error_mapping,
            base_path: self.base_path.clone(),
        }
    }
}

impl StoreConfig {
    /// Connection settings when the DynamoDB store is selected
    pub fn dynamodb(&self) -> Option<DynamoDbStoreConfig> {
        match self {
            Self::Ephemeral => None,
            Self::DynamoDb {
                table_name,
                endpoint_url,
                region,
            } => Some(DynamoDbStoreConfig {
                table_name: table_name.clone(),
                endpoint_url: endpoint_url.clone(),
                region: region.clone(),
            }),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file and `USERSTACK__*` environment variables.
    ///
    /// Without an explicit path, `userstack.{toml,yaml,json}` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("userstack").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("USERSTACK").separator("__"))
            .build()?;

        Ok(config.try_deserialize::<Config>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_toml(contents: &str) -> Config {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        Config::load(Some(file.path())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = load_toml("");
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 8080);
        assert!(config.api.cors);
        assert_eq!(config.store, StoreConfig::Ephemeral);
    }

    #[test]
    fn test_dynamodb_store() {
        let config = load_toml(
            r#"
            [store]
            type = "dynamodb"
            table_name = "users-table"
            endpoint_url = "http://localhost:8000"
            "#,
        );

        let dynamodb = config.store.dynamodb().unwrap();
        assert_eq!(dynamodb.table_name, "users-table");
        assert_eq!(dynamodb.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(dynamodb.region, None);
    }

    #[test]
    fn test_api_section() {
        let config = load_toml(
            r#"
            [server]
            port = 9000

            [api]
            create_mode = "placeholder"
            error_mapping = "catch-all"
            base_path = "/prod"
            cors = false
            "#,
        );

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.api.cors);

        let settings = config.api.settings();
        assert_eq!(settings.create_mode, CreateMode::Placeholder);
        assert_eq!(settings.error_mapping, ErrorMapping::CatchAll);
        assert_eq!(settings.base_path.as_deref(), Some("/prod"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}

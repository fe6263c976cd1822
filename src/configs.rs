use std::path::PathBuf;

use error_stack::{report, ResultExt};
use hyperswitch_masking::{PeekInterface, Secret};

use crate::{
    connectors::phonepe::{constants, transformers::Environment},
    consts,
    errors::{ConnectorError, CustomResult},
    http_client::HttpOptions,
    logger::config::Log,
};

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Config {
    pub common: Common,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub http: HttpOptions,
    pub connectors: Connectors,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Common {
    pub environment: consts::Env,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Connectors {
    pub phonepe: PhonepeConnectorConfig,
}

/// Merchant credentials and gateway selection
#[derive(Clone, serde::Deserialize, Debug)]
pub struct PhonepeConnectorConfig {
    #[serde(default = "empty_secret")]
    pub merchant_id: Secret<String>,
    #[serde(default = "empty_secret")]
    pub salt_key: Secret<String>,
    #[serde(default = "default_key_index")]
    pub key_index: u32,
    #[serde(default)]
    pub environment: Environment,
    /// Replaces the environment host, e.g. for a proxy in front of the gateway
    #[serde(default)]
    pub base_url: Option<String>,
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

fn default_key_index() -> u32 {
    constants::DEFAULT_KEY_INDEX
}

impl PhonepeConnectorConfig {
    pub fn validate(&self) -> CustomResult<(), ConnectorError> {
        if self.merchant_id.peek().trim().is_empty() {
            return Err(report!(ConnectorError::MissingRequiredConfig {
                field_name: "connectors.phonepe.merchant_id"
            }));
        }
        if self.salt_key.peek().is_empty() {
            return Err(report!(ConnectorError::MissingRequiredConfig {
                field_name: "connectors.phonepe.salt_key"
            }));
        }
        if let Some(base_url) = &self.base_url {
            let url = url::Url::parse(base_url).change_context(
                ConnectorError::InvalidConfigValue {
                    field_name: "connectors.phonepe.base_url",
                    reason: "not a valid absolute url".to_string(),
                },
            )?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(report!(ConnectorError::InvalidConfigValue {
                    field_name: "connectors.phonepe.base_url",
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                }));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Function to build the configuration by picking it from default locations
    pub fn new() -> CustomResult<Self, ConnectorError> {
        Self::new_with_config_path(None)
    }

    /// Function to build the configuration by picking it from default locations
    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> CustomResult<Self, ConnectorError> {
        let env = consts::Env::current_env();
        let config_path = Self::config_path(&env, explicit_config_path);

        let config = Self::builder(&env)?
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(consts::ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("http.proxy.bypass_urls"),
            )
            .build()
            .change_context(ConnectorError::ConfigurationFailed)?;

        let config: Self = serde_path_to_error::deserialize(config)
            .map_err(|error| {
                let path = error.path().to_string();
                report!(ConnectorError::ConfigurationFailed)
                    .attach_printable(format!("Unable to deserialize configuration at '{path}'"))
                    .attach_printable(error.into_inner().to_string())
            })?;

        config.validate()?;
        tracing::debug!(environment = %config.common.environment, "configuration loaded");

        Ok(config)
    }

    pub fn builder(
        environment: &consts::Env,
    ) -> CustomResult<config::ConfigBuilder<config::builder::DefaultState>, ConnectorError> {
        config::Config::builder()
            .set_default("common.environment", environment.to_string())
            .and_then(|builder| {
                builder.set_default(
                    "connectors.phonepe.key_index",
                    i64::from(constants::DEFAULT_KEY_INDEX),
                )
            })
            .and_then(|builder| {
                builder.set_default(
                    "connectors.phonepe.environment",
                    Environment::default().to_string(),
                )
            })
            .change_context(ConnectorError::ConfigurationFailed)
    }

    /// Config path.
    pub fn config_path(environment: &consts::Env, explicit_config_path: Option<PathBuf>) -> PathBuf {
        explicit_config_path.unwrap_or_else(|| {
            let mut config_path = workspace_path();
            config_path.push(consts::CONFIG_DIRECTORY);
            config_path.push(environment.config_file_name());
            config_path
        })
    }

    pub fn validate(&self) -> CustomResult<(), ConnectorError> {
        self.connectors.phonepe.validate()
    }
}

/// Get the origin directory of the project
pub fn workspace_path() -> PathBuf {
    std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

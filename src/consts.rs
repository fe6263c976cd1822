/// Prefix for environment variables that override configuration values
pub const ENV_PREFIX: &str = "PHONEPE";

/// Environment variable that selects the configuration file
pub const RUN_ENV: &str = "PHONEPE_ENV";

/// Default directory holding `<env>.toml` files
pub const CONFIG_DIRECTORY: &str = "config";

/// Error code used when the gateway does not send one
pub const NO_ERROR_CODE: &str = "NO_ERROR_CODE";

/// Error message used when the gateway does not send one
pub const NO_ERROR_MESSAGE: &str = "No error message";

/// Deployment environment of the process embedding the connector.
///
/// Only selects which configuration file is read. The gateway host is chosen by
/// [`crate::connectors::phonepe::transformers::Environment`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Env {
    #[default]
    Development,
    Sandbox,
    Production,
}

impl Env {
    /// Reads [`RUN_ENV`], falling back to [`Env::Development`] when unset or unknown.
    pub fn current_env() -> Self {
        std::env::var(RUN_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub const fn config_file_name(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Sandbox => "sandbox.toml",
            Self::Production => "production.toml",
        }
    }
}

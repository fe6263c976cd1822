//! Errors raised while configuring the connector, building signed requests and
//! talking to the gateway.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Result carrying an [`error_stack::Report`] of the given context
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Broad category of a [`ConnectorError`], for callers that only care about
/// who is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Bad environment, missing credentials or an unusable transport setup
    Config,
    /// Transaction data could not be encoded
    Serialization,
    /// Network or HTTP failure, or an error body returned by the gateway
    Transport,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectorError {
    #[error("Invalid environment: {0}")]
    InvalidEnvironment(String),
    #[error("Missing required configuration: {field_name}")]
    MissingRequiredConfig { field_name: &'static str },
    #[error("Invalid value for '{field_name}': {reason}")]
    InvalidConfigValue {
        field_name: &'static str,
        reason: String,
    },
    #[error("Failed while building configuration")]
    ConfigurationFailed,
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Failed to send request to connector")]
    RequestNotSent,
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error(
        "Failed at connector with status {}: {} ({})",
        .0.status_code,
        .0.message,
        .0.code
    )]
    FailedAtConnector(ErrorResponse),
}

impl ConnectorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidEnvironment(_)
            | Self::MissingRequiredConfig { .. }
            | Self::InvalidConfigValue { .. }
            | Self::ConfigurationFailed => ErrorKind::Config,
            Self::RequestEncodingFailed => ErrorKind::Serialization,
            Self::RequestNotSent
            | Self::ResponseDeserializationFailed
            | Self::FailedAtConnector(_) => ErrorKind::Transport,
        }
    }

    /// Gateway error body, when the failure came from a non-2xx response
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::FailedAtConnector(response) => Some(response),
            _ => None,
        }
    }
}

/// Structured form of a non-2xx gateway reply.
///
/// `body` keeps the whole JSON document so that callers can inspect fields the
/// connector does not model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub code: String,
    pub message: String,
    pub body: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            code: consts::NO_ERROR_CODE.to_string(),
            message: consts::NO_ERROR_MESSAGE.to_string(),
            body: None,
        }
    }

    /// Whether resending the same request may succeed. The connector itself never
    /// retries.
    pub fn is_retryable(&self) -> bool {
        (500..600).contains(&self.status_code)
            || matches!(self.code.as_str(), "INTERNAL_SERVER_ERROR" | "TIMED_OUT")
    }
}

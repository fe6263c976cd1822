use base64::Engine;
use error_stack::{report, ResultExt};
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use super::constants;
use crate::{
    consts,
    crypto::{self, GenerateDigest},
    errors::{self, CustomResult, ErrorResponse},
    ext_traits::{BytesExt, Encode},
    types::{MinorUnit, Response},
};

type Error = error_stack::Report<errors::ConnectorError>;

// ===== ENVIRONMENT =====

/// Gateway environment; decides which host requests go to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display, strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Environment {
    #[default]
    #[serde(rename = "SANDBOX")]
    #[strum(to_string = "SANDBOX", serialize = "DEV", serialize = "UAT")]
    Sandbox,
    #[serde(rename = "PRODUCTION")]
    #[strum(to_string = "PRODUCTION", serialize = "PROD")]
    Production,
}

impl Environment {
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => constants::SANDBOX_BASE_URL,
            Self::Production => constants::PRODUCTION_BASE_URL,
        }
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use std::str::FromStr as _;

        let s = String::deserialize(deserializer)?;
        Self::from_str(s.trim()).map_err(|_| {
            serde::de::Error::custom(format!("unknown PhonePe environment '{s}'"))
        })
    }
}

// ===== AUTHENTICATION =====

#[derive(Debug, Clone)]
pub struct PhonepeAuthType {
    pub merchant_id: Secret<String>,
    pub salt_key: Secret<String>,
    pub key_index: u32,
}

impl PhonepeAuthType {
    pub fn new(
        merchant_id: impl Into<String>,
        salt_key: impl Into<String>,
        key_index: u32,
    ) -> CustomResult<Self, errors::ConnectorError> {
        let merchant_id = merchant_id.into();
        let salt_key = salt_key.into();
        if merchant_id.trim().is_empty() {
            return Err(report!(errors::ConnectorError::MissingRequiredConfig {
                field_name: "merchant_id"
            }));
        }
        if salt_key.is_empty() {
            return Err(report!(errors::ConnectorError::MissingRequiredConfig {
                field_name: "salt_key"
            }));
        }
        Ok(Self {
            merchant_id: Secret::new(merchant_id),
            salt_key: Secret::new(salt_key),
            key_index,
        })
    }
}

// ===== REQUEST STRUCTURES =====

/// Transaction details sent to the pay API.
///
/// `merchantId` is not part of this type; it is merged in from the auth config
/// when the request is signed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhonepeTransactionData {
    pub merchant_transaction_id: String,
    pub merchant_user_id: Secret<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub amount: MinorUnit,
    pub redirect_url: String,
    pub redirect_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    pub mobile_number: Secret<String>,
    pub payment_instrument: PhonepePaymentInstrument,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhonepePaymentInstrument {
    PayPage,
    UpiIntent {
        #[serde(rename = "targetApp", default, skip_serializing_if = "Option::is_none")]
        target_app: Option<String>,
    },
    UpiCollect {
        vpa: Secret<String>,
    },
    UpiQr,
}

impl PhonepePaymentInstrument {
    pub fn instrument_type(&self) -> &'static str {
        match self {
            Self::PayPage => constants::PAY_PAGE,
            Self::UpiIntent { .. } => constants::UPI_INTENT,
            Self::UpiCollect { .. } => constants::UPI_COLLECT,
            Self::UpiQr => constants::UPI_QR,
        }
    }
}

/// Payload and X-VERIFY value for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    /// Base64 of the JSON payload; empty for status checks
    pub base64_payload: String,
    /// `sha256hex###keyIndex`
    pub checksum: String,
    /// Path the checksum was computed over
    pub api_path: String,
}

/// Body of the pay API call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhonepePaymentsRequest {
    pub request: String,
}

impl From<&SignedEnvelope> for PhonepePaymentsRequest {
    fn from(envelope: &SignedEnvelope) -> Self {
        Self {
            request: envelope.base64_payload.clone(),
        }
    }
}

// ===== REQUEST BUILDING =====

impl SignedEnvelope {
    /// Signs a pay request for any serializable transaction.
    ///
    /// The transaction must serialize to a JSON object; `merchantId` is inserted
    /// into it before encoding.
    pub fn try_for_payment<T: Serialize>(
        auth: &PhonepeAuthType,
        transaction: &T,
    ) -> Result<Self, Error> {
        let mut payload = serde_json::to_value(transaction)
            .change_context(errors::ConnectorError::RequestEncodingFailed)
            .attach_printable("transaction is not representable as JSON")?;

        let object = payload.as_object_mut().ok_or_else(|| {
            report!(errors::ConnectorError::RequestEncodingFailed)
                .attach_printable("transaction must serialize to a JSON object")
        })?;
        object.insert(
            constants::MERCHANT_ID_FIELD.to_string(),
            serde_json::Value::String(auth.merchant_id.peek().clone()),
        );

        let json_payload = payload.encode_to_string_of_json()?;
        let base64_payload = base64::engine::general_purpose::STANDARD.encode(json_payload);
        let api_path = constants::API_PAY_ENDPOINT.to_string();
        let checksum =
            generate_phonepe_checksum(&base64_payload, &api_path, &auth.salt_key, auth.key_index)?;

        Ok(Self {
            base64_payload,
            checksum,
            api_path,
        })
    }

    /// Signs a status check; the payload part of the checksum input is empty.
    pub fn try_for_status(
        auth: &PhonepeAuthType,
        merchant_transaction_id: &str,
    ) -> Result<Self, Error> {
        if merchant_transaction_id.trim().is_empty() {
            return Err(report!(errors::ConnectorError::RequestEncodingFailed)
                .attach_printable("merchant_transaction_id must not be empty"));
        }
        validate_path_segment(
            "merchant_transaction_id",
            merchant_transaction_id,
            Some(constants::MAX_TRANSACTION_ID_LENGTH),
        )?;
        validate_path_segment("merchant_id", auth.merchant_id.peek(), None)?;

        let api_path = format!(
            "{}/{}/{}",
            constants::API_STATUS_ENDPOINT,
            auth.merchant_id.peek(),
            merchant_transaction_id
        );
        let checksum = generate_phonepe_checksum("", &api_path, &auth.salt_key, auth.key_index)?;

        Ok(Self {
            base64_payload: String::new(),
            checksum,
            api_path,
        })
    }
}

/// Ids are signed as part of the url path, so they must survive url parsing
/// unchanged: only `[A-Za-z0-9_-]` is allowed.
fn validate_path_segment(
    field_name: &'static str,
    value: &str,
    max_length: Option<usize>,
) -> Result<(), Error> {
    if let Some(max_length) = max_length {
        if value.len() > max_length {
            return Err(report!(errors::ConnectorError::RequestEncodingFailed)
                .attach_printable(format!("{field_name} exceeds {max_length} characters")));
        }
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(report!(errors::ConnectorError::RequestEncodingFailed)
            .attach_printable(format!("{field_name} contains characters outside [A-Za-z0-9_-]")));
    }
    Ok(())
}

/// `hex(SHA256(base64_payload + api_path + salt_key)) + "###" + key_index`
pub fn generate_phonepe_checksum(
    base64_payload: &str,
    api_path: &str,
    salt_key: &Secret<String>,
    key_index: u32,
) -> Result<String, Error> {
    let checksum_input = format!("{}{}{}", base64_payload, api_path, salt_key.peek());

    let hash_bytes = crypto::Sha256
        .generate_digest(checksum_input.as_bytes())
        .change_context(errors::ConnectorError::RequestEncodingFailed)?;

    Ok(format!(
        "{}{}{}",
        hex::encode(hash_bytes),
        constants::CHECKSUM_SEPARATOR,
        key_index
    ))
}

// ===== RESPONSE STRUCTURES =====

#[derive(Debug, Deserialize, Serialize)]
pub struct PhonepeErrorResponse {
    #[serde(default)]
    pub success: bool,
    pub code: String,
    #[serde(default = "default_error_message")]
    pub message: String,
}

fn default_error_message() -> String {
    "Payment processing failed".to_string()
}

/// Common envelope of every PhonePe PG response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhonepeResponse {
    pub success: bool,
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl PhonepeResponse {
    pub fn payment_status(&self) -> PhonepePaymentStatus {
        PhonepePaymentStatus::from(self.code.as_str())
    }
}

impl TryFrom<&serde_json::Value> for PhonepeResponse {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value.clone())
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)
            .attach_printable("Unable to parse PhonepeResponse")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PhonepePaymentStatus {
    /// Pay request accepted; the customer still has to complete it
    Initiated,
    Charged,
    Pending,
    Failure,
    AuthenticationFailed,
    Unknown,
}

impl From<&str> for PhonepePaymentStatus {
    fn from(code: &str) -> Self {
        match code {
            "PAYMENT_INITIATED" => Self::Initiated,
            "PAYMENT_SUCCESS" => Self::Charged,
            "PAYMENT_PENDING" | "INTERNAL_SERVER_ERROR" => Self::Pending,
            "PAYMENT_ERROR" | "PAYMENT_DECLINED" | "TIMED_OUT" | "TRANSACTION_NOT_FOUND"
            | "BAD_REQUEST" | "400" => Self::Failure,
            "AUTHORIZATION_FAILED" | "401" => Self::AuthenticationFailed,
            _ => Self::Unknown,
        }
    }
}

/// Turns a non-2xx reply into an [`ErrorResponse`], keeping the gateway's code,
/// message and full body when the body is JSON.
pub fn build_error_response(res: &Response) -> ErrorResponse {
    let body = serde_json::from_slice::<serde_json::Value>(&res.response).ok();
    match res
        .response
        .parse_struct::<PhonepeErrorResponse>("PhonePe ErrorResponse")
    {
        Ok(error_response) => ErrorResponse {
            status_code: res.status_code,
            code: error_response.code,
            message: error_response.message,
            body,
        },
        Err(_) => {
            let raw_response = String::from_utf8_lossy(&res.response);
            ErrorResponse {
                status_code: res.status_code,
                code: consts::NO_ERROR_CODE.to_string(),
                message: if raw_response.trim().is_empty() {
                    consts::NO_ERROR_MESSAGE.to_string()
                } else {
                    raw_response.to_string()
                },
                body,
            }
        }
    }
}

pub mod constants;
pub mod headers;
pub mod transformers;

#[cfg(test)]
mod test;

use std::str::FromStr;

use error_stack::{report, ResultExt};
use hyperswitch_masking::{Maskable, PeekInterface, Secret};
use serde::Serialize;

use self::transformers::{
    self as phonepe, Environment, PhonepeAuthType, PhonepePaymentsRequest, SignedEnvelope,
};
use crate::{
    configs::PhonepeConnectorConfig,
    errors::{self, CustomResult},
    ext_traits::BytesExt,
    http_client::{HttpClient, HttpOptions},
    logger,
    request::{Method, Request, RequestBuilder},
    types::Response,
};

/// Maps an environment name to the gateway base url.
///
/// Accepts `SANDBOX`/`DEV`/`UAT` and `PRODUCTION`/`PROD` in any case.
pub fn resolve_base_url(environment: &str) -> CustomResult<&'static str, errors::ConnectorError> {
    Environment::from_str(environment.trim())
        .map(Environment::base_url)
        .change_context(errors::ConnectorError::InvalidEnvironment(
            environment.to_string(),
        ))
}

/// PhonePe PG v1 client.
///
/// Holds read-only credentials and a pooled HTTP client, so clones are cheap and
/// can be used from many tasks at once.
#[derive(Debug, Clone)]
pub struct Phonepe {
    auth: PhonepeAuthType,
    base_url: String,
    http_client: HttpClient,
}

impl Phonepe {
    pub fn new(
        auth: PhonepeAuthType,
        environment: Environment,
        http_options: &HttpOptions,
    ) -> CustomResult<Self, errors::ConnectorError> {
        Ok(Self {
            auth,
            base_url: environment.base_url().to_string(),
            http_client: HttpClient::new(http_options)?,
        })
    }

    pub fn from_config(
        config: &PhonepeConnectorConfig,
        http_options: &HttpOptions,
    ) -> CustomResult<Self, errors::ConnectorError> {
        config.validate()?;
        let auth = PhonepeAuthType::try_from(config)?;
        let base_url = config
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| config.environment.base_url().to_string());

        Ok(Self {
            auth,
            base_url,
            http_client: HttpClient::new(http_options)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_payment_request<T: Serialize>(
        &self,
        transaction: &T,
    ) -> CustomResult<SignedEnvelope, errors::ConnectorError> {
        SignedEnvelope::try_for_payment(&self.auth, transaction)
    }

    pub fn build_status_check_request(
        &self,
        merchant_transaction_id: &str,
    ) -> CustomResult<SignedEnvelope, errors::ConnectorError> {
        SignedEnvelope::try_for_status(&self.auth, merchant_transaction_id)
    }

    fn build_headers(&self, envelope: &SignedEnvelope) -> Vec<(String, Maskable<String>)> {
        vec![
            (
                headers::CONTENT_TYPE.to_string(),
                constants::APPLICATION_JSON.to_string().into(),
            ),
            (
                headers::ACCEPT.to_string(),
                constants::APPLICATION_JSON.to_string().into(),
            ),
            (
                headers::X_VERIFY.to_string(),
                Maskable::new_masked(Secret::new(envelope.checksum.clone())),
            ),
        ]
    }

    /// Builds the signed `POST {base_url}/pay` request without sending it
    pub fn get_payment_request<T: Serialize>(
        &self,
        transaction: &T,
    ) -> CustomResult<Request, errors::ConnectorError> {
        let envelope = self.build_payment_request(transaction)?;
        let body = serde_json::to_value(PhonepePaymentsRequest::from(&envelope))
            .change_context(errors::ConnectorError::RequestEncodingFailed)?;

        Ok(RequestBuilder::new()
            .method(Method::Post)
            .url(&format!("{}{}", self.base_url, constants::PAY_PATH))
            .headers(self.build_headers(&envelope))
            .set_body(body)
            .build())
    }

    /// Builds the signed `GET {base_url}/status/{merchantId}/{txnId}` request
    /// without sending it
    pub fn get_status_request(
        &self,
        merchant_transaction_id: &str,
    ) -> CustomResult<Request, errors::ConnectorError> {
        let envelope = self.build_status_check_request(merchant_transaction_id)?;
        let merchant_id = self.auth.merchant_id.peek();
        let mut request_headers = self.build_headers(&envelope);
        request_headers.push((
            headers::X_MERCHANT_ID.to_string(),
            merchant_id.to_string().into(),
        ));

        Ok(RequestBuilder::new()
            .method(Method::Get)
            .url(&format!(
                "{}{}/{merchant_id}/{merchant_transaction_id}",
                self.base_url,
                constants::STATUS_PATH,
            ))
            .headers(request_headers)
            .build())
    }

    /// Initiates a payment and returns the gateway's JSON reply untouched
    #[logger::instrument(skip_all, fields(connector = "phonepe"))]
    pub async fn create_transaction<T: Serialize>(
        &self,
        transaction: &T,
    ) -> CustomResult<serde_json::Value, errors::ConnectorError> {
        let request = self.get_payment_request(transaction)?;
        let response = self.http_client.execute(request).await?;
        self.handle_response(response)
    }

    /// Fetches the status of an earlier payment
    #[logger::instrument(skip(self), fields(connector = "phonepe"))]
    pub async fn verify_transaction(
        &self,
        merchant_transaction_id: &str,
    ) -> CustomResult<serde_json::Value, errors::ConnectorError> {
        let request = self.get_status_request(merchant_transaction_id)?;
        let response = self.http_client.execute(request).await?;
        self.handle_response(response)
    }

    pub fn handle_response(
        &self,
        res: Response,
    ) -> CustomResult<serde_json::Value, errors::ConnectorError> {
        if res.is_success() {
            return res
                .response
                .parse_struct::<serde_json::Value>("PhonePe Response");
        }

        let error_response = self.build_error_response(&res);
        logger::warn!(
            status_code = error_response.status_code,
            code = %error_response.code,
            "phonepe returned an error response"
        );
        Err(report!(errors::ConnectorError::FailedAtConnector(
            error_response
        )))
    }

    pub fn build_error_response(&self, res: &Response) -> errors::ErrorResponse {
        phonepe::build_error_response(res)
    }
}

impl TryFrom<&PhonepeConnectorConfig> for PhonepeAuthType {
    type Error = error_stack::Report<errors::ConnectorError>;

    fn try_from(config: &PhonepeConnectorConfig) -> Result<Self, Self::Error> {
        Self::new(
            config.merchant_id.peek().clone(),
            config.salt_key.peek().clone(),
            config.key_index,
        )
    }
}

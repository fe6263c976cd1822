use std::time::{Duration, Instant};

use error_stack::{report, ResultExt};
use serde::Deserialize;

use crate::{
    errors::{ConnectorError, CustomResult},
    request::{Method, Request},
    types::Response,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    #[serde(default)]
    pub bypass_urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpOptions {
    pub total_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub keep_alive_timeout_ms: u64,
    pub proxy: Option<ProxyConfig>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            total_timeout_ms: 45_000,
            connect_timeout_ms: 10_000,
            keep_alive_timeout_ms: 60_000,
            proxy: None,
        }
    }
}

/// Thin wrapper over a pooled `reqwest::Client`; cheap to clone
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(options: &HttpOptions) -> CustomResult<Self, ConnectorError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(options.connect_timeout_ms))
            .timeout(Duration::from_millis(options.total_timeout_ms))
            .pool_idle_timeout(Duration::from_millis(options.keep_alive_timeout_ms))
            .redirect(reqwest::redirect::Policy::none());

        if let Some(proxy_config) = &options.proxy {
            if let Some(proxy_url) = proxy_config
                .https_url
                .as_ref()
                .or(proxy_config.http_url.as_ref())
            {
                let mut proxy = reqwest::Proxy::all(proxy_url)
                    .change_context(ConnectorError::InvalidConfigValue {
                        field_name: "http.proxy",
                        reason: "proxy url could not be parsed".to_string(),
                    })
                    .attach_printable_lazy(|| format!("proxy url: {proxy_url}"))?;
                if !proxy_config.bypass_urls.is_empty() {
                    proxy = proxy.no_proxy(reqwest::NoProxy::from_string(
                        &proxy_config.bypass_urls.join(","),
                    ));
                }
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .change_context(ConnectorError::ConfigurationFailed)
            .attach_printable("Failed to construct HTTP client")?;

        Ok(Self { client })
    }

    /// Sends the request and buffers the whole response body.
    ///
    /// Non-2xx responses are returned as `Ok`; interpreting them is up to the
    /// connector.
    pub async fn execute(&self, request: Request) -> CustomResult<Response, ConnectorError> {
        let start_time = Instant::now();
        let url = reqwest::Url::parse(&request.url)
            .change_context(ConnectorError::RequestNotSent)
            .attach_printable_lazy(|| format!("invalid url: {}", request.url))?;

        let mut req_builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };

        for (key, value) in request.get_headers_map() {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.get_body_bytes());
        }

        let response = req_builder.send().await.map_err(|error| {
            let reason = if error.is_timeout() {
                "request timed out"
            } else if error.is_connect() {
                "connection failed"
            } else {
                "request failed"
            };
            report!(ConnectorError::RequestNotSent)
                .attach_printable(format!("{reason}: {error}"))
        })?;

        let status_code = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .change_context(ConnectorError::ResponseDeserializationFailed)
            .attach_printable("Failed to read response body")?;

        tracing::info!(
            method = %request.method,
            url = %request.url,
            status_code,
            latency_ms = start_time.elapsed().as_millis() as u64,
            "connector request completed"
        );

        Ok(Response {
            headers: Some(headers),
            response: body,
            status_code,
        })
    }
}

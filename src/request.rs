use hyperswitch_masking::{Maskable, PeekInterface};
use serde::{Deserialize, Serialize};

pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug)]
pub struct Request {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

#[derive(Serialize)]
pub enum RequestContent {
    Json(serde_json::Value),
    RawBytes(Vec<u8>),
}

impl std::fmt::Debug for RequestContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json(_) => "JsonRequestBody",
            Self::RawBytes(_) => "RawBytesRequestBody",
        })
    }
}

impl RequestContent {
    pub fn get_body_bytes(&self) -> Vec<u8> {
        match self {
            Self::Json(value) => value.to_string().into_bytes(),
            Self::RawBytes(bytes) => bytes.clone(),
        }
    }
}

impl Request {
    /// Header map with secrets exposed, for handing to the transport
    pub fn get_headers_map(&self) -> std::collections::HashMap<String, String> {
        self.headers
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Maskable::Masked(secret) => secret.peek().to_string(),
                    Maskable::Normal(value) => value.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }

    pub fn get_header(&self, name: &str) -> Option<&Maskable<String>> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}

#[derive(Debug)]
pub struct RequestBuilder {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::with_capacity(1024),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, header: &str, value: &str) -> Self {
        self.headers
            .insert((header.into(), value.to_string().into()));
        self
    }

    pub fn headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn set_body<T: Into<RequestContent>>(mut self, body: T) -> Self {
        self.body.replace(body.into());
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<serde_json::Value> for RequestContent {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

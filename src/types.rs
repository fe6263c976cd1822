//! Types shared between the request builder and the transport

use serde::{Deserialize, Serialize};

/// Amount in the smallest currency unit (paise for INR)
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MinorUnit(i64);

impl MinorUnit {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get_amount_as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for MinorUnit {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw HTTP response as received from the gateway
#[derive(Clone, Debug)]
pub struct Response {
    pub headers: Option<reqwest::header::HeaderMap>,
    pub response: bytes::Bytes,
    pub status_code: u16,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

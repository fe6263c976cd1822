//! PhonePe payment gateway connector
//!
//! Builds signed pay / status requests for the PhonePe PG v1 API and sends them
//! over `reqwest`. The gateway response body is handed back to the caller as-is.

pub mod configs;
pub mod connectors;
pub mod consts;
pub mod crypto;
pub mod errors;
pub mod ext_traits;
pub mod http_client;
pub mod logger;
pub mod request;
pub mod types;

pub use connectors::phonepe::{
    resolve_base_url,
    transformers::{
        PhonepeAuthType, PhonepePaymentInstrument, PhonepeTransactionData, SignedEnvelope,
    },
    Phonepe,
};
pub use errors::{ConnectorError, CustomResult, ErrorKind, ErrorResponse};

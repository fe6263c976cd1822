//! Constants for PhonePe connector

// ===== API ENDPOINTS =====
// Paths as signed in the X-VERIFY checksum.
pub const API_PAY_ENDPOINT: &str = "/pg/v1/pay";
pub const API_STATUS_ENDPOINT: &str = "/pg/v1/status";

// Paths appended to the base url, which already ends in `/pg/v1`.
pub const PAY_PATH: &str = "/pay";
pub const STATUS_PATH: &str = "/status";

// ===== PAYMENT INSTRUMENT TYPES =====
pub const PAY_PAGE: &str = "PAY_PAGE";
pub const UPI_INTENT: &str = "UPI_INTENT";
pub const UPI_COLLECT: &str = "UPI_COLLECT";
pub const UPI_QR: &str = "UPI_QR";

// ===== DEFAULT VALUES =====
pub const DEFAULT_KEY_INDEX: u32 = 1;

/// Longest merchant transaction id the gateway accepts
pub const MAX_TRANSACTION_ID_LENGTH: usize = 35;

// ===== CHECKSUM =====
pub const CHECKSUM_SEPARATOR: &str = "###";

// ===== CONTENT TYPES =====
pub const APPLICATION_JSON: &str = "application/json";

// ===== PAYLOAD FIELDS =====
pub const MERCHANT_ID_FIELD: &str = "merchantId";

// ===== BASE URLS =====
pub const PRODUCTION_BASE_URL: &str = "https://api.phonepe.com/apis/hermes/pg/v1";
pub const SANDBOX_BASE_URL: &str = "https://api-preprod.phonepe.com/apis/pg-sandbox/pg/v1";

//! Tencent Cloud `RecognizeTableAccurateOCR` backend.
//!
//! Requests are signed with the TC3-HMAC-SHA256 scheme. Credentials and
//! region arrive pre-resolved from the caller; this module holds no
//! configuration logic of its own.

use chrono::DateTime;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::recognizer::{OcrError, TableRecognizer};
use crate::types::{RecognizeRequest, RecognizeResponse};

const HOST: &str = "ocr.tencentcloudapi.com";
const SERVICE: &str = "ocr";
const ACTION: &str = "RecognizeTableAccurateOCR";
const API_VERSION: &str = "2018-11-19";
const ALGORITHM: &str = "TC3-HMAC-SHA256";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host";
/// Language hint fixed by the product: the recognizer is tuned for
/// Chinese-language tables.
const TABLE_LANGUAGE: &str = "zh";

#[derive(Debug, Clone)]
pub struct TencentCredentials {
    pub secret_id: String,
    pub secret_key: String,
    pub region: String,
}

pub struct TencentRecognizer {
    credentials: TencentCredentials,
    http: reqwest::Client,
}

impl TencentRecognizer {
    pub fn new(credentials: TencentCredentials) -> Self {
        TencentRecognizer { credentials, http: reqwest::Client::new() }
    }
}

/// Service responses wrap the payload (or an error object) in `Response`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(rename = "Error")]
    error: Option<ApiError>,
    #[serde(flatten)]
    payload: RecognizeResponse,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

impl TableRecognizer for TencentRecognizer {
    async fn recognize(&self, image_base64: &str) -> Result<RecognizeResponse, OcrError> {
        let request = RecognizeRequest {
            image_base64: image_base64.to_string(),
            table_language: TABLE_LANGUAGE.to_string(),
            enable_detect_text: true,
        };
        let body = serde_json::to_string(&request)
            .map_err(|e| OcrError::Encoding(e.to_string()))?;

        let timestamp = chrono::Utc::now().timestamp();
        let authorization = build_authorization(
            &self.credentials.secret_id,
            &self.credentials.secret_key,
            timestamp,
            &body,
        );

        let response = self
            .http
            .post(format!("https://{HOST}/"))
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("X-TC-Action", ACTION)
            .header("X-TC-Version", API_VERSION)
            .header("X-TC-Region", &self.credentials.region)
            .header("X-TC-Timestamp", timestamp.to_string())
            .body(body)
            .send()
            .await
            .map_err(|e| OcrError::Gateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OcrError::Gateway(format!("HTTP status {status}")));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| OcrError::Gateway(format!("malformed response: {e}")))?;

        if let Some(err) = envelope.response.error {
            return Err(OcrError::Gateway(format!("{}: {}", err.code, err.message)));
        }
        Ok(envelope.response.payload)
    }
}

/// Build the TC3-HMAC-SHA256 `Authorization` header for a request body.
fn build_authorization(secret_id: &str, secret_key: &str, timestamp: i64, body: &str) -> String {
    let date = DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string();

    let canonical_request = format!(
        "POST\n/\n\ncontent-type:{CONTENT_TYPE}\nhost:{HOST}\n\n{SIGNED_HEADERS}\n{}",
        sha256_hex(body.as_bytes())
    );

    let credential_scope = format!("{date}/{SERVICE}/tc3_request");
    let string_to_sign = format!(
        "{ALGORITHM}\n{timestamp}\n{credential_scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    let secret_date = hmac_sha256(format!("TC3{secret_key}").as_bytes(), date.as_bytes());
    let secret_service = hmac_sha256(&secret_date, SERVICE.as_bytes());
    let secret_signing = hmac_sha256(&secret_service, b"tc3_request");
    let signature = to_hex(&hmac_sha256(&secret_signing, string_to_sign.as_bytes()));

    format!(
        "{ALGORITHM} Credential={secret_id}/{credential_scope}, \
         SignedHeaders={SIGNED_HEADERS}, Signature={signature}"
    )
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    to_hex(&hasher.finalize())
}

fn hmac_sha256(key: &[u8], msg: &[u8]) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(msg);
    mac.finalize().into_bytes().to_vec()
}

/// Encode bytes as a lowercase hex string.
fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

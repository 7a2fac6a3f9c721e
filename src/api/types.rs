//! Wire types for the sora2api admin endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One managed token as returned by `GET /api/tokens`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Stable identifier, unique within the backend
    pub id: i64,

    /// Account email, used for display and as the sort tie-breaker
    #[serde(default)]
    pub email: String,

    /// Whether the token participates in request routing
    #[serde(default)]
    pub is_active: bool,

    /// Last observed HTTP-style status code; `None` means healthy/unknown
    #[serde(default)]
    pub status_code: Option<u16>,

    /// Remaining sora2 generations; `None` when the plan does not track quota
    #[serde(default)]
    pub sora2_remaining_count: Option<i64>,

    /// Whether the account supports the sora2 tier
    #[serde(default)]
    pub sora2_supported: bool,

    #[serde(default)]
    pub image_enabled: bool,

    #[serde(default)]
    pub video_enabled: bool,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub expiry_time: Option<String>,

    #[serde(default)]
    pub plan_type: Option<String>,

    #[serde(default)]
    pub remark: Option<String>,

    /// Usage counters, display-only
    #[serde(default)]
    pub image_count: Option<i64>,

    #[serde(default)]
    pub video_count: Option<i64>,

    #[serde(default)]
    pub error_count: Option<i64>,
}

/// Response of `POST /api/tokens/{id}/test`
///
/// The backend is inconsistent about `status_code`: depending on the failure
/// path it is a number, a numeric string, or absent with the code only
/// embedded in `message`.
#[derive(Debug, Clone, Deserialize)]
pub struct TestResponse {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub status_code: Option<StatusCodeField>,
}

/// `status_code` as the backend actually sends it
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StatusCodeField {
    Number(i64),
    Text(String),
}

impl TestResponse {
    /// Logical test success, independent of the transport-level `success` flag
    pub fn is_logical_success(&self) -> bool {
        self.status == "success"
    }

    /// Whether this response counts as a success in the batch tally
    pub fn counts_as_success(&self) -> bool {
        self.success && self.is_logical_success()
    }

    /// Extract the status code with the documented preference order:
    /// numeric field, then purely-numeric 3-digit string field, then the
    /// first standalone 3-digit run in `message`.
    pub fn extracted_status_code(&self) -> Option<u16> {
        let from_field = match &self.status_code {
            Some(StatusCodeField::Number(n)) if *n > 0 => u16::try_from(*n).ok(),
            Some(StatusCodeField::Text(s))
                if s.len() == 3 && s.bytes().all(|b| b.is_ascii_digit()) =>
            {
                s.parse().ok()
            }
            _ => None,
        };

        from_field.or_else(|| scan_status_code(self.message.as_deref().unwrap_or_default()))
    }
}

/// Find the first standalone 3-digit run in a free-text message
///
/// "Standalone" means the run is exactly three digits long and not adjacent
/// to another word character, so "upstream 503 error" yields 503 while
/// "id 1234" and "abc503" yield nothing.
pub fn scan_status_code(message: &str) -> Option<u16> {
    let bytes = message.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let bounded_left = start == 0 || !is_word(bytes[start - 1]);
            let bounded_right = i == bytes.len() || !is_word(bytes[i]);
            if i - start == 3 && bounded_left && bounded_right {
                return message[start..i].parse().ok();
            }
        } else {
            i += 1;
        }
    }
    None
}

/// Response of `POST /api/tokens/{id}/enable` and `/disable`
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleResponse {
    #[serde(default)]
    pub success: bool,
}

/// Response of `DELETE /api/tokens/problematic/cleanup`
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupResponse {
    #[serde(default)]
    pub success: bool,

    /// Number of tokens the backend deleted
    #[serde(default)]
    pub deleted: Option<u64>,

    /// Failure detail: a plain string or a list of structured error entries
    #[serde(default)]
    pub detail: Option<Value>,

    #[serde(default)]
    pub message: Option<String>,
}

impl CleanupResponse {
    /// Human-readable failure message, with the documented fallback order:
    /// string detail, joined entry messages, generic message, "unknown error"
    pub fn failure_detail(&self) -> String {
        match &self.detail {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(entries)) => entries
                .iter()
                .map(|entry| {
                    entry
                        .get("msg")
                        .and_then(Value::as_str)
                        .or_else(|| entry.get("detail").and_then(Value::as_str))
                        .map(str::to_string)
                        .unwrap_or_else(|| entry.to_string())
                })
                .collect::<Vec<_>>()
                .join("; "),
            _ => self
                .message
                .clone()
                .unwrap_or_else(|| "unknown error".to_string()),
        }
    }
}

//! Status cell formatting
//!
//! The renderer is constructed with a [`StatusFormatter`] so deployments can
//! restyle the table without touching the render loop; the default covers
//! everything the stock admin page showed.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::api::types::TokenRecord;

/// Formatting strategy for the per-token status cells
pub trait StatusFormatter {
    /// Activation state cell ("enabled" / "disabled")
    fn activation(&self, token: &TokenRecord) -> String;

    /// Health cell: last observed status code, or "healthy"
    fn health(&self, token: &TokenRecord) -> String;

    /// Remaining-quota cell; "-" when the plan does not track quota
    fn remaining(&self, token: &TokenRecord) -> String;

    /// Expiry cell, flagging timestamps already in the past
    fn expiry(&self, token: &TokenRecord) -> String;
}

/// Default formatter, guaranteed fallback when no override is injected
pub struct DefaultStatusFormatter;

impl StatusFormatter for DefaultStatusFormatter {
    fn activation(&self, token: &TokenRecord) -> String {
        if token.is_active { "enabled" } else { "disabled" }.to_string()
    }

    fn health(&self, token: &TokenRecord) -> String {
        match token.status_code {
            Some(code) => code.to_string(),
            None => "healthy".to_string(),
        }
    }

    fn remaining(&self, token: &TokenRecord) -> String {
        match token.sora2_remaining_count {
            Some(n) => n.to_string(),
            None => "-".to_string(),
        }
    }

    fn expiry(&self, token: &TokenRecord) -> String {
        let Some(raw) = token.expiry_time.as_deref() else {
            return "-".to_string();
        };
        match parse_expiry(raw) {
            Some(at) if at < Utc::now() => format!("{} (expired)", raw),
            _ => raw.to_string(),
        }
    }
}

/// Parse the backend's expiry timestamp, RFC3339 or bare "Y-m-d H:M:S" (UTC)
fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_and_health_cells() {
        let f = DefaultStatusFormatter;
        let mut t = TokenRecord {
            is_active: true,
            ..TokenRecord::default()
        };
        assert_eq!(f.activation(&t), "enabled");
        assert_eq!(f.health(&t), "healthy");

        t.is_active = false;
        t.status_code = Some(429);
        assert_eq!(f.activation(&t), "disabled");
        assert_eq!(f.health(&t), "429");
    }

    #[test]
    fn test_remaining_cell() {
        let f = DefaultStatusFormatter;
        let mut t = TokenRecord::default();
        assert_eq!(f.remaining(&t), "-");
        t.sora2_remaining_count = Some(0);
        assert_eq!(f.remaining(&t), "0");
    }

    #[test]
    fn test_expiry_cell_flags_past_timestamps() {
        let f = DefaultStatusFormatter;
        let mut t = TokenRecord::default();
        assert_eq!(f.expiry(&t), "-");

        t.expiry_time = Some("2000-01-01T00:00:00Z".to_string());
        assert_eq!(f.expiry(&t), "2000-01-01T00:00:00Z (expired)");

        t.expiry_time = Some("2099-01-01 00:00:00".to_string());
        assert_eq!(f.expiry(&t), "2099-01-01 00:00:00");

        // Unparseable values are shown as-is
        t.expiry_time = Some("soon".to_string());
        assert_eq!(f.expiry(&t), "soon");
    }
}

//! Error classification — maps arbitrary failure values onto a consistent
//! shape so callers can react deterministically (show a quota banner, suggest
//! checking the connection, or fall back to a generic message).

use serde::Serialize;
use serde_json::Value;

/// Fixed message used whenever a failure carries an explicit 429 status.
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "API quota exceeded. Please check your plan and billing details, or try again later.";

const QUOTA_INDICATORS: &[&str] = &["429", "quota", "rate limit"];
const NETWORK_INDICATORS: &[&str] = &["network", "fetch", "connection", "timeout"];

/// Classified outcome of an arbitrary failure. The flags are independent:
/// both may be set when a message matches both indicator sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub message: String,
    pub is_quota_error: bool,
    pub is_network_error: bool,
}

/// Opaque failure value handed to [`classify`].
///
/// `Error` carries a Rust error value whose display text is sniffed for
/// quota/network indicators. `Payload` carries a structured value (typically
/// a decoded error body) probed for an explicit status code or a plain
/// `message` field. `Opaque` is anything unusable.
#[derive(Debug, Clone, Copy)]
pub enum Failure<'a> {
    Error(&'a (dyn std::error::Error + 'static)),
    Payload(&'a Value),
    Opaque,
}

/// Classifies a failure value. Total — never fails, always yields a message.
///
/// Precedence: an explicit `status`/`statusCode` of 429 in a payload wins
/// outright with a fixed message; error display text is sniffed
/// (case-insensitive, substring) for quota and network indicators
/// independently; a payload with a string `message` field passes it through
/// verbatim with both flags false; everything else falls back.
pub fn classify(failure: Failure<'_>, fallback: &str) -> Classification {
    match failure {
        Failure::Error(err) => {
            let message = err.to_string();
            let lowered = message.to_lowercase();
            Classification {
                is_quota_error: QUOTA_INDICATORS.iter().any(|n| lowered.contains(n)),
                is_network_error: NETWORK_INDICATORS.iter().any(|n| lowered.contains(n)),
                message,
            }
        }
        Failure::Payload(value) => {
            if status_code(value) == Some(429) {
                return Classification {
                    message: QUOTA_EXCEEDED_MESSAGE.to_string(),
                    is_quota_error: true,
                    is_network_error: false,
                };
            }
            match value.get("message").and_then(Value::as_str) {
                Some(message) => Classification {
                    message: message.to_string(),
                    is_quota_error: false,
                    is_network_error: false,
                },
                None => fallback_classification(fallback),
            }
        }
        Failure::Opaque => fallback_classification(fallback),
    }
}

fn fallback_classification(fallback: &str) -> Classification {
    Classification {
        message: fallback.to_string(),
        is_quota_error: false,
        is_network_error: false,
    }
}

fn status_code(value: &Value) -> Option<u64> {
    value
        .get("status")
        .or_else(|| value.get("statusCode"))
        .and_then(Value::as_u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FALLBACK: &str = "Something went wrong. Please try again later.";

    fn classify_text(message: &str) -> Classification {
        let err = anyhow::anyhow!("{message}");
        classify(Failure::Error(err.as_ref()), FALLBACK)
    }

    #[test]
    fn test_explicit_status_429_wins_over_message() {
        let payload = json!({"status": 429, "message": "totally fine"});
        let c = classify(Failure::Payload(&payload), FALLBACK);
        assert!(c.is_quota_error);
        assert!(!c.is_network_error);
        assert_eq!(c.message, QUOTA_EXCEEDED_MESSAGE);
    }

    #[test]
    fn test_status_code_field_spelling_also_matches() {
        let payload = json!({"statusCode": 429});
        let c = classify(Failure::Payload(&payload), FALLBACK);
        assert!(c.is_quota_error);
        assert_eq!(c.message, QUOTA_EXCEEDED_MESSAGE);
    }

    #[test]
    fn test_non_429_status_is_not_quota() {
        let payload = json!({"status": 500, "message": "boom"});
        let c = classify(Failure::Payload(&payload), FALLBACK);
        assert!(!c.is_quota_error);
        assert_eq!(c.message, "boom");
    }

    #[test]
    fn test_quota_text_sets_quota_flag_only() {
        let c = classify_text("Error: quota exceeded");
        assert!(c.is_quota_error);
        assert!(!c.is_network_error);
        assert_eq!(c.message, "Error: quota exceeded");
    }

    #[test]
    fn test_rate_limit_text_is_case_insensitive() {
        let c = classify_text("Rate Limit reached, slow down");
        assert!(c.is_quota_error);
    }

    #[test]
    fn test_network_text_sets_network_flag_only() {
        let c = classify_text("Network request failed");
        assert!(c.is_network_error);
        assert!(!c.is_quota_error);
    }

    #[test]
    fn test_connection_and_timeout_indicators() {
        assert!(classify_text("connection refused by peer").is_network_error);
        assert!(classify_text("operation hit the read timeout").is_network_error);
        assert!(classify_text("failed to fetch upstream").is_network_error);
    }

    #[test]
    fn test_both_flags_when_both_indicator_sets_match() {
        let c = classify_text("429 returned while fetch was in flight");
        assert!(c.is_quota_error);
        assert!(c.is_network_error);
    }

    #[test]
    fn test_plain_payload_message_passes_through_verbatim() {
        let payload = json!({"message": "Quota exceeded"});
        let c = classify(Failure::Payload(&payload), FALLBACK);
        // A bare payload message is never sniffed — flags stay false.
        assert_eq!(c.message, "Quota exceeded");
        assert!(!c.is_quota_error);
        assert!(!c.is_network_error);
    }

    #[test]
    fn test_payload_without_message_falls_back() {
        let payload = json!({"code": "whatever"});
        let c = classify(Failure::Payload(&payload), FALLBACK);
        assert_eq!(c.message, FALLBACK);
        assert!(!c.is_quota_error);
        assert!(!c.is_network_error);
    }

    #[test]
    fn test_opaque_failure_falls_back() {
        let c = classify(Failure::Opaque, FALLBACK);
        assert_eq!(c.message, FALLBACK);
        assert!(!c.is_quota_error);
        assert!(!c.is_network_error);
    }

    #[test]
    fn test_non_numeric_status_is_ignored() {
        let payload = json!({"status": "429", "message": "stringly typed"});
        let c = classify(Failure::Payload(&payload), FALLBACK);
        assert!(!c.is_quota_error);
        assert_eq!(c.message, "stringly typed");
    }
}

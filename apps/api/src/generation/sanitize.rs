//! Response sanitizer — recovers a structured question/answer list from raw,
//! loosely-formatted model output.
//!
//! The raw text is untrusted: models wrap arrays in code fences, prepend
//! labels, or trail commentary. Recovery is purely syntactic here; the typed
//! layer below decides what a well-formed element looks like.

use serde_json::Value;
use tracing::warn;

use crate::errors::AppError;
use crate::models::interview::QaPair;

/// Number of question/answer pairs the generation prompt asks for.
pub const EXPECTED_QUESTION_COUNT: usize = 5;

/// Extracts the first-to-last bracketed span from raw model output and parses
/// it as a JSON array.
///
/// Steps: trim → strip wrapper fence noise (prefix/suffix only — content
/// inside the array is never touched) → isolate `[` .. `]` (greedy,
/// multi-line) → parse. Fails with `AppError::Parse` when no array is found
/// or the span is not valid JSON.
pub fn sanitize_json_array(raw: &str) -> Result<Vec<Value>, AppError> {
    let stripped = strip_wrapper_noise(raw);

    let isolated = match (stripped.find('['), stripped.rfind(']')) {
        (Some(start), Some(end)) if start < end => &stripped[start..=end],
        _ => return Err(AppError::Parse("no array found in response".to_string())),
    };

    serde_json::from_str::<Vec<Value>>(isolated)
        .map_err(|e| AppError::Parse(format!("invalid JSON array: {e}")))
}

/// Converts sanitized array elements into typed pairs.
///
/// A malformed element (missing or non-string `question`/`answer`) is a
/// `Parse` failure. A count other than [`EXPECTED_QUESTION_COUNT`] is
/// accepted with a warning — the model occasionally under- or over-delivers
/// and the result is still usable.
pub fn qa_pairs_from_values(values: Vec<Value>) -> Result<Vec<QaPair>, AppError> {
    if values.len() != EXPECTED_QUESTION_COUNT {
        warn!(
            "model returned {} question/answer pairs (asked for {})",
            values.len(),
            EXPECTED_QUESTION_COUNT
        );
    }

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<QaPair>(value)
                .map_err(|e| AppError::Parse(format!("question {} is malformed: {e}", index + 1)))
        })
        .collect()
}

/// Strips ``` / ```json fences and stray `json` labels from the outside of
/// the text. Repeats until stable so stacked noise ("```json" then a bare
/// label line) also comes off.
fn strip_wrapper_noise(text: &str) -> &str {
    let mut stripped = text.trim();
    loop {
        let before = stripped;
        for token in ["```json", "```", "`", "json"] {
            if let Some(rest) = stripped.strip_prefix(token) {
                stripped = rest.trim_start();
            }
        }
        for token in ["```", "`"] {
            if let Some(rest) = stripped.strip_suffix(token) {
                stripped = rest.trim_end();
            }
        }
        if before == stripped {
            return stripped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_fenced_json_array() {
        let raw = "```json\n[{\"question\":\"Q1\",\"answer\":\"A1\"}]\n```";
        let values = sanitize_json_array(raw).unwrap();
        let pairs = qa_pairs_from_values(values).unwrap();
        assert_eq!(
            pairs,
            vec![QaPair {
                question: "Q1".to_string(),
                answer: "A1".to_string()
            }]
        );
    }

    #[test]
    fn test_sanitize_fence_without_language_tag() {
        let raw = "```\n[{\"question\":\"Q\",\"answer\":\"A\"}]\n```";
        assert_eq!(sanitize_json_array(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_sanitize_bare_array() {
        let raw = "[{\"question\":\"Q\",\"answer\":\"A\"}]";
        assert_eq!(sanitize_json_array(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_sanitize_array_embedded_in_commentary() {
        let raw = "Here are your questions:\n[{\"question\":\"Q\",\"answer\":\"A\"}]\nGood luck!";
        assert_eq!(sanitize_json_array(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_sanitize_preserves_content_inside_the_array() {
        // Backticks and brackets inside answers must survive noise stripping.
        let raw = "```json\n[{\"question\":\"Q\",\"answer\":\"use `Vec` for lists [1,2,3]\"}]\n```";
        let pairs = qa_pairs_from_values(sanitize_json_array(raw).unwrap()).unwrap();
        assert_eq!(pairs[0].answer, "use `Vec` for lists [1,2,3]");
    }

    #[test]
    fn test_sanitize_no_brackets_fails_with_parse_error() {
        let err = sanitize_json_array("no brackets here").unwrap_err();
        match err {
            AppError::Parse(msg) => assert!(msg.contains("no array found")),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_sanitize_unclosed_array_fails() {
        assert!(matches!(
            sanitize_json_array("[{\"question\":\"Q\""),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_sanitize_invalid_json_carries_parser_message() {
        let err = sanitize_json_array("[{\"question\": }]").unwrap_err();
        match err {
            AppError::Parse(msg) => assert!(msg.contains("invalid JSON array")),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_multiline_array_spans_greedily() {
        let raw = "[\n  {\"question\": \"Q1\", \"answer\": \"A1\"},\n  {\"question\": \"Q2\", \"answer\": \"A2\"}\n]";
        assert_eq!(sanitize_json_array(raw).unwrap().len(), 2);
    }

    #[test]
    fn test_qa_pairs_missing_answer_is_parse_error() {
        let values = vec![serde_json::json!({"question": "Q"})];
        assert!(matches!(
            qa_pairs_from_values(values),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_qa_pairs_non_object_element_is_parse_error() {
        let values = vec![serde_json::json!("just a string")];
        assert!(matches!(
            qa_pairs_from_values(values),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_qa_pairs_count_mismatch_is_accepted() {
        let values = vec![
            serde_json::json!({"question": "Q1", "answer": "A1"}),
            serde_json::json!({"question": "Q2", "answer": "A2"}),
        ];
        let pairs = qa_pairs_from_values(values).unwrap();
        assert_eq!(pairs.len(), 2);
    }
}

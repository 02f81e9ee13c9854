/// ATS Client — the single point of entry for resume-to-job-description
/// scoring. Wraps the remote matching service's HTTP contract: multipart
/// upload in, content-negotiated JSON out.
///
/// Response handling branches on the declared `content-type` BEFORE touching
/// the body, so an HTML error page never reaches the JSON parser.
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::classify::{classify, Failure};
use crate::errors::AppError;

pub mod handlers;

const MATCH_RESUME_PATH: &str = "/match_resume";
const PDF_CONTENT_TYPE: &str = "application/pdf";
/// Soft client-side cap — enforced before any upload begins.
const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
/// Preview budget for non-JSON error pages.
const ERROR_PREVIEW_CHARS: usize = 200;
/// Preview budget for unexpected success bodies.
const BODY_PREVIEW_CHARS: usize = 100;

/// Match result returned by the scoring service. Transient — never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsMatchResult {
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub matching_skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AtsErrorResponse {
    error: String,
}

/// A resume file as received from the upload surface.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    /// Declared media type — must be exactly the PDF type.
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Clone)]
pub struct AtsClient {
    http: Client,
    base_url: Option<String>,
}

impl AtsClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
        }
    }

    /// Scores a resume against a job description.
    ///
    /// Pre-flight validation fails fast — no request is issued for a bad
    /// file, an empty description, or a missing base URL.
    pub async fn match_resume(
        &self,
        resume: ResumeUpload,
        job_description: &str,
    ) -> Result<AtsMatchResult, AppError> {
        validate_request(&resume, job_description)?;

        let base = self.base_url.as_deref().ok_or_else(|| {
            AppError::Validation(
                "ATS base URL is not configured. Set ATS_BASE_URL to enable resume matching."
                    .to_string(),
            )
        })?;

        let resume_part = multipart::Part::bytes(resume.bytes.to_vec())
            .file_name(resume.file_name)
            .mime_str(&resume.content_type)
            .map_err(|e| AppError::Validation(format!("invalid resume media type: {e}")))?;
        let form = multipart::Form::new()
            .part("resume", resume_part)
            .text("job_description", job_description.trim().to_string());

        let response = match self
            .http
            .post(format!("{base}{MATCH_RESUME_PATH}"))
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Err(transport_error(e)),
        };

        let status = response.status().as_u16();
        // Read the declared content type before touching the body.
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return Err(transport_error(e)),
        };

        debug!("ATS match response: status={status}, content-type={content_type}");
        interpret_match_response(status, &content_type, &body)
    }
}

fn validate_request(resume: &ResumeUpload, job_description: &str) -> Result<(), AppError> {
    if resume.bytes.is_empty() {
        return Err(AppError::Validation("Resume file is required".to_string()));
    }
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description is required".to_string(),
        ));
    }
    if resume.content_type != PDF_CONTENT_TYPE {
        return Err(AppError::Validation(
            "Only PDF files are supported".to_string(),
        ));
    }
    if resume.bytes.len() > MAX_RESUME_BYTES {
        return Err(AppError::Validation(
            "Resume file must be 5MB or smaller".to_string(),
        ));
    }
    Ok(())
}

/// Maps a transport-level failure: connectivity failures become `Network`,
/// everything else propagates unchanged.
fn transport_error(e: reqwest::Error) -> AppError {
    let classification = classify(Failure::Error(&e), "resume match request failed");
    if classification.is_network_error || e.is_connect() || e.is_timeout() {
        AppError::Network(classification.message)
    } else {
        AppError::Internal(e.into())
    }
}

/// Interprets a completed HTTP exchange. Pure so every branch of the content
/// negotiation is testable without a live server.
fn interpret_match_response(
    status: u16,
    content_type: &str,
    body: &[u8],
) -> Result<AtsMatchResult, AppError> {
    let success = (200..300).contains(&status);
    let is_json = content_type
        .to_ascii_lowercase()
        .contains("application/json");

    if !success {
        if is_json {
            return match serde_json::from_slice::<AtsErrorResponse>(body) {
                Ok(error_body) if !error_body.error.trim().is_empty() => {
                    Err(AppError::Application(error_body.error))
                }
                Ok(_) => Err(AppError::Application(format!("HTTP error {status}"))),
                Err(_) => Err(AppError::Server {
                    status,
                    message: "invalid JSON in error response".to_string(),
                }),
            };
        }
        // HTML or plain-text error page — never parsed as JSON.
        return Err(AppError::Server {
            status,
            message: format!(
                "server returned an error page: {}",
                body_preview(body, ERROR_PREVIEW_CHARS)
            ),
        });
    }

    if !is_json {
        return Err(AppError::Server {
            status,
            message: format!(
                "unexpected content-type `{content_type}`; body: {}",
                body_preview(body, BODY_PREVIEW_CHARS)
            ),
        });
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| AppError::Server {
        status,
        message: format!("invalid JSON: {e}"),
    })?;

    let score_is_finite = value
        .get("score")
        .and_then(Value::as_f64)
        .is_some_and(f64::is_finite);
    if !score_is_finite {
        return Err(AppError::Application(
            "missing or invalid score field".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| AppError::Server {
        status,
        message: format!("malformed match result: {e}"),
    })
}

/// Lossy, whitespace-collapsed body excerpt bounded to `limit` characters.
fn body_preview(body: &[u8], limit: usize) -> String {
    let text = String::from_utf8_lossy(body);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(limit).collect()
}

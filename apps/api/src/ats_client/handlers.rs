//! Axum route handler for resume matching.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::ats_client::{AtsMatchResult, ResumeUpload};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/ats/match
///
/// Accepts the UI's multipart form (`resume` + `job_description`) and relays
/// it to the scoring service. The result is transient — nothing is stored.
pub async fn handle_match_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AtsMatchResult>, AppError> {
    let mut resume: Option<ResumeUpload> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read resume: {e}")))?;
                resume = Some(ResumeUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some("job_description") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("failed to read job description: {e}"))
                })?;
                job_description = Some(text);
            }
            // Unknown fields are ignored.
            _ => {}
        }
    }

    let resume = resume
        .ok_or_else(|| AppError::Validation("Resume file is required".to_string()))?;
    let job_description = job_description
        .ok_or_else(|| AppError::Validation("Job description is required".to_string()))?;

    let result = state.ats.match_resume(resume, &job_description).await?;
    Ok(Json(result))
}

//! Axum route handlers for the practice flow: recording answers and reading
//! per-interview feedback.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::aggregate::round_to_tenth;
use crate::errors::AppError;
use crate::models::interview::UserAnswerRecord;
use crate::session::Session;
use crate::state::AppState;

const MAX_RATING: u8 = 10;

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub mock_id_ref: Uuid,
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub rating: u8,
    pub feedback: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub answers: Vec<UserAnswerRecord>,
    /// Mean rating out of 10, one decimal; 0.0 with no answers yet.
    pub overall_rating: f64,
}

/// POST /api/v1/answers
///
/// Records one practiced question. Each question is answered at most once per
/// interview; the record is immutable afterwards.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<UserAnswerRecord>, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("question is required".to_string()));
    }
    if request.rating > MAX_RATING {
        return Err(AppError::Validation(format!(
            "rating must be between 0 and {MAX_RATING}"
        )));
    }

    let record = state
        .store
        .create_answer(
            &session,
            crate::store::NewAnswer {
                mock_id_ref: request.mock_id_ref,
                question: request.question,
                user_answer: request.user_answer,
                correct_answer: request.correct_answer,
                rating: request.rating,
                feedback: request.feedback,
            },
        )
        .await?;

    Ok(Json(record))
}

/// GET /api/v1/interviews/:id/feedback
///
/// Answers recorded against one interview, with the overall rating. The
/// interview reference is weak — feedback stays readable even if the
/// interview itself is gone.
pub async fn handle_interview_feedback(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let answers = state.store.list_answers_for_interview(&session, id).await?;

    let overall_rating = if answers.is_empty() {
        0.0
    } else {
        let total: u64 = answers.iter().map(|a| u64::from(a.rating)).sum();
        round_to_tenth(total as f64 / answers.len() as f64)
    };

    Ok(Json(FeedbackResponse {
        answers,
        overall_rating,
    }))
}

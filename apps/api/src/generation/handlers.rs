//! Axum route handlers for the Generation API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::{
    create_interview, update_interview, InterviewEdit, InterviewFields,
};
use crate::models::interview::InterviewRecord;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateInterviewRequest {
    pub position: String,
    pub description: String,
    pub experience_years: f64,
    pub tech_stack: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInterviewRequest {
    pub position: Option<String>,
    pub description: Option<String>,
    pub experience_years: Option<f64>,
    pub tech_stack: Option<String>,
}

/// POST /api/v1/interviews
///
/// Validates the submission, generates the question list, and stores the new
/// interview under the session owner.
pub async fn handle_create_interview(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CreateInterviewRequest>,
) -> Result<Json<InterviewRecord>, AppError> {
    let record = create_interview(
        &state.store,
        state.generator.as_ref(),
        &session,
        InterviewFields {
            position: request.position,
            description: request.description,
            experience_years: request.experience_years,
            tech_stack: request.tech_stack,
        },
    )
    .await?;

    Ok(Json(record))
}

/// PATCH /api/v1/interviews/:id
///
/// Owner-only edit. Omitted fields keep their stored values; the question
/// list is always regenerated and `updated_at` refreshed.
pub async fn handle_update_interview(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInterviewRequest>,
) -> Result<Json<InterviewRecord>, AppError> {
    let record = update_interview(
        &state.store,
        state.generator.as_ref(),
        &session,
        id,
        InterviewEdit {
            position: request.position,
            description: request.description,
            experience_years: request.experience_years,
            tech_stack: request.tech_stack,
        },
    )
    .await?;

    Ok(Json(record))
}

//! Axum route handlers for the Analytics API.

use axum::{extract::State, Json};

use crate::analytics::aggregate::{aggregate, AnalyticsSnapshot};
use crate::errors::AppError;
use crate::session::Session;
use crate::state::AppState;

/// GET /api/v1/analytics
///
/// Recomputes the statistics snapshot from the owner's current collections.
pub async fn handle_analytics(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<AnalyticsSnapshot>, AppError> {
    let interviews = state.store.list_interviews(&session).await?;
    let answers = state.store.list_answers(&session).await?;

    Ok(Json(aggregate(&interviews, &answers)))
}

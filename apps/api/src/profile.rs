//! Best-effort profile mirroring.
//!
//! The UI upserts the signed-in user's profile after authentication. This is
//! an auxiliary write: a store failure is classified and logged as a side
//! observation, never surfaced to the flow that triggered it.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::warn;

use crate::classify::{classify, Failure};
use crate::session::Session;
use crate::state::AppState;
use crate::store::ProfilePatch;

#[derive(Debug, Default, Deserialize)]
pub struct UpsertProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
}

/// PUT /api/v1/profile
///
/// Always responds 204 — the primary sign-in flow must not fail on a
/// profile-write error.
pub async fn handle_upsert_profile(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpsertProfileRequest>,
) -> StatusCode {
    let patch = ProfilePatch {
        name: request.name,
        email: request.email,
        image_url: request.image_url,
    };

    if let Err(err) = state.store.upsert_profile(&session, patch).await {
        let classification = classify(Failure::Error(&err), "Failed to store user data");
        warn!(
            "profile upsert failed for owner {}: {}",
            session.user_id, classification.message
        );
    }

    StatusCode::NO_CONTENT
}

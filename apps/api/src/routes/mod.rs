pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{analytics, ats_client, dashboard, generation, practice, profile};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interviews: generation + dashboard views
        .route(
            "/api/v1/interviews",
            post(generation::handlers::handle_create_interview)
                .get(dashboard::handlers::handle_list_interviews),
        )
        .route(
            "/api/v1/interviews/stream",
            get(dashboard::handlers::handle_stream_interviews),
        )
        .route(
            "/api/v1/interviews/:id",
            get(dashboard::handlers::handle_get_interview)
                .patch(generation::handlers::handle_update_interview),
        )
        .route(
            "/api/v1/interviews/:id/feedback",
            get(practice::handlers::handle_interview_feedback),
        )
        // Practice
        .route(
            "/api/v1/answers",
            post(practice::handlers::handle_submit_answer),
        )
        // Analytics
        .route(
            "/api/v1/analytics",
            get(analytics::handlers::handle_analytics),
        )
        // Resume matching
        .route(
            "/api/v1/ats/match",
            post(ats_client::handlers::handle_match_resume),
        )
        // Profile mirror (best-effort)
        .route("/api/v1/profile", put(profile::handle_upsert_profile))
        .with_state(state)
}

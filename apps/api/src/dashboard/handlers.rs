//! Axum route handlers for the dashboard views.

use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use serde::Serialize;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::error;
use uuid::Uuid;

use crate::dashboard::live::{sort_snapshot, LiveInterviews, SyncPhase};
use crate::dashboard::view::{filter_interviews, tech_stack_inventory, InterviewFilter};
use crate::errors::AppError;
use crate::models::interview::InterviewRecord;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InterviewListResponse {
    pub interviews: Vec<InterviewRecord>,
    pub tech_stacks: Vec<String>,
}

/// One SSE frame: the current sync phase plus the filtered view.
#[derive(Debug, Serialize)]
struct StreamFrame {
    phase: SyncPhase,
    interviews: Vec<InterviewRecord>,
}

/// GET /api/v1/interviews?search=&tech=
///
/// Owner-scoped snapshot list. The store guarantees no ordering — records are
/// sorted here, newest first, then run through the derived filter.
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<InterviewFilter>,
) -> Result<Json<InterviewListResponse>, AppError> {
    let records = state.store.list_interviews(&session).await?;
    let sorted = sort_snapshot(records);
    let tech_stacks = tech_stack_inventory(&sorted);
    let interviews = filter_interviews(&sorted, &filter);

    Ok(Json(InterviewListResponse {
        interviews,
        tech_stacks,
    }))
}

/// GET /api/v1/interviews/stream?search=&tech=
///
/// Live dashboard feed. Each published view state becomes one SSE event with
/// the connection's filter applied; the subscription is cancelled (via Drop)
/// when the connection closes.
pub async fn handle_stream_interviews(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<InterviewFilter>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let live = LiveInterviews::subscribe(state.store.clone(), session).await;
    let view = live.view();

    let stream = WatchStream::new(view).map(move |view_state| {
        // `live` is owned by this closure: the subscription stays up for the
        // life of the SSE connection and is cancelled when the stream drops.
        let _ = &live;
        let frame = StreamFrame {
            phase: view_state.phase.clone(),
            interviews: filter_interviews(&view_state.interviews, &filter),
        };
        let event = match Event::default().json_data(&frame) {
            Ok(event) => event,
            Err(e) => {
                error!("failed to serialize interview stream frame: {e}");
                Event::default().event("error")
            }
        };
        Ok::<_, Infallible>(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /api/v1/interviews/:id
///
/// Owner-scoped fetch; a foreign or missing record is a 404.
pub async fn handle_get_interview(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewRecord>, AppError> {
    let record = state
        .store
        .get_interview(&session, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))?;

    Ok(Json(record))
}

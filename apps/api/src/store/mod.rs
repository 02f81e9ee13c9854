//! Document store seam.
//!
//! Persistence is an external collaborator reachable through query, subscribe
//! and write primitives, so the service depends on this trait rather than a
//! concrete backend. Every operation takes the acting [`Session`]: reads are
//! filtered to the session owner and writes are authorized against it.

pub mod memory;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interview::{InterviewRecord, QaPair, UserAnswerRecord};
use crate::session::Session;

/// One delivery on an interview subscription stream.
///
/// A snapshot is a complete point-in-time replacement of the owner's
/// collection, in no guaranteed order — consumers sort. An error is a
/// subscription-level failure; the stream ends after delivering it.
#[derive(Debug)]
pub enum SubscriptionEvent {
    Snapshot(Vec<InterviewRecord>),
    Error(anyhow::Error),
}

/// Live handle onto an owner-scoped interview subscription.
/// Dropping the receiver cancels the subscription store-side.
#[derive(Debug)]
pub struct InterviewSubscription {
    pub events: mpsc::UnboundedReceiver<SubscriptionEvent>,
}

/// Fields for a new interview. The store assigns `id` and both timestamps.
#[derive(Debug, Clone)]
pub struct NewInterview {
    pub position: String,
    pub description: String,
    pub experience_years: f64,
    pub tech_stack: String,
    pub questions: Vec<QaPair>,
}

/// Partial-merge patch: `None` fields keep their stored values.
/// `updated_at` is always refreshed on update.
#[derive(Debug, Clone, Default)]
pub struct InterviewPatch {
    pub position: Option<String>,
    pub description: Option<String>,
    pub experience_years: Option<f64>,
    pub tech_stack: Option<String>,
    pub questions: Option<Vec<QaPair>>,
}

/// Fields for a new practiced-answer record. The store assigns `id` and
/// `created_at`; the record is immutable afterwards.
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub mock_id_ref: Uuid,
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub rating: u8,
    pub feedback: String,
}

/// Merge-upsert patch for the owner's profile record.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_interview(
        &self,
        session: &Session,
        draft: NewInterview,
    ) -> Result<InterviewRecord, AppError>;

    /// Owner-only. A patch against a foreign record is `Forbidden`.
    async fn update_interview(
        &self,
        session: &Session,
        id: Uuid,
        patch: InterviewPatch,
    ) -> Result<InterviewRecord, AppError>;

    /// A foreign record reads as absent — existence is never leaked.
    async fn get_interview(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<Option<InterviewRecord>, AppError>;

    /// Owner-scoped, in no guaranteed order — callers sort.
    async fn list_interviews(&self, session: &Session) -> Result<Vec<InterviewRecord>, AppError>;

    /// Subscribes to the owner's interview collection. Delivers an initial
    /// snapshot, then one snapshot per mutation.
    async fn subscribe_interviews(&self, session: &Session) -> InterviewSubscription;

    async fn create_answer(
        &self,
        session: &Session,
        draft: NewAnswer,
    ) -> Result<UserAnswerRecord, AppError>;

    async fn list_answers(&self, session: &Session) -> Result<Vec<UserAnswerRecord>, AppError>;

    async fn list_answers_for_interview(
        &self,
        session: &Session,
        mock_id_ref: Uuid,
    ) -> Result<Vec<UserAnswerRecord>, AppError>;

    async fn upsert_profile(&self, session: &Session, patch: ProfilePatch)
        -> Result<(), AppError>;
}

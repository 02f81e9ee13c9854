//! In-memory `DocumentStore`.
//!
//! Default backing when no external document store is wired in, and the test
//! double for everything above the seam. Snapshot delivery mirrors the remote
//! contract: every interview mutation fans a complete owner-scoped snapshot
//! out to that owner's subscribers, unsorted.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interview::{InterviewRecord, UserAnswerRecord};
use crate::models::user::UserProfile;
use crate::session::Session;
use crate::store::{
    DocumentStore, InterviewPatch, InterviewSubscription, NewAnswer, NewInterview, ProfilePatch,
    SubscriptionEvent,
};

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    // Vec keeps insertion order so snapshot ties resolve by delivery order.
    interviews: Vec<InterviewRecord>,
    answers: Vec<UserAnswerRecord>,
    profiles: HashMap<Uuid, UserProfile>,
    watchers: Vec<Watcher>,
}

struct Watcher {
    owner_id: Uuid,
    tx: mpsc::UnboundedSender<SubscriptionEvent>,
}

impl Inner {
    fn owner_snapshot(&self, owner_id: Uuid) -> Vec<InterviewRecord> {
        self.interviews
            .iter()
            .filter(|record| record.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// Delivers a fresh snapshot to every subscriber of `owner_id`,
    /// dropping subscribers whose receiving side has gone away.
    fn notify_watchers(&mut self, owner_id: Uuid) {
        let snapshot = self.owner_snapshot(owner_id);
        self.watchers.retain(|watcher| {
            if watcher.owner_id != owner_id {
                return true;
            }
            watcher
                .tx
                .send(SubscriptionEvent::Snapshot(snapshot.clone()))
                .is_ok()
        });
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an arbitrary snapshot to an owner's subscribers, bypassing the
    /// stored collection. Lets tests exercise wholesale replacement with
    /// shapes the write API cannot produce (e.g. record removal).
    #[cfg(test)]
    pub async fn emit_snapshot(&self, owner_id: Uuid, records: Vec<InterviewRecord>) {
        let inner = self.inner.read().await;
        for watcher in inner.watchers.iter().filter(|w| w.owner_id == owner_id) {
            let _ = watcher
                .tx
                .send(SubscriptionEvent::Snapshot(records.clone()));
        }
    }

    /// Delivers a subscription-level error to an owner's subscribers.
    #[cfg(test)]
    pub async fn emit_subscription_error(&self, owner_id: Uuid, message: &str) {
        let inner = self.inner.read().await;
        for watcher in inner.watchers.iter().filter(|w| w.owner_id == owner_id) {
            let _ = watcher
                .tx
                .send(SubscriptionEvent::Error(anyhow::anyhow!(
                    "{message}"
                )));
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_interview(
        &self,
        session: &Session,
        draft: NewInterview,
    ) -> Result<InterviewRecord, AppError> {
        let now = Utc::now();
        let record = InterviewRecord {
            id: Uuid::new_v4(),
            owner_id: session.user_id,
            position: draft.position,
            description: draft.description,
            experience_years: draft.experience_years,
            tech_stack: draft.tech_stack,
            questions: draft.questions,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let mut inner = self.inner.write().await;
        inner.interviews.push(record.clone());
        inner.notify_watchers(session.user_id);
        Ok(record)
    }

    async fn update_interview(
        &self,
        session: &Session,
        id: Uuid,
        patch: InterviewPatch,
    ) -> Result<InterviewRecord, AppError> {
        let mut inner = self.inner.write().await;

        let record = inner
            .interviews
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))?;

        if record.owner_id != session.user_id {
            return Err(AppError::Forbidden);
        }

        if let Some(position) = patch.position {
            record.position = position;
        }
        if let Some(description) = patch.description {
            record.description = description;
        }
        if let Some(experience_years) = patch.experience_years {
            record.experience_years = experience_years;
        }
        if let Some(tech_stack) = patch.tech_stack {
            record.tech_stack = tech_stack;
        }
        if let Some(questions) = patch.questions {
            record.questions = questions;
        }
        record.updated_at = Some(Utc::now());

        let updated = record.clone();
        inner.notify_watchers(session.user_id);
        Ok(updated)
    }

    async fn get_interview(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<Option<InterviewRecord>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .interviews
            .iter()
            .find(|record| record.id == id && record.owner_id == session.user_id)
            .cloned())
    }

    async fn list_interviews(&self, session: &Session) -> Result<Vec<InterviewRecord>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.owner_snapshot(session.user_id))
    }

    async fn subscribe_interviews(&self, session: &Session) -> InterviewSubscription {
        let (tx, events) = mpsc::unbounded_channel();

        let mut inner = self.inner.write().await;
        let initial = inner.owner_snapshot(session.user_id);
        let _ = tx.send(SubscriptionEvent::Snapshot(initial));
        inner.watchers.push(Watcher {
            owner_id: session.user_id,
            tx,
        });

        InterviewSubscription { events }
    }

    async fn create_answer(
        &self,
        session: &Session,
        draft: NewAnswer,
    ) -> Result<UserAnswerRecord, AppError> {
        let mut inner = self.inner.write().await;

        let already_answered = inner.answers.iter().any(|answer| {
            answer.owner_id == session.user_id
                && answer.mock_id_ref == draft.mock_id_ref
                && answer.question == draft.question
        });
        if already_answered {
            return Err(AppError::Validation(
                "You have already answered this question".to_string(),
            ));
        }

        let record = UserAnswerRecord {
            id: Uuid::new_v4(),
            owner_id: session.user_id,
            mock_id_ref: draft.mock_id_ref,
            question: draft.question,
            user_answer: draft.user_answer,
            correct_answer: draft.correct_answer,
            rating: draft.rating,
            feedback: draft.feedback,
            created_at: Utc::now(),
        };
        inner.answers.push(record.clone());
        Ok(record)
    }

    async fn list_answers(&self, session: &Session) -> Result<Vec<UserAnswerRecord>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .answers
            .iter()
            .filter(|answer| answer.owner_id == session.user_id)
            .cloned()
            .collect())
    }

    async fn list_answers_for_interview(
        &self,
        session: &Session,
        mock_id_ref: Uuid,
    ) -> Result<Vec<UserAnswerRecord>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .answers
            .iter()
            .filter(|answer| {
                answer.owner_id == session.user_id && answer.mock_id_ref == mock_id_ref
            })
            .cloned()
            .collect())
    }

    async fn upsert_profile(
        &self,
        session: &Session,
        patch: ProfilePatch,
    ) -> Result<(), AppError> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        match inner.profiles.get_mut(&session.user_id) {
            Some(profile) => {
                if let Some(name) = patch.name {
                    profile.name = name;
                }
                if let Some(email) = patch.email {
                    profile.email = email;
                }
                if let Some(image_url) = patch.image_url {
                    profile.image_url = image_url;
                }
                profile.updated_at = now;
            }
            None => {
                inner.profiles.insert(
                    session.user_id,
                    UserProfile {
                        id: session.user_id,
                        name: patch.name.unwrap_or_else(|| "Anonymous".to_string()),
                        email: patch.email.unwrap_or_default(),
                        image_url: patch.image_url.unwrap_or_default(),
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        Ok(())
    }
}

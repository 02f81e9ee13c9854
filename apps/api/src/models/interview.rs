use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single generated question with its reference answer.
/// Immutable once produced by the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// A stored mock interview. Owned by exactly one user; mutated only through
/// the edit operation, which regenerates `questions` and bumps `updated_at`.
///
/// Timestamps are optional: a snapshot may surface a record whose
/// server-assigned `created_at` has not materialized yet, and such records
/// sort as if created at the minimum possible time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub position: String,
    pub description: String,
    pub experience_years: f64,
    /// Comma-separated free-form tokens, order-preserving, not deduplicated.
    pub tech_stack: String,
    pub questions: Vec<QaPair>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl InterviewRecord {
    /// Splits the stored tech stack into trimmed tokens, dropping empties.
    pub fn tech_stack_tokens(&self) -> Vec<&str> {
        self.tech_stack
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// One practiced question. References its interview weakly by id — the
/// interview may no longer exist. Created once, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAnswerRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub mock_id_ref: Uuid,
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    /// 0..=10.
    pub rating: u8,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

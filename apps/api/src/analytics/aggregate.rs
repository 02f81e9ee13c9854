//! Performance statistics over the owner's interviews and answers.
//!
//! Pure function of its inputs: recomputed on every request, never persisted,
//! and explicitly guarded against empty collections — an owner with no data
//! gets zeros, not a division error.

use serde::Serialize;

use crate::models::interview::{InterviewRecord, UserAnswerRecord};

/// Minutes of practice credited per answered question.
const MINUTES_PER_ANSWER: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub total_interviews: u64,
    pub total_answers: u64,
    /// Mean answer rating out of 10, one decimal. 0 with no answers.
    pub average_rating: f64,
    /// Interviews with at least one recorded answer.
    pub completed_interviews: u64,
    pub estimated_practice_minutes: u64,
    /// Recent-half vs older-half rating change, percent, one decimal.
    pub improvement_rate: f64,
}

/// Computes the statistics snapshot for one owner's collections.
pub fn aggregate(
    interviews: &[InterviewRecord],
    answers: &[UserAnswerRecord],
) -> AnalyticsSnapshot {
    let total_interviews = interviews.len() as u64;
    let total_answers = answers.len() as u64;

    let average_rating = round_to_tenth(mean_rating(&answers.iter().collect::<Vec<_>>()));

    let completed_interviews = {
        let mut seen: Vec<uuid::Uuid> = answers.iter().map(|a| a.mock_id_ref).collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len() as u64
    };

    AnalyticsSnapshot {
        total_interviews,
        total_answers,
        average_rating,
        completed_interviews,
        estimated_practice_minutes: total_answers * MINUTES_PER_ANSWER,
        improvement_rate: round_to_tenth(improvement_rate(answers)),
    }
}

/// Split-half trend: answers sorted newest-first, the `ceil(n/2)` newest form
/// the recent half. Percent change of recent mean over older mean; 0 whenever
/// the older mean is 0.
fn improvement_rate(answers: &[UserAnswerRecord]) -> f64 {
    let mut sorted: Vec<&UserAnswerRecord> = answers.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let (recent, older) = sorted.split_at(sorted.len().div_ceil(2));
    let older_avg = mean_rating(older);
    if older_avg > 0.0 {
        (mean_rating(recent) - older_avg) / older_avg * 100.0
    } else {
        0.0
    }
}

fn mean_rating(answers: &[&UserAnswerRecord]) -> f64 {
    if answers.is_empty() {
        return 0.0;
    }
    let total: u64 = answers.iter().map(|a| u64::from(a.rating)).sum();
    total as f64 / answers.len() as f64
}

/// Rounds to one decimal place for display.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

//! Derived filtering over the live interview list.
//!
//! Pure functions: the base sorted list is never mutated, filters compose
//! with logical AND, and results are recomputed from scratch on every call.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::models::interview::InterviewRecord;

/// Filter inputs for the dashboard list. `search` is a case-insensitive
/// substring match across position, description and tech stack; `tech` is a
/// case-insensitive equality match against individual tech-stack tokens.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewFilter {
    pub search: Option<String>,
    pub tech: Option<String>,
}

impl InterviewFilter {
    pub fn matches(&self, record: &InterviewRecord) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                record.position.to_lowercase().contains(&needle)
                    || record.description.to_lowercase().contains(&needle)
                    || record.tech_stack.to_lowercase().contains(&needle)
            }
        };

        let matches_tech = match self.tech.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(wanted) => record
                .tech_stack_tokens()
                .iter()
                .any(|token| token.eq_ignore_ascii_case(wanted)),
        };

        matches_search && matches_tech
    }
}

/// Applies the filter, preserving the input ordering.
pub fn filter_interviews(
    records: &[InterviewRecord],
    filter: &InterviewFilter,
) -> Vec<InterviewRecord> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

/// Distinct tech-stack tokens across all records, sorted for display.
pub fn tech_stack_inventory(records: &[InterviewRecord]) -> Vec<String> {
    let unique: BTreeSet<String> = records
        .iter()
        .flat_map(|record| record.tech_stack_tokens())
        .map(str::to_string)
        .collect();
    unique.into_iter().collect()
}

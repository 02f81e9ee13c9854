//! Interview generation — orchestrates the question-generation pipeline.
//!
//! Flow: validate fields → build prompt → TextGenerator::generate →
//!       sanitize → typed QaPairs → persist via the store.
//!
//! Edit follows the same flow over the merged (stored + patch) field values
//! and always regenerates the question list.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::prompts::INTERVIEW_PROMPT_TEMPLATE;
use crate::generation::sanitize::{qa_pairs_from_values, sanitize_json_array};
use crate::llm_client::TextGenerator;
use crate::models::interview::{InterviewRecord, QaPair};
use crate::session::Session;
use crate::store::{DocumentStore, InterviewPatch, NewInterview};

const MAX_POSITION_CHARS: usize = 100;
const MIN_DESCRIPTION_CHARS: usize = 10;

/// Field values for a new or edited interview, pre-generation.
#[derive(Debug, Clone)]
pub struct InterviewFields {
    pub position: String,
    pub description: String,
    pub experience_years: f64,
    pub tech_stack: String,
}

impl InterviewFields {
    /// Enforces the submission preconditions. Violations are `Validation`
    /// failures raised before any generation call is issued.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.position.trim().is_empty() {
            return Err(AppError::Validation("position is required".to_string()));
        }
        if self.position.chars().count() > MAX_POSITION_CHARS {
            return Err(AppError::Validation(format!(
                "position must be {MAX_POSITION_CHARS} characters or less"
            )));
        }
        if self.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(AppError::Validation(format!(
                "description must be at least {MIN_DESCRIPTION_CHARS} characters"
            )));
        }
        if !self.experience_years.is_finite() || self.experience_years < 0.0 {
            return Err(AppError::Validation(
                "experience cannot be empty or negative".to_string(),
            ));
        }
        if self.tech_stack.trim().is_empty() {
            return Err(AppError::Validation(
                "tech stack must be at least a character".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generates a fresh question list for the given field values.
pub async fn generate_questions(
    generator: &dyn TextGenerator,
    fields: &InterviewFields,
) -> Result<Vec<QaPair>, AppError> {
    let prompt = build_interview_prompt(fields);
    let raw = generator.generate(&prompt).await?;
    let values = sanitize_json_array(&raw)?;
    qa_pairs_from_values(values)
}

/// Full creation pipeline: validate → generate → store.
pub async fn create_interview(
    store: &Arc<dyn DocumentStore>,
    generator: &dyn TextGenerator,
    session: &Session,
    fields: InterviewFields,
) -> Result<InterviewRecord, AppError> {
    fields.validate()?;

    let questions = generate_questions(generator, &fields).await?;
    info!(
        "Generated {} questions for owner {}",
        questions.len(),
        session.user_id
    );

    store
        .create_interview(
            session,
            NewInterview {
                position: fields.position,
                description: fields.description,
                experience_years: fields.experience_years,
                tech_stack: fields.tech_stack,
                questions,
            },
        )
        .await
}

/// Partial field updates for an interview edit. Omitted fields keep their
/// stored values; the question list is regenerated regardless.
#[derive(Debug, Clone, Default)]
pub struct InterviewEdit {
    pub position: Option<String>,
    pub description: Option<String>,
    pub experience_years: Option<f64>,
    pub tech_stack: Option<String>,
}

/// Edit pipeline: merge patch over the stored record, validate the merged
/// fields, regenerate questions, partial-merge write.
pub async fn update_interview(
    store: &Arc<dyn DocumentStore>,
    generator: &dyn TextGenerator,
    session: &Session,
    id: Uuid,
    edit: InterviewEdit,
) -> Result<InterviewRecord, AppError> {
    let current = store
        .get_interview(session, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))?;

    let fields = InterviewFields {
        position: edit.position.unwrap_or(current.position),
        description: edit.description.unwrap_or(current.description),
        experience_years: edit.experience_years.unwrap_or(current.experience_years),
        tech_stack: edit.tech_stack.unwrap_or(current.tech_stack),
    };
    fields.validate()?;

    let questions = generate_questions(generator, &fields).await?;
    info!(
        "Regenerated {} questions for interview {}",
        questions.len(),
        id
    );

    store
        .update_interview(
            session,
            id,
            InterviewPatch {
                position: Some(fields.position),
                description: Some(fields.description),
                experience_years: Some(fields.experience_years),
                tech_stack: Some(fields.tech_stack),
                questions: Some(questions),
            },
        )
        .await
}

/// Builds the generation prompt by filling the interview template.
fn build_interview_prompt(fields: &InterviewFields) -> String {
    INTERVIEW_PROMPT_TEMPLATE
        .replace("{position}", &fields.position)
        .replace("{experience_years}", &fields.experience_years.to_string())
        .replace("{tech_stack}", &fields.tech_stack)
        .replace("{description}", &fields.description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use async_trait::async_trait;

    /// TextGenerator stub that returns a canned response.
    struct StaticGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for StaticGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, AppError> {
            Ok(self.0.to_string())
        }
    }

    const FENCED_RESPONSE: &str = "```json\n[\
        {\"question\":\"Q1\",\"answer\":\"A1\"},\
        {\"question\":\"Q2\",\"answer\":\"A2\"},\
        {\"question\":\"Q3\",\"answer\":\"A3\"},\
        {\"question\":\"Q4\",\"answer\":\"A4\"},\
        {\"question\":\"Q5\",\"answer\":\"A5\"}]\n```";

    fn fields() -> InterviewFields {
        InterviewFields {
            position: "Backend Engineer".to_string(),
            description: "Owns the ingestion pipeline end to end".to_string(),
            experience_years: 4.0,
            tech_stack: "Rust, Postgres".to_string(),
        }
    }

    fn session() -> Session {
        Session {
            user_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_validate_rejects_long_position() {
        let mut f = fields();
        f.position = "x".repeat(101);
        assert!(matches!(f.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_short_description() {
        let mut f = fields();
        f.description = "too short".to_string();
        assert!(matches!(f.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_negative_experience() {
        let mut f = fields();
        f.experience_years = -1.0;
        assert!(matches!(f.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_empty_tech_stack() {
        let mut f = fields();
        f.tech_stack = "   ".to_string();
        assert!(matches!(f.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_prompt_fills_all_placeholders() {
        let prompt = build_interview_prompt(&fields());
        assert!(prompt.contains("Backend Engineer"));
        assert!(prompt.contains("Rust, Postgres"));
        assert!(prompt.contains("ingestion pipeline"));
        assert!(!prompt.contains("{position}"));
        assert!(!prompt.contains("{experience_years}"));
    }

    #[tokio::test]
    async fn test_create_interview_stores_sanitized_questions() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let generator = StaticGenerator(FENCED_RESPONSE);
        let session = session();

        let record = create_interview(&store, &generator, &session, fields())
            .await
            .unwrap();

        assert_eq!(record.owner_id, session.user_id);
        assert_eq!(record.questions.len(), 5);
        assert_eq!(record.questions[0].question, "Q1");
        assert!(record.created_at.is_some());
    }

    #[tokio::test]
    async fn test_create_interview_surfaces_parse_failures() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let generator = StaticGenerator("I'm sorry, I can't help with that.");

        let err = create_interview(&store, &generator, &session(), fields())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[tokio::test]
    async fn test_update_merges_patch_and_regenerates_questions() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let generator = StaticGenerator(FENCED_RESPONSE);
        let session = session();

        let created = create_interview(&store, &generator, &session, fields())
            .await
            .unwrap();

        let updated = update_interview(
            &store,
            &generator,
            &session,
            created.id,
            InterviewEdit {
                position: Some("Staff Engineer".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.position, "Staff Engineer");
        // Omitted fields keep their stored values.
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.tech_stack, created.tech_stack);
        assert_eq!(updated.questions.len(), 5);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_interview_is_not_found() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let generator = StaticGenerator(FENCED_RESPONSE);

        let err = update_interview(
            &store,
            &generator,
            &session(),
            Uuid::new_v4(),
            InterviewEdit::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

//! Axum route handlers for the generator tools.
//!
//! Every tool follows the same path: validate the request, build the prompt,
//! call the active provider once with the tool's token budget, and
//! schema-check the structured output.

use axum::{extract::State, Json};
use tracing::info;

use crate::errors::{AppError, AppJson};
use crate::llm_client::generate_structured;
use crate::schema::SchemaViolation;
use crate::state::AppState;
use crate::tools::models::{
    CoverLetter, CoverLetterRequest, InterviewPrep, InterviewPrepRequest, LinkedInProfile,
    LinkedInRequest, NegotiationScript, OutreachEmail, OutreachRequest, RewriteRequest,
    RewrittenBullet, SalaryRequest, ThankYouEmail, ThankYouRequest,
};
use crate::tools::prompts;

const COVER_LETTER_TOKENS: u32 = 800;
const INTERVIEW_PREP_TOKENS: u32 = 1000;
const LINKEDIN_TOKENS: u32 = 1200;
const SALARY_TOKENS: u32 = 1000;
const OUTREACH_TOKENS: u32 = 800;
const THANK_YOU_TOKENS: u32 = 700;
const REWRITE_TOKENS: u32 = 600;

fn validated(check: Result<(), String>) -> Result<(), AppError> {
    check.map_err(AppError::Validation)
}

/// POST /api/tools/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    AppJson(request): AppJson<CoverLetterRequest>,
) -> Result<Json<CoverLetter>, AppError> {
    validated(request.validate())?;
    info!(
        "Writing cover letter for '{}' at '{}'",
        request.job_title, request.company
    );

    let prompt = prompts::cover_letter_prompt(&request);
    let text = state.llm.generate(&prompt, COVER_LETTER_TOKENS).await?;
    Ok(Json(CoverLetter {
        text: text.trim().to_string(),
    }))
}

/// POST /api/tools/interview-prep
pub async fn handle_interview_prep(
    State(state): State<AppState>,
    AppJson(request): AppJson<InterviewPrepRequest>,
) -> Result<Json<InterviewPrep>, AppError> {
    validated(request.validate())?;
    let prompt = prompts::interview_prep_prompt(&request);
    let prep: InterviewPrep =
        generate_structured(state.llm.as_ref(), &prompt, INTERVIEW_PREP_TOKENS).await?;
    info!(
        "Interview prep for '{}': {} questions",
        request.job_title,
        prep.0.len()
    );
    Ok(Json(prep))
}

/// POST /api/tools/linkedin
///
/// Besides the schema check, every section the caller asked for must be present.
pub async fn handle_linkedin(
    State(state): State<AppState>,
    AppJson(request): AppJson<LinkedInRequest>,
) -> Result<Json<LinkedInProfile>, AppError> {
    validated(request.validate())?;
    let prompt = prompts::linkedin_prompt(&request);
    let profile: LinkedInProfile =
        generate_structured(state.llm.as_ref(), &prompt, LINKEDIN_TOKENS).await?;

    profile
        .covers(&request.sections)
        .map_err(|detail| SchemaViolation {
            feature: "linkedin",
            detail,
        })?;
    Ok(Json(profile))
}

/// POST /api/tools/salary-negotiation
pub async fn handle_salary(
    State(state): State<AppState>,
    AppJson(request): AppJson<SalaryRequest>,
) -> Result<Json<NegotiationScript>, AppError> {
    validated(request.validate())?;
    let prompt = prompts::salary_prompt(&request);
    let script = generate_structured(state.llm.as_ref(), &prompt, SALARY_TOKENS).await?;
    Ok(Json(script))
}

/// POST /api/tools/cold-outreach
pub async fn handle_outreach(
    State(state): State<AppState>,
    AppJson(request): AppJson<OutreachRequest>,
) -> Result<Json<OutreachEmail>, AppError> {
    validated(request.validate())?;
    let prompt = prompts::outreach_prompt(&request);
    let email = generate_structured(state.llm.as_ref(), &prompt, OUTREACH_TOKENS).await?;
    Ok(Json(email))
}

/// POST /api/tools/thank-you
pub async fn handle_thank_you(
    State(state): State<AppState>,
    AppJson(request): AppJson<ThankYouRequest>,
) -> Result<Json<ThankYouEmail>, AppError> {
    validated(request.validate())?;
    let prompt = prompts::thank_you_prompt(&request);
    let email = generate_structured(state.llm.as_ref(), &prompt, THANK_YOU_TOKENS).await?;
    Ok(Json(email))
}

/// POST /api/tools/rewrite-bullet
pub async fn handle_rewrite(
    State(state): State<AppState>,
    AppJson(request): AppJson<RewriteRequest>,
) -> Result<Json<RewrittenBullet>, AppError> {
    validated(request.validate())?;
    let prompt = prompts::rewrite_prompt(&request);
    let rewritten = generate_structured(state.llm.as_ref(), &prompt, REWRITE_TOKENS).await?;
    Ok(Json(rewritten))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::config::{Config, ProviderKind};
    use crate::llm_client::testing::StubProvider;
    use crate::tools::models::LinkedInSection;

    fn state_with(stub: Arc<StubProvider>) -> AppState {
        AppState {
            llm: stub,
            config: Config::for_tests(ProviderKind::Groq),
        }
    }

    #[tokio::test]
    async fn test_cover_letter_returns_trimmed_text() {
        let stub = Arc::new(StubProvider::replying("\n\nDear team,\nHire me.\n"));
        let request: CoverLetterRequest =
            serde_json::from_value(json!({"jobTitle": "SRE", "company": "Acme"})).unwrap();

        let Json(letter) = handle_cover_letter(State(state_with(stub.clone())), AppJson(request))
            .await
            .unwrap();
        assert_eq!(letter.text, "Dear team,\nHire me.");
        assert_eq!(stub.calls()[0].1, COVER_LETTER_TOKENS);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_provider() {
        let stub = Arc::new(StubProvider::replying("unused"));
        let request: SalaryRequest = serde_json::from_value(json!({"role": "  "})).unwrap();

        let err = handle_salary(State(state_with(stub.clone())), AppJson(request))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "role is required"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_interview_prep_parses_array() {
        let stub = Arc::new(StubProvider::replying(
            r#"Sure! [{"question": "Why Rust?", "category": "Technical", "answer": "Safety.", "tip": "Be concrete"}]"#,
        ));
        let request: InterviewPrepRequest =
            serde_json::from_value(json!({"jobTitle": "Engineer"})).unwrap();

        let Json(prep) = handle_interview_prep(State(state_with(stub)), AppJson(request))
            .await
            .unwrap();
        assert_eq!(prep.0[0].question, "Why Rust?");
    }

    #[tokio::test]
    async fn test_linkedin_missing_requested_section_is_schema_violation() {
        let stub = Arc::new(StubProvider::replying(
            r#"{"headline": "Engineer", "profileScore": {"keyword_optimization": 50, "completeness": 50, "storytelling": 50, "visibility": 50}}"#,
        ));
        let request = LinkedInRequest {
            analysis: Default::default(),
            target_role: "Engineer".to_string(),
            industry: None,
            sections: vec![LinkedInSection::Headline, LinkedInSection::About],
        };

        let err = handle_linkedin(State(state_with(stub)), AppJson(request))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn test_rewrite_uses_its_budget() {
        let stub = Arc::new(StubProvider::replying(
            r#"{"rewritten": "Cut p99 latency 40%", "actionVerb": "Cut"}"#,
        ));
        let request: RewriteRequest =
            serde_json::from_value(json!({"bullet": "Made things faster"})).unwrap();

        let Json(out) = handle_rewrite(State(state_with(stub.clone())), AppJson(request))
            .await
            .unwrap();
        assert_eq!(out.rewritten, "Cut p99 latency 40%");
        assert_eq!(stub.calls()[0].1, REWRITE_TOKENS);
    }
}

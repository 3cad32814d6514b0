//! Resume analysis pipeline: prompt → provider → extract → conform.

use tracing::info;

use crate::analysis::models::{AnalysisResult, MatchResult};
use crate::analysis::prompts::{analyze_prompt, match_prompt};
use crate::errors::AppError;
use crate::llm_client::{generate_structured, LlmProvider};

/// Completion budget for a full analysis; the JSON shape is large.
const ANALYZE_MAX_TOKENS: u32 = 1500;
const MATCH_MAX_TOKENS: u32 = 1200;

pub async fn analyze_resume(
    llm: &dyn LlmProvider,
    resume_text: &str,
) -> Result<AnalysisResult, AppError> {
    let prompt = analyze_prompt(resume_text);
    let analysis: AnalysisResult = generate_structured(llm, &prompt, ANALYZE_MAX_TOKENS).await?;
    info!(
        "Resume analyzed by {}: overall={} grade={}",
        llm.name(),
        analysis.score.overall,
        analysis.score.grade
    );
    Ok(analysis)
}

pub async fn match_job(
    llm: &dyn LlmProvider,
    resume_text: &str,
    job_description: &str,
) -> Result<MatchResult, AppError> {
    let prompt = match_prompt(resume_text, job_description);
    let result: MatchResult = generate_structured(llm, &prompt, MATCH_MAX_TOKENS).await?;
    info!(
        "Job match by {}: score={} grade={}",
        llm.name(),
        result.match_score,
        result.match_grade
    );
    Ok(result)
}

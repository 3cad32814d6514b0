//! Request and output types for the generator tools.
//!
//! Requests carry the caller's `analysis` (any AnalysisResult-shaped JSON;
//! unknown fields are ignored) plus tool-specific fields. Required text
//! fields default to empty and are checked by `validate`, so a missing field
//! is a 400 with a readable message rather than a deserialization rejection.

use serde::{Deserialize, Serialize};

use crate::analysis::models::{Candidate, Experience, Skills};
use crate::llm_client::prompts::join_first;
use crate::llm_client::JsonShape;
use crate::schema::{check_non_empty, check_percent, Schema};

// ────────────────────────────────────────────────────────────────────────────
// Shared resume context
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeContext {
    pub candidate: Candidate,
    pub skills: Skills,
    pub strengths: Vec<String>,
    pub experience: Vec<Experience>,
}

impl ResumeContext {
    pub fn candidate_name(&self) -> &str {
        match self.candidate.name.trim() {
            "" => "the candidate",
            name => name,
        }
    }

    pub fn skills_line(&self, limit: usize) -> String {
        join_first(&self.skills.flattened(), limit, ", ")
    }

    pub fn strengths_line(&self, limit: usize) -> String {
        join_first(&self.strengths, limit, "; ")
    }

    pub fn recent_role(&self) -> &str {
        self.experience.first().map(|e| e.role.as_str()).unwrap_or("")
    }

    pub fn recent_company(&self) -> &str {
        self.experience.first().map(|e| e.company.as_str()).unwrap_or("")
    }

    /// "Role at Company" for the most recent `limit` positions.
    pub fn roles_line(&self, limit: usize) -> String {
        self.experience
            .iter()
            .take(limit)
            .map(|e| format!("{} at {}", e.role, e.company))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// "Role at Company (duration)" for the most recent `limit` positions.
    pub fn roles_with_duration(&self, limit: usize) -> String {
        self.experience
            .iter()
            .take(limit)
            .map(|e| {
                format!(
                    "{} at {} ({})",
                    e.role,
                    e.company,
                    e.duration.as_deref().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// One line per position with its first two highlights.
    pub fn highlight_lines(&self, limit: usize) -> String {
        self.experience
            .iter()
            .take(limit)
            .map(|e| format!("{} at {}: {}", e.role, e.company, join_first(&e.highlights, 2, ". ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

fn default_professional() -> String {
    "Professional".to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letter
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl LetterLength {
    pub fn word_target(self) -> &'static str {
        match self {
            LetterLength::Short => "150-200 words",
            LetterLength::Medium => "250-350 words",
            LetterLength::Long => "400-500 words",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverLetterRequest {
    pub analysis: ResumeContext,
    pub job_title: String,
    pub company: String,
    pub job_description: Option<String>,
    #[serde(default = "default_professional")]
    pub tone: String,
    pub length: LetterLength,
}

impl CoverLetterRequest {
    pub fn validate(&self) -> Result<(), String> {
        required("jobTitle", &self.job_title)?;
        required("company", &self.company)
    }
}

/// Cover letters are prose; the completion text is returned as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetter {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Interview prep
// ────────────────────────────────────────────────────────────────────────────

pub const MAX_INTERVIEW_QUESTIONS: u32 = 20;

fn default_difficulty() -> String {
    "Mid Level".to_string()
}

fn default_categories() -> Vec<String> {
    vec![
        "Behavioral".to_string(),
        "Technical".to_string(),
        "Role-specific".to_string(),
    ]
}

fn default_question_count() -> u32 {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPrepRequest {
    #[serde(default)]
    pub analysis: ResumeContext,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_question_count")]
    pub question_count: u32,
}

impl InterviewPrepRequest {
    pub fn validate(&self) -> Result<(), String> {
        required("jobTitle", &self.job_title)?;
        if self.categories.iter().all(|c| c.trim().is_empty()) {
            return Err("Select at least one question category".to_string());
        }
        if !(1..=MAX_INTERVIEW_QUESTIONS).contains(&self.question_count) {
            return Err(format!(
                "questionCount must be between 1 and {MAX_INTERVIEW_QUESTIONS}"
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub tip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewPrep(pub Vec<InterviewQuestion>);

impl Schema for InterviewPrep {
    const FEATURE: &'static str = "interview prep";
    const SHAPE: JsonShape = JsonShape::Array;

    fn check(&self) -> Result<(), String> {
        if self.0.is_empty() {
            return Err("expected at least one question".to_string());
        }
        self.0
            .iter()
            .try_for_each(|q| check_non_empty("question", &q.question))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LinkedIn optimizer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkedInSection {
    Headline,
    About,
    Experience,
    Skills,
}

fn default_sections() -> Vec<LinkedInSection> {
    vec![LinkedInSection::Headline, LinkedInSection::About]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInRequest {
    #[serde(default)]
    pub analysis: ResumeContext,
    #[serde(default)]
    pub target_role: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default = "default_sections")]
    pub sections: Vec<LinkedInSection>,
}

impl LinkedInRequest {
    pub fn validate(&self) -> Result<(), String> {
        required("targetRole", &self.target_role)?;
        if self.sections.is_empty() {
            return Err("Select at least one section to optimize".to_string());
        }
        Ok(())
    }

    pub fn wants(&self, section: LinkedInSection) -> bool {
        self.sections.contains(&section)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileScore {
    pub keyword_optimization: u32,
    pub completeness: u32,
    pub storytelling: u32,
    pub visibility: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_bullets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_skills: Option<Vec<String>>,
    pub profile_score: ProfileScore,
    #[serde(default)]
    pub quick_wins: Vec<String>,
}

impl LinkedInProfile {
    /// Checks that every section the caller asked for came back.
    pub fn covers(&self, sections: &[LinkedInSection]) -> Result<(), String> {
        for section in sections {
            let present = match section {
                LinkedInSection::Headline => self.headline.is_some(),
                LinkedInSection::About => self.about.is_some(),
                LinkedInSection::Experience => self.experience_bullets.is_some(),
                LinkedInSection::Skills => self.suggested_skills.is_some(),
            };
            if !present {
                return Err(format!("requested section {section:?} is missing"));
            }
        }
        Ok(())
    }
}

impl Schema for LinkedInProfile {
    const FEATURE: &'static str = "linkedin";
    const SHAPE: JsonShape = JsonShape::Object;

    fn check(&self) -> Result<(), String> {
        let s = &self.profile_score;
        check_percent("profileScore.keyword_optimization", s.keyword_optimization)?;
        check_percent("profileScore.completeness", s.completeness)?;
        check_percent("profileScore.storytelling", s.storytelling)?;
        check_percent("profileScore.visibility", s.visibility)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Salary negotiation
// ────────────────────────────────────────────────────────────────────────────

fn default_scenario() -> String {
    "New job negotiation".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRequest {
    #[serde(default)]
    pub analysis: ResumeContext,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub current_salary: Option<String>,
    #[serde(default)]
    pub target_salary: Option<String>,
    #[serde(default = "default_scenario")]
    pub scenario: String,
    #[serde(default, alias = "yearsExp")]
    pub years_experience: Option<String>,
}

impl SalaryRequest {
    pub fn validate(&self) -> Result<(), String> {
        required("role", &self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationScript {
    pub opening_statement: String,
    #[serde(default)]
    pub value_proposition: String,
    #[serde(default)]
    pub counter_script: String,
    #[serde(default)]
    pub closing_statement: String,
    #[serde(default)]
    pub talking_points: Vec<String>,
    #[serde(default)]
    pub things_to_avoid: Vec<String>,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub tip: String,
}

impl Schema for NegotiationScript {
    const FEATURE: &'static str = "salary negotiation";
    const SHAPE: JsonShape = JsonShape::Object;

    fn check(&self) -> Result<(), String> {
        check_non_empty("openingStatement", &self.opening_statement)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cold outreach and thank-you emails
// ────────────────────────────────────────────────────────────────────────────

fn default_target_title() -> String {
    "Recruiter".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachRequest {
    #[serde(default)]
    pub analysis: ResumeContext,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_target_title")]
    pub target_title: String,
    #[serde(default)]
    pub target_name: Option<String>,
    #[serde(default = "default_professional")]
    pub tone: String,
    #[serde(default)]
    pub mutual: Option<String>,
}

impl OutreachRequest {
    pub fn validate(&self) -> Result<(), String> {
        required("company", &self.company)?;
        required("role", &self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachEmail {
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub subject_alternatives: Vec<String>,
    #[serde(default)]
    pub tip: String,
}

impl Schema for OutreachEmail {
    const FEATURE: &'static str = "cold outreach";
    const SHAPE: JsonShape = JsonShape::Object;

    fn check(&self) -> Result<(), String> {
        check_non_empty("subject", &self.subject)?;
        check_non_empty("body", &self.body)
    }
}

fn default_interview_type() -> String {
    "Hiring Manager".to_string()
}

fn default_timing() -> String {
    "Same day (within hours)".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThankYouRequest {
    #[serde(default)]
    pub analysis: ResumeContext,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub interviewer_name: Option<String>,
    #[serde(default)]
    pub interviewer_title: Option<String>,
    #[serde(default = "default_interview_type")]
    pub interview_type: String,
    #[serde(default = "default_timing")]
    pub timing: String,
    #[serde(default)]
    pub highlight: Option<String>,
}

impl ThankYouRequest {
    pub fn validate(&self) -> Result<(), String> {
        required("company", &self.company)?;
        required("role", &self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThankYouEmail {
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub follow_up_line: String,
    #[serde(default)]
    pub tip: String,
}

impl Schema for ThankYouEmail {
    const FEATURE: &'static str = "thank-you email";
    const SHAPE: JsonShape = JsonShape::Object;

    fn check(&self) -> Result<(), String> {
        check_non_empty("subject", &self.subject)?;
        check_non_empty("body", &self.body)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Bullet rewriter
// ────────────────────────────────────────────────────────────────────────────

fn default_focus() -> String {
    "STAR format".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRequest {
    #[serde(default)]
    pub analysis: ResumeContext,
    #[serde(default)]
    pub bullet: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_focus")]
    pub focus: String,
}

impl RewriteRequest {
    pub fn validate(&self) -> Result<(), String> {
        required("bullet", &self.bullet)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewrittenBullet {
    pub rewritten: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub action_verb: String,
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl Schema for RewrittenBullet {
    const FEATURE: &'static str = "bullet rewrite";
    const SHAPE: JsonShape = JsonShape::Object;

    fn check(&self) -> Result<(), String> {
        check_non_empty("rewritten", &self.rewritten)
    }
}

//! Wire types for resume analysis and job matching.
//!
//! Field names follow the camelCase JSON the prompts ask the model for and the
//! front end consumes. Scores are required; descriptive collections default
//! to empty and descriptive text may be null, so a terse but well-formed
//! model answer still conforms.

use serde::{Deserialize, Deserializer, Serialize};

use crate::llm_client::JsonShape;
use crate::schema::{check_percent, Schema};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(rename = "linkedIn", deserialize_with = "lenient_string")]
    pub linked_in: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub languages: Vec<String>,
    pub tools: Vec<String>,
}

impl Skills {
    /// All skills in category order: technical, soft, languages, tools.
    pub fn flattened(&self) -> Vec<String> {
        self.technical
            .iter()
            .chain(&self.soft)
            .chain(&self.languages)
            .chain(&self.tools)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub role: String,
    #[serde(deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_empty")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub degree: String,
    #[serde(deserialize_with = "lenient_string")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub formatting: u32,
    pub impact: u32,
    pub skills: u32,
    pub experience: u32,
    pub education: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub overall: u32,
    pub breakdown: ScoreBreakdown,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub grade: String,
}

impl Score {
    fn check(&self) -> Result<(), String> {
        check_percent("score.overall", self.overall)?;
        let b = &self.breakdown;
        check_percent("score.breakdown.formatting", b.formatting)?;
        check_percent("score.breakdown.impact", b.impact)?;
        check_percent("score.breakdown.skills", b.skills)?;
        check_percent("score.breakdown.experience", b.experience)?;
        check_percent("score.breakdown.education", b.education)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "High", alias = "HIGH")]
    High,
    #[default]
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "Low", alias = "LOW")]
    Low,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Improvement {
    #[serde(deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub issue: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub suggestion: String,
    pub priority: Priority,
}

/// Full analysis of one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub candidate: Candidate,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub score: Score,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<Improvement>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
}

impl Schema for AnalysisResult {
    const FEATURE: &'static str = "analysis";
    const SHAPE: JsonShape = JsonShape::Object;

    fn check(&self) -> Result<(), String> {
        self.score.check()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchedRequirement {
    pub requirement: String,
    pub evidence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissingRequirement {
    pub requirement: String,
    pub gap: String,
    pub how_to_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailoringTip {
    pub section: String,
    pub tip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsOptimization {
    pub score: u32,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Fit of one resume against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub match_score: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub match_grade: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub verdict: String,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub matched_requirements: Vec<MatchedRequirement>,
    #[serde(default)]
    pub missing_requirements: Vec<MissingRequirement>,
    #[serde(default)]
    pub tailoring_tips: Vec<TailoringTip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ats_optimization: Option<AtsOptimization>,
}

impl Schema for MatchResult {
    const FEATURE: &'static str = "match";
    const SHAPE: JsonShape = JsonShape::Object;

    fn check(&self) -> Result<(), String> {
        check_percent("matchScore", self.match_score)?;
        if let Some(ats) = &self.ats_optimization {
            check_percent("atsOptimization.score", ats.score)?;
        }
        Ok(())
    }
}

/// Accepts a string, a number, or null. Models often answer `"year": 2021`
/// where the prompt showed a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
        Bool(bool),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) if !s.trim().is_empty() && s != "null" => Some(s),
        Some(Loose::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Descriptive text the model may leave as `null` when it has nothing to say.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

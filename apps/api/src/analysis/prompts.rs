// Resume analysis and job-match prompt templates.
// Inputs are truncated here to bound token cost; truncation keeps the prefix.

use crate::llm_client::prompts::truncate_chars;

pub const ANALYZE_RESUME_CHARS: usize = 2000;
pub const MATCH_RESUME_CHARS: usize = 1500;
pub const MATCH_JOB_CHARS: usize = 1000;

const ANALYSIS_SHAPE: &str = r#"{"candidate":{"name":"string","email":"string or null","phone":"string or null","location":"string or null","linkedIn":"string or null","summary":"string"},"skills":{"technical":[],"soft":[],"languages":[],"tools":[]},"experience":[{"company":"string","role":"string","duration":"string","highlights":[]}],"education":[{"institution":"string","degree":"string","year":"string or null"}],"score":{"overall":75,"breakdown":{"formatting":70,"impact":65,"skills":80,"experience":75,"education":70},"grade":"B+"},"strengths":[],"improvements":[{"category":"string","issue":"string","suggestion":"string","priority":"high"}],"keywords":[],"missingKeywords":[]}"#;

const MATCH_SHAPE: &str = r#"{"matchScore":72,"matchGrade":"B","verdict":"string","matchedKeywords":[],"missingKeywords":[],"matchedRequirements":[{"requirement":"string","evidence":"string"}],"missingRequirements":[{"requirement":"string","gap":"string","howToAddress":"string"}],"tailoringTips":[{"section":"string","tip":"string"}],"atsOptimization":{"score":65,"tips":[]}}"#;

pub fn analyze_prompt(resume_text: &str) -> String {
    format!(
        "Analyze this resume. Respond ONLY with a valid JSON object, no extra text.\n\
         All scores are integers from 0 to 100. Priority is one of high, medium, low.\n\n\
         JSON structure:\n{ANALYSIS_SHAPE}\n\n\
         RESUME:\n{}\n\n\
         JSON:",
        truncate_chars(resume_text, ANALYZE_RESUME_CHARS)
    )
}

pub fn match_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "Compare this resume to the job description. Respond ONLY with a valid JSON object, no extra text.\n\
         All scores are integers from 0 to 100.\n\n\
         JSON structure:\n{MATCH_SHAPE}\n\n\
         RESUME:\n{}\n\n\
         JOB DESCRIPTION:\n{}\n\n\
         JSON:",
        truncate_chars(resume_text, MATCH_RESUME_CHARS),
        truncate_chars(job_description, MATCH_JOB_CHARS)
    )
}

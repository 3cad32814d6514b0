// Generator tool prompt templates.
// Pure functions of the request; the handler validates required fields first.

use crate::llm_client::prompts::{ESCAPE_NEWLINES, JSON_ARRAY_ONLY, JSON_OBJECT_ONLY};
use crate::tools::models::{
    CoverLetterRequest, InterviewPrepRequest, LinkedInRequest, LinkedInSection, OutreachRequest,
    RewriteRequest, SalaryRequest, ThankYouRequest,
};

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn optional<'a>(value: &'a Option<String>) -> Option<&'a str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

pub fn cover_letter_prompt(req: &CoverLetterRequest) -> String {
    let ctx = &req.analysis;
    let job_context = optional(&req.job_description)
        .map(|jd| format!("\nJob description context:\n{jd}\n"))
        .unwrap_or_default();

    format!(
        r#"You are a professional career coach and expert cover letter writer.

Write a {tone_lower} cover letter for {name} applying for the role of "{title}" at "{company}".

Candidate profile:
- Key skills: {skills}
- Notable strengths: {strengths}
- Recent experience: {experience}
{job_context}
Requirements:
- Length: approximately {words}
- Tone: {tone}
- Open with a compelling hook (not "I am writing to apply...")
- Weave in 2-3 specific skills from their profile
- End with a confident call to action
- Do NOT include address blocks, date headers, or signature lines, just the body paragraphs
- Output only the cover letter text, nothing else"#,
        tone_lower = req.tone.to_lowercase(),
        tone = req.tone,
        name = ctx.candidate_name(),
        title = req.job_title.trim(),
        company = req.company.trim(),
        skills = ctx.skills_line(12),
        strengths = ctx.strengths_line(3),
        experience = ctx.roles_line(3),
        words = req.length.word_target(),
    )
}

pub fn interview_prep_prompt(req: &InterviewPrepRequest) -> String {
    let ctx = &req.analysis;
    let at_company = optional(&req.company)
        .map(|c| format!(" at {c}"))
        .unwrap_or_default();
    let categories = req
        .categories
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are an expert interview coach preparing a candidate for a {difficulty} "{title}" role{at_company}.

Candidate profile:
- Skills: {skills}
- Experience: {experience}

Generate exactly {count} interview questions across these categories: {categories}.

{JSON_ARRAY_ONLY} Format:
[
  {{
    "question": "...",
    "category": "Behavioral",
    "answer": "A strong 3-4 sentence model answer",
    "tip": "One concise coaching tip"
  }}
]"#,
        difficulty = req.difficulty,
        title = req.job_title.trim(),
        skills = or_default(&ctx.skills_line(15), "General professional"),
        experience = or_default(&ctx.roles_with_duration(4), "Not specified"),
        count = req.question_count,
    )
}

pub fn linkedin_prompt(req: &LinkedInRequest) -> String {
    let ctx = &req.analysis;
    let industry = optional(&req.industry)
        .map(|i| format!(" in the {i} industry"))
        .unwrap_or_default();

    let mut fields = Vec::new();
    if req.wants(LinkedInSection::Headline) {
        fields.push(r#""headline": "A compelling 120-character LinkedIn headline for the target role""#);
    }
    if req.wants(LinkedInSection::About) {
        fields.push(r#""about": "First-person LinkedIn About section, 3-4 paragraphs, ends with a call to action. Use \n for paragraph breaks.""#);
    }
    if req.wants(LinkedInSection::Experience) {
        fields.push(r#""experienceBullets": ["achievement-focused bullet 1", "bullet 2", "bullet 3"]"#);
    }
    if req.wants(LinkedInSection::Skills) {
        fields.push(r#""suggestedSkills": ["skill1", "skill2", "skill3"]"#);
    }
    fields.push(r#""profileScore": { "keyword_optimization": 75, "completeness": 80, "storytelling": 70, "visibility": 65 }"#);
    fields.push(r#""quickWins": ["actionable tip 1", "tip 2", "tip 3"]"#);

    format!(
        r#"You are a LinkedIn profile expert and personal branding strategist.

Optimize {name}'s LinkedIn profile for the role of "{role}"{industry}.

Resume data:
- Current/recent title: {current}
- Skills: {skills}
- Strengths: {strengths}
- Experience highlights:
{highlights}

{JSON_OBJECT_ONLY}
{ESCAPE_NEWLINES}

{{
  {fields}
}}"#,
        name = ctx.candidate_name(),
        role = req.target_role.trim(),
        current = ctx.recent_role(),
        skills = ctx.skills_line(20),
        strengths = ctx.strengths_line(4),
        highlights = ctx.highlight_lines(3),
        fields = fields.join(",\n  "),
    )
}

pub fn salary_prompt(req: &SalaryRequest) -> String {
    let ctx = &req.analysis;
    let unspecified = "not specified";

    format!(
        r#"You are an expert salary negotiation coach. Generate a complete negotiation script.

Details:
- Role: {role}
- Scenario: {scenario}
- Current salary: {current}
- Target salary: {target}
- Years of experience: {years}
- Key skills: {skills}
- Strengths: {strengths}

{JSON_OBJECT_ONLY}

{{
  "openingStatement": "The opening line to start the conversation confidently",
  "valueProposition": "2-3 sentences articulating their value and why they deserve the target salary",
  "counterScript": "What to say when they push back or say the budget is fixed",
  "closingStatement": "How to wrap up and next steps",
  "talkingPoints": ["point 1", "point 2", "point 3", "point 4"],
  "thingsToAvoid": ["mistake 1", "mistake 2", "mistake 3"],
  "salaryRange": "Suggested range to anchor with based on the info given",
  "tip": "One powerful coaching tip specific to this scenario"
}}"#,
        role = req.role.trim(),
        scenario = req.scenario,
        current = optional(&req.current_salary).unwrap_or(unspecified),
        target = optional(&req.target_salary).unwrap_or(unspecified),
        years = optional(&req.years_experience).unwrap_or(unspecified),
        skills = or_default(&ctx.skills_line(10), "general professional"),
        strengths = or_default(&ctx.strengths_line(3), unspecified),
    )
}

pub fn outreach_prompt(req: &OutreachRequest) -> String {
    let ctx = &req.analysis;
    let named = optional(&req.target_name)
        .map(|n| format!(" named {n}"))
        .unwrap_or_default();
    let mutual = optional(&req.mutual)
        .map(|m| format!("- Mutual connection/context: {m}\n"))
        .unwrap_or_default();

    format!(
        r#"You are an expert at writing cold outreach emails that get responses.

Write a cold outreach email from {name} to a {target_title}{named} at {company} about the {role} role.

Sender profile:
- Current/recent role: {recent_role} at {recent_company}
- Key skills: {skills}
- Strengths: {strengths}
{mutual}
Tone: {tone}

Rules:
- Subject line: punchy, under 8 words, no "Following up" or "Reaching out"
- Opening: reference something specific about the company (infer something plausible)
- Middle: 2-3 sentences on what they bring, not what they want
- CTA: one clear, low-friction ask
- Total body: under 150 words
- Sound human, not templated

{JSON_OBJECT_ONLY}
{{
  "subject": "the email subject line",
  "body": "the full email body",
  "subjectAlternatives": ["alt subject 1", "alt subject 2"],
  "tip": "One specific tip to improve response rate for this outreach"
}}"#,
        name = ctx.candidate_name(),
        target_title = req.target_title,
        company = req.company.trim(),
        role = req.role.trim(),
        recent_role = ctx.recent_role(),
        recent_company = ctx.recent_company(),
        skills = ctx.skills_line(10),
        strengths = ctx.strengths_line(2),
        tone = req.tone,
    )
}

pub fn thank_you_prompt(req: &ThankYouRequest) -> String {
    let ctx = &req.analysis;
    let interviewer_title = optional(&req.interviewer_title)
        .map(|t| format!(", {t}"))
        .unwrap_or_default();

    format!(
        r#"You are an expert career coach. Write a thank-you email after a job interview.

Context:
- Candidate: {name}
- Interviewer: {interviewer}{interviewer_title}
- Company: {company}
- Role: {role}
- Interview type: {interview_type}
- Timing: {timing}
- Memorable moment/topic from interview: {highlight}
- Candidate's background: {recent_role}, skills: {skills}

Rules:
- Subject line: specific and warm, not generic
- Reference the specific highlight/topic discussed so it feels personal
- Reiterate enthusiasm for ONE specific thing about the role/company
- Briefly reinforce one strength relevant to the role
- End with a clear, confident next step
- Keep under 150 words
- Sound genuine and warm, not corporate

{JSON_OBJECT_ONLY}
{{
  "subject": "the subject line",
  "body": "the full thank-you email body",
  "followUpLine": "A one-line follow-up to send if no response in 5 days",
  "tip": "One specific tip to make this email stand out"
}}"#,
        name = ctx.candidate_name(),
        interviewer = optional(&req.interviewer_name).unwrap_or("the interviewer"),
        company = req.company.trim(),
        role = req.role.trim(),
        interview_type = req.interview_type,
        timing = req.timing,
        highlight = optional(&req.highlight)
            .unwrap_or("a great conversation about the role and team"),
        recent_role = ctx.recent_role(),
        skills = ctx.skills_line(8),
    )
}

pub fn rewrite_prompt(req: &RewriteRequest) -> String {
    let target = match optional(&req.role) {
        Some(role) => format!("Target role: {role}"),
        None if !req.analysis.recent_role().is_empty() => {
            format!("Candidate's role: {}", req.analysis.recent_role())
        }
        None => String::new(),
    };

    format!(
        r#"You are an expert resume coach. Rewrite the following weak resume bullet point into a strong, impactful version.

Weak bullet: "{bullet}"
{target}
Focus: {focus}

Rules:
- Start with a strong action verb
- Include measurable impact where possible (infer realistic numbers if none given)
- Apply {focus} technique
- Keep it to 1-2 lines max
- {JSON_OBJECT_ONLY}
{{
  "rewritten": "the improved bullet point",
  "explanation": "2-sentence explanation of what changed and why",
  "actionVerb": "the strong verb used",
  "improvements": ["improvement 1", "improvement 2", "improvement 3"]
}}"#,
        bullet = req.bullet.trim(),
        focus = req.focus,
    )
}

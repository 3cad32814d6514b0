// Generator tools: cover letters, interview prep, LinkedIn, negotiation
// scripts, outreach and thank-you emails, bullet rewrites.

pub mod handlers;
pub mod models;
pub mod prompts;

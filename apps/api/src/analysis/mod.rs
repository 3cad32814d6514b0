// Resume parsing, scoring and job matching.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod models;
pub mod pdf;
pub mod prompts;
pub mod service;

//! Schema conformance for parsed LLM output.
//!
//! Every feature declares its output type; `conform` deserializes the
//! extracted JSON into that type and then runs the type's own range checks.
//! Output that parses as JSON but has the wrong shape or out-of-range scores
//! fails here with a `SchemaViolation` instead of reaching the client.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::JsonShape;

#[derive(Debug, Clone, Error)]
#[error("{feature} response does not match the expected schema: {detail}")]
pub struct SchemaViolation {
    pub feature: &'static str,
    pub detail: String,
}

/// A typed LLM output with a declared top-level shape.
pub trait Schema: DeserializeOwned {
    /// Feature name used in violation messages.
    const FEATURE: &'static str;
    const SHAPE: JsonShape;

    /// Semantic checks that serde cannot express.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

pub fn conform<T: Schema>(value: Value) -> Result<T, SchemaViolation> {
    let typed: T = serde_json::from_value(value).map_err(|e| SchemaViolation {
        feature: T::FEATURE,
        detail: e.to_string(),
    })?;
    typed.check().map_err(|detail| SchemaViolation {
        feature: T::FEATURE,
        detail,
    })?;
    Ok(typed)
}

/// Scores are integers on a 0–100 scale.
pub fn check_percent(field: &str, value: u32) -> Result<(), String> {
    if value > 100 {
        return Err(format!("{field} must be between 0 and 100, got {value}"));
    }
    Ok(())
}

pub fn check_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}

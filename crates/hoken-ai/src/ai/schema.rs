//! Response schemas sent with JSON requests
//!
//! Written in the model's OpenAPI subset (`OBJECT`, `STRING`, `INTEGER`,
//! `ARRAY`). Field names are shared with the contract structs through the
//! `KEY_*` constants.

use hoken_domain::ClaimStatus;
use serde_json::{json, Value};

pub const KEY_PLAN_NAME: &str = "planName";
pub const KEY_PREMIUM: &str = "premium";
pub const KEY_COVERAGE_DETAILS: &str = "coverageDetails";
pub const KEY_ADVICE: &str = "advice";

pub const KEY_STATUS: &str = "status";
pub const KEY_AMOUNT: &str = "amount";
pub const KEY_REASONING: &str = "reasoning";
pub const KEY_NEXT_STEPS: &str = "nextSteps";

pub const KEY_TITLE: &str = "title";
pub const KEY_CHAPTERS: &str = "chapters";
pub const KEY_CONTENT: &str = "content";
pub const KEY_IMAGE_PROMPT: &str = "imagePrompt";

/// Proposal: plan name, monthly premium, coverage, advice
pub fn proposal_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            KEY_PLAN_NAME: { "type": "STRING" },
            KEY_PREMIUM: { "type": "INTEGER", "description": "Monthly premium in JPY" },
            KEY_COVERAGE_DETAILS: { "type": "STRING", "description": "Trilingual summary of benefits" },
            KEY_ADVICE: { "type": "STRING", "description": "Trilingual advice" },
        },
        "required": [KEY_PLAN_NAME, KEY_PREMIUM, KEY_COVERAGE_DETAILS, KEY_ADVICE],
    })
}

/// Adjudication: one of the four claim statuses, payout, reasoning, next steps
pub fn adjudication_schema() -> Value {
    let statuses: Vec<&str> = ClaimStatus::ALL.iter().map(|s| s.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            KEY_STATUS: { "type": "STRING", "enum": statuses },
            KEY_AMOUNT: { "type": "INTEGER", "description": "Payout in JPY, 0 unless approved" },
            KEY_REASONING: { "type": "STRING" },
            KEY_NEXT_STEPS: { "type": "STRING" },
        },
        "required": [KEY_STATUS, KEY_AMOUNT, KEY_REASONING, KEY_NEXT_STEPS],
    })
}

/// Lesson: title, ordered chapters, and a prompt for the visual aid
pub fn lesson_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            KEY_TITLE: { "type": "STRING" },
            KEY_CHAPTERS: {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        KEY_TITLE: { "type": "STRING" },
                        KEY_CONTENT: { "type": "STRING" },
                    },
                    "required": [KEY_TITLE, KEY_CONTENT],
                },
            },
            KEY_IMAGE_PROMPT: { "type": "STRING", "description": "English prompt for an illustrative diagram" },
        },
        "required": [KEY_TITLE, KEY_CHAPTERS, KEY_IMAGE_PROMPT],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjudication_schema_lists_all_statuses() {
        let schema = adjudication_schema();
        let statuses = schema["properties"][KEY_STATUS]["enum"].as_array().unwrap();
        assert_eq!(statuses.len(), 4);
        assert!(statuses.contains(&json!("NeedMoreInfo")));
    }

    #[test]
    fn test_required_fields() {
        let schema = proposal_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert_eq!(schema["properties"][KEY_PREMIUM]["type"], "INTEGER");
    }
}

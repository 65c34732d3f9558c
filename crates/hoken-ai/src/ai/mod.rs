//! Prompt templates, response schemas, and the Gemini backend

pub mod gemini;
pub mod prompts;
pub mod schema;

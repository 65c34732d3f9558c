//! Generative-AI layer for the insurance academy
//!
//! Prompt templates, response contracts with their fallbacks, media
//! decoding, and the Gemini REST client behind the [`GenerativeModel`] seam.

pub mod ai;
pub mod client;
pub mod contracts;
pub mod media;
pub mod operations;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use ai::gemini::{GeminiClient, GeminiConfig};
pub use client::{GenerateRequest, GenerateResponse, GenerativeModel, InlineData, ResponseKind};
pub use contracts::{
    Adjudication, Chapter, Lesson, Proposal, ProposalRequest, EXPLANATION_UNAVAILABLE,
};
pub use media::{GeneratedImage, SpeechAudio};
pub use operations::{
    adjudicate_claim, explain_term, generate_lesson, generate_proposal, synthesize_image,
    synthesize_speech,
};

//! Generative model seam
//!
//! Operations talk to a [`GenerativeModel`]; the Gemini REST client is one
//! implementation, tests plug in scripted ones.

use async_trait::async_trait;
use hoken_types::AiError;
use serde_json::Value;

/// What the model is asked to return
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseKind {
    /// Free text (Markdown)
    Text,
    /// A JSON object matching `schema`
    Json { schema: Value },
    /// Spoken audio as base64 PCM
    Audio,
    /// Image bytes as base64
    Image,
}

impl ResponseKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResponseKind::Text => "text",
            ResponseKind::Json { .. } => "json",
            ResponseKind::Audio => "audio",
            ResponseKind::Image => "image",
        }
    }
}

/// One instruction payload
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub kind: ResponseKind,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            kind: ResponseKind::Text,
        }
    }

    pub fn json(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            kind: ResponseKind::Json { schema },
        }
    }

    pub fn audio(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            kind: ResponseKind::Audio,
        }
    }

    pub fn image(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            kind: ResponseKind::Image,
        }
    }
}

/// Base64 payload returned inline by the model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Model output: concatenated text parts plus any inline payloads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    pub text: Option<String>,
    pub inline: Vec<InlineData>,
}

impl GenerateResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline: Vec::new(),
        }
    }

    pub fn from_inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline: vec![InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }],
        }
    }

    /// Non-blank text, or `EmptyResponse`
    pub fn require_text(&self) -> Result<&str, AiError> {
        match self.text.as_deref() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(AiError::EmptyResponse),
        }
    }

    /// First inline payload whose MIME type starts with `prefix`
    pub fn inline_with_prefix(&self, prefix: &str) -> Option<&InlineData> {
        self.inline.iter().find(|d| d.mime_type.starts_with(prefix))
    }
}

/// An external generative model
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send one request. Implementations must not retry.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, AiError>;
}

#[async_trait]
impl<M: GenerativeModel + ?Sized> GenerativeModel for std::sync::Arc<M> {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, AiError> {
        (**self).generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(GenerateResponse::default().require_text().is_err());
        assert!(GenerateResponse::from_text("  \n").require_text().is_err());
        assert_eq!(GenerateResponse::from_text("ok").require_text().unwrap(), "ok");
    }

    #[test]
    fn test_inline_with_prefix() {
        let response = GenerateResponse::from_inline("audio/L16;rate=24000", "AAAA");
        assert!(response.inline_with_prefix("audio/").is_some());
        assert!(response.inline_with_prefix("image/").is_none());
    }
}

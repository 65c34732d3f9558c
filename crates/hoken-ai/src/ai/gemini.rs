//! Gemini `generateContent` REST client

use std::time::Duration;

use async_trait::async_trait;
use hoken_types::AiError;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::client::{GenerateRequest, GenerateResponse, GenerativeModel, InlineData, ResponseKind};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_VOICE: &str = "Kore";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for [`GeminiClient`]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub speech_model: String,
    pub image_model: String,
    pub voice: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Model that serves a given response kind
    pub fn model_for(&self, kind: &ResponseKind) -> &str {
        match kind {
            ResponseKind::Text | ResponseKind::Json { .. } => &self.text_model,
            ResponseKind::Audio => &self.speech_model,
            ResponseKind::Image => &self.image_model,
        }
    }
}

pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, AiError> {
        let model = self.config.model_for(&request.kind);
        let url = self.endpoint(model);
        let body = build_body(&request, &self.config.voice);

        info!(url = %url, kind = request.kind.name(), "calling generative model");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let wire: WireResponse = resp.json().await?;
        let response = wire.into_response()?;
        debug!(
            text_len = response.text.as_deref().map(str::len).unwrap_or(0),
            inline = response.inline.len(),
            "model responded"
        );
        Ok(response)
    }
}

/// Request body for one prompt
pub fn build_body(request: &GenerateRequest, voice: &str) -> Value {
    let contents = json!([{
        "role": "user",
        "parts": [{ "text": request.prompt }],
    }]);
    match &request.kind {
        ResponseKind::Text => json!({ "contents": contents }),
        ResponseKind::Json { schema } => json!({
            "contents": contents,
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        }),
        ResponseKind::Audio => json!({
            "contents": contents,
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": voice },
                    },
                },
            },
        }),
        ResponseKind::Image => json!({
            "contents": contents,
            "generationConfig": { "responseModalities": ["IMAGE"] },
        }),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    #[serde(default)]
    prompt_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireContent>,
}

#[derive(Debug, Deserialize)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<WireInlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    mime_type: String,
    data: String,
}

impl WireResponse {
    /// Flatten the first candidate. No candidate at all is an empty response.
    fn into_response(self) -> Result<GenerateResponse, AiError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            if let Some(feedback) = self.prompt_feedback {
                debug!(feedback = %feedback, "prompt was blocked");
            }
            return Err(AiError::EmptyResponse);
        };

        let mut text: Option<String> = None;
        let mut inline = Vec::new();
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(t) = part.text {
                text.get_or_insert_with(String::new).push_str(&t);
            }
            if let Some(data) = part.inline_data {
                inline.push(InlineData {
                    mime_type: data.mime_type,
                    data: data.data,
                });
            }
        }
        Ok(GenerateResponse { text, inline })
    }
}

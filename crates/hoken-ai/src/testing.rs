//! Scripted model for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use hoken_types::AiError;
use serde_json::Value;

use crate::client::{GenerateRequest, GenerateResponse, GenerativeModel};

/// Replays queued responses in order and records every request.
/// An exhausted script answers with a transport error.
#[derive(Default)]
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<GenerateResponse, AiError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: Result<GenerateResponse, AiError>) -> &Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(response);
        }
        self
    }

    pub fn push_text(&self, text: &str) -> &Self {
        self.push(Ok(GenerateResponse::from_text(text)))
    }

    pub fn push_json(&self, value: Value) -> &Self {
        self.push(Ok(GenerateResponse::from_text(value.to_string())))
    }

    pub fn push_inline(&self, mime_type: &str, data: &str) -> &Self {
        self.push(Ok(GenerateResponse::from_inline(mime_type, data)))
    }

    pub fn push_error(&self, error: AiError) -> &Self {
        self.push(Err(error))
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, AiError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Err(AiError::Transport("script exhausted".to_string())))
    }
}

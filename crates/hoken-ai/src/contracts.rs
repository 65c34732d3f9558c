//! Request and response contracts for the model operations
//!
//! Structured responses are parsed with [`parse_contract`], which tolerates
//! Markdown fences around the JSON and then checks required content with
//! [`Contract::validate`].

use hoken_domain::{Assessment, ClaimStatus, Gender, InsuranceCategory};
use hoken_types::AiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Shown in place of an explanation when the model cannot be reached
pub const EXPLANATION_UNAVAILABLE: &str =
    "AI Service temporarily unavailable / AI服务暂时不可用 / AIサービスは一時的(いちじてき)に利用(りよう)できません";

/// Default needs text for the simulation form
pub const DEFAULT_NEEDS: &str =
    "希望加强手术和癌症保障 / Focus on surgery & cancer / 手術(しゅじゅつ)とがん保障(ほしょう)を重視(じゅうし)";

/// Simulation form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRequest {
    pub age: u32,
    pub gender: Gender,
    pub category: InsuranceCategory,
    pub needs: String,
}

impl Default for ProposalRequest {
    fn default() -> Self {
        Self {
            age: 30,
            gender: Gender::Male,
            category: InsuranceCategory::Medical,
            needs: DEFAULT_NEEDS.to_string(),
        }
    }
}

impl ProposalRequest {
    /// Whether the form may be submitted
    pub fn is_ready(&self) -> bool {
        self.age > 0 && !self.needs.trim().is_empty()
    }
}

/// Structured response that can be checked after decoding
pub trait Contract: DeserializeOwned {
    fn validate(&self) -> Result<(), AiError>;
}

/// Simulated underwriting result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub plan_name: String,
    /// Monthly premium in JPY
    pub premium: u32,
    pub coverage_details: String,
    pub advice: String,
}

impl Proposal {
    pub fn fallback() -> Self {
        Self {
            plan_name: "标准计划 / Standard Plan / 標準(ひょうじゅん)プラン".to_string(),
            premium: 5000,
            coverage_details: "基础保障 / Basic coverage / 基本保障(きほんほしょう)".to_string(),
            advice: "请稍后重试 / Please retry later / 後(あと)で再試行(さいしこう)してください"
                .to_string(),
        }
    }
}

impl Contract for Proposal {
    fn validate(&self) -> Result<(), AiError> {
        require_text("planName", &self.plan_name)?;
        require_text("coverageDetails", &self.coverage_details)?;
        require_text("advice", &self.advice)?;
        if self.premium == 0 {
            return Err(AiError::Schema("premium must be positive".to_string()));
        }
        Ok(())
    }
}

/// Assessment department verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjudication {
    pub status: ClaimStatus,
    /// Payout in JPY
    pub amount: u64,
    pub reasoning: String,
    #[serde(default)]
    pub next_steps: String,
}

impl Adjudication {
    pub fn fallback() -> Self {
        Self {
            status: ClaimStatus::Denied,
            amount: 0,
            reasoning: "系统错误 / System error / システムエラー".to_string(),
            next_steps: String::new(),
        }
    }

    /// Payout is zeroed unless the claim was approved
    pub fn into_assessment(self) -> Assessment {
        let payout_amount = if self.status.pays_out() { self.amount } else { 0 };
        Assessment {
            status: self.status,
            payout_amount,
            reasoning: self.reasoning,
            next_steps: self.next_steps,
        }
    }
}

impl Contract for Adjudication {
    fn validate(&self) -> Result<(), AiError> {
        require_text("reasoning", &self.reasoning)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub content: String,
}

/// Generated lesson with its visual-aid prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub title: String,
    pub chapters: Vec<Chapter>,
    pub image_prompt: String,
}

impl Contract for Lesson {
    fn validate(&self) -> Result<(), AiError> {
        require_text("title", &self.title)?;
        if self.chapters.is_empty() {
            return Err(AiError::Schema("lesson has no chapters".to_string()));
        }
        for (i, chapter) in self.chapters.iter().enumerate() {
            require_text(&format!("chapters[{}].title", i), &chapter.title)?;
            require_text(&format!("chapters[{}].content", i), &chapter.content)?;
        }
        require_text("imagePrompt", &self.image_prompt)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), AiError> {
    if value.trim().is_empty() {
        return Err(AiError::Schema(format!("field '{}' is empty", field)));
    }
    Ok(())
}

/// Decode and validate a structured response
pub fn parse_contract<T: Contract>(response: &str) -> Result<T, AiError> {
    let json = extract_json_from_response(response);
    let value: T = serde_json::from_str(json).map_err(|e| AiError::Schema(e.to_string()))?;
    value.validate()?;
    Ok(value)
}

/// Strip Markdown code fences or surrounding prose from a JSON answer
pub fn extract_json_from_response(response: &str) -> &str {
    let response = response.trim();

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map(|i| i + 1).unwrap_or(end);
            if start < end {
                return response[start..end].trim();
            }
        }
    }

    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if start < end {
            return &response[start..=end];
        }
    }

    response
}

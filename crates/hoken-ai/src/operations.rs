//! The six model operations
//!
//! Explanation, proposal and adjudication never fail: any transport or
//! schema problem is logged and replaced by the static fallback. Lesson,
//! speech and image generation return the error so the caller can show it.
//! Each call issues exactly one request.

use hoken_domain::{InsuranceProduct, Policy};
use hoken_types::{AiError, Result};
use tracing::{info, warn};

use crate::ai::prompts::{
    build_adjudication_prompt, build_explanation_prompt, build_image_prompt,
    build_lesson_prompt, build_proposal_prompt, build_speech_prompt,
};
use crate::ai::schema::{adjudication_schema, lesson_schema, proposal_schema};
use crate::client::{GenerateRequest, GenerativeModel};
use crate::contracts::{
    parse_contract, Adjudication, Contract, Lesson, Proposal, ProposalRequest,
    EXPLANATION_UNAVAILABLE,
};
use crate::media::{GeneratedImage, SpeechAudio};

/// Markdown explanation of an insurance term
pub async fn explain_term<M: GenerativeModel + ?Sized>(model: &M, topic: &str) -> String {
    let request = GenerateRequest::text(build_explanation_prompt(topic));
    let result = model
        .generate(request)
        .await
        .and_then(|response| response.require_text().map(str::to_string));
    match result {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, topic, "explanation failed, using fallback");
            EXPLANATION_UNAVAILABLE.to_string()
        }
    }
}

pub async fn generate_proposal<M: GenerativeModel + ?Sized>(
    model: &M,
    request: &ProposalRequest,
) -> Proposal {
    let prompt = build_proposal_prompt(request);
    match request_contract::<M, Proposal>(model, GenerateRequest::json(prompt, proposal_schema()))
        .await
    {
        Ok(proposal) => {
            info!(premium = proposal.premium, "proposal generated");
            proposal
        }
        Err(e) => {
            warn!(error = %e, "proposal failed, using fallback");
            Proposal::fallback()
        }
    }
}

pub async fn adjudicate_claim<M: GenerativeModel + ?Sized>(
    model: &M,
    policy: &Policy,
    incident: &str,
) -> Adjudication {
    let prompt = build_adjudication_prompt(policy, incident);
    let request = GenerateRequest::json(prompt, adjudication_schema());
    match request_contract::<M, Adjudication>(model, request).await {
        Ok(verdict) => {
            info!(
                policy = %policy.policy_number,
                status = %verdict.status,
                amount = verdict.amount,
                "claim adjudicated"
            );
            verdict
        }
        Err(e) => {
            warn!(error = %e, policy = %policy.policy_number, "adjudication failed, using fallback");
            Adjudication::fallback()
        }
    }
}

pub async fn generate_lesson<M: GenerativeModel + ?Sized>(
    model: &M,
    topic: &str,
    product: Option<&InsuranceProduct>,
) -> Result<Lesson> {
    let prompt = build_lesson_prompt(topic, product);
    let lesson: Lesson =
        request_contract(model, GenerateRequest::json(prompt, lesson_schema())).await?;
    info!(title = %lesson.title, chapters = lesson.chapters.len(), "lesson generated");
    Ok(lesson)
}

/// Narrate `text`; ruby readings are dropped before sending
pub async fn synthesize_speech<M: GenerativeModel + ?Sized>(
    model: &M,
    text: &str,
) -> Result<SpeechAudio> {
    let response = model
        .generate(GenerateRequest::audio(build_speech_prompt(text)))
        .await?;
    let payload = response
        .inline_with_prefix("audio/")
        .ok_or(AiError::EmptyResponse)?;
    let audio = SpeechAudio::from_base64_pcm(&payload.data, &payload.mime_type)?;
    info!(
        samples = audio.samples.len(),
        rate = audio.sample_rate,
        "speech synthesized"
    );
    Ok(audio)
}

pub async fn synthesize_image<M: GenerativeModel + ?Sized>(
    model: &M,
    prompt: &str,
) -> Result<GeneratedImage> {
    let response = model
        .generate(GenerateRequest::image(build_image_prompt(prompt)))
        .await?;
    let payload = response
        .inline_with_prefix("image/")
        .ok_or(AiError::EmptyResponse)?;
    let image = GeneratedImage::from_base64(&payload.data, &payload.mime_type)?;
    info!(bytes = image.bytes.len(), mime = %image.mime_type, "image synthesized");
    Ok(image)
}

async fn request_contract<M, T>(model: &M, request: GenerateRequest) -> std::result::Result<T, AiError>
where
    M: GenerativeModel + ?Sized,
    T: Contract,
{
    let response = model.generate(request).await?;
    parse_contract(response.require_text()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ResponseKind;
    use crate::testing::ScriptedModel;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use chrono::NaiveDate;
    use hoken_domain::{ClaimStatus, InsuranceCategory, PolicyDraft, PolicyHolder};
    use serde_json::json;

    fn policy() -> Policy {
        Policy::issue(
            "p1".to_string(),
            "POL-20261019-ABC123".to_string(),
            PolicyDraft {
                product_id: "prod_med_01".to_string(),
                plan_name: "医疗 / Medical / 医療(いりょう)".to_string(),
                category: InsuranceCategory::Medical,
                premium: 4000,
                coverage_details: "日额1万 / 10k per day / 日額(にちがく)1万円".to_string(),
            },
            PolicyHolder {
                contractor_name: "山田 太郎".to_string(),
                insured_name: "山田 太郎".to_string(),
                beneficiary: "山田 花子".to_string(),
            },
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_explanation_passes_text_through() {
        let model = ScriptedModel::new();
        model.push_text("## 保険料(ほけんりょう)");
        assert_eq!(explain_term(&model, "保险费").await, "## 保険料(ほけんりょう)");
        assert_eq!(model.requests().len(), 1);
        assert_eq!(model.requests()[0].kind, ResponseKind::Text);
    }

    #[tokio::test]
    async fn test_explanation_falls_back_on_error() {
        let model = ScriptedModel::new();
        model.push_error(AiError::Transport("timeout".to_string()));
        assert_eq!(explain_term(&model, "x").await, EXPLANATION_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_proposal_falls_back_on_bad_json() {
        let model = ScriptedModel::new();
        model.push_text("not json at all");
        let proposal = generate_proposal(&model, &ProposalRequest::default()).await;
        assert_eq!(proposal, Proposal::fallback());
        assert_eq!(model.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_proposal_parsed() {
        let model = ScriptedModel::new();
        model.push_json(json!({
            "planName": "安心 / Anshin / 安心(あんしん)",
            "premium": 4800,
            "coverageDetails": "手术 / Surgery / 手術(しゅじゅつ)",
            "advice": "适合 / Fits / 適(てき)している",
        }));
        let proposal = generate_proposal(&model, &ProposalRequest::default()).await;
        assert_eq!(proposal.premium, 4800);
        assert!(matches!(model.requests()[0].kind, ResponseKind::Json { .. }));
    }

    #[tokio::test]
    async fn test_adjudication_fallback_on_transport_error() {
        let model = ScriptedModel::new();
        model.push_error(AiError::Status {
            status: 503,
            body: "unavailable".to_string(),
        });
        let verdict = adjudicate_claim(&model, &policy(), "入院").await;
        assert_eq!(verdict.status, ClaimStatus::Denied);
        assert_eq!(verdict.amount, 0);
        assert!(!verdict.reasoning.is_empty());
    }

    #[tokio::test]
    async fn test_lesson_error_propagates() {
        let model = ScriptedModel::new();
        model.push_json(json!({ "title": "t" }));
        assert!(generate_lesson(&model, "保险", None).await.is_err());
    }

    #[tokio::test]
    async fn test_speech_decodes_audio_part() {
        let pcm: Vec<u8> = [10i16, -10].iter().flat_map(|s| s.to_le_bytes()).collect();
        let model = ScriptedModel::new();
        model.push_inline("audio/L16;codec=pcm;rate=24000", &STANDARD.encode(pcm));

        let audio = synthesize_speech(&model, "保険(ほけん)").await.unwrap();
        assert_eq!(audio.samples, vec![10, -10]);
        assert_eq!(model.requests()[0].kind, ResponseKind::Audio);
        assert!(!model.requests()[0].prompt.contains("ほけん"));
    }

    #[tokio::test]
    async fn test_speech_without_audio_is_error() {
        let model = ScriptedModel::new();
        model.push_text("I cannot speak");
        assert!(synthesize_speech(&model, "text").await.is_err());
    }

    #[tokio::test]
    async fn test_image_error_propagates() {
        let model = ScriptedModel::new();
        model.push_error(AiError::Transport("reset".to_string()));
        assert!(synthesize_image(&model, "diagram").await.is_err());
    }
}

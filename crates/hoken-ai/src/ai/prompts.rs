//! Prompt templates for the insurance assistant
//!
//! Every text-returning prompt embeds [`LANGUAGE_INSTRUCTION`] so the
//! answers come back as `Chinese / English / Japanese(kana)` triples that
//! the ruby annotator can render unchanged.

use hoken_domain::{ClaimStatus, InsuranceProduct, Localized, Policy, RubyText};

use crate::contracts::ProposalRequest;

use super::schema::{
    KEY_ADVICE, KEY_AMOUNT, KEY_CHAPTERS, KEY_CONTENT, KEY_COVERAGE_DETAILS, KEY_IMAGE_PROMPT,
    KEY_NEXT_STEPS, KEY_PLAN_NAME, KEY_PREMIUM, KEY_REASONING, KEY_STATUS, KEY_TITLE,
};

/// Output-format contract shared by all trilingual prompts
pub const LANGUAGE_INSTRUCTION: &str = r#"
IMPORTANT OUTPUT FORMAT:
All text fields sent to the user MUST be provided in three languages separated by slashes or newlines:
1. Chinese (Simplified)
2. English
3. Japanese (with Furigana/Reading for Kanji in parentheses immediately following the Kanji).

Example Format:
"终身保险 / Whole Life Insurance / 終身保険(しゅうしんほけん)"
"保费 / Premium / 保険料(ほけんりょう)"
"#;

/// Upper bound for explanation length, in words
pub const EXPLANATION_WORD_LIMIT: usize = 400;

/// Term explanation (Markdown, free text)
pub fn build_explanation_prompt(topic: &str) -> String {
    format!(
        r#"You are a Japanese Insurance Expert. Explain the concept of "{topic}" in the context of the Japanese insurance market.

{LANGUAGE_INSTRUCTION}

Structure the response as valid Markdown.
Use clear sections.
Explain key terms like "Hokenryo" (Premium), "Hokenkin" (Benefit), "Kaiyaku Henreikin" (Surrender Value) if applicable in the trilingual format.
Keep it educational and concise (under {EXPLANATION_WORD_LIMIT} words total).
"#
    )
}

/// Underwriting simulation for one applicant
pub fn build_proposal_prompt(request: &ProposalRequest) -> String {
    format!(
        r#"Create a simulated Japanese insurance product proposal.
User Profile: Age {age}, Gender {gender}.
Interested in: {category}.
Specific Needs: {needs}.

{LANGUAGE_INSTRUCTION}

Generate:
1. {KEY_PLAN_NAME}: A creative name in "Chinese / English / Japanese(Kana)" format.
2. {KEY_PREMIUM}: Estimated monthly premium in JPY (number only).
3. {KEY_COVERAGE_DETAILS}: Bullet points of benefits, one per line. Each point must be "CN / EN / JP(Kana)". The first line is the headline coverage amount.
4. {KEY_ADVICE}: Why this fits. Must be "CN / EN / JP(Kana)".
"#,
        age = request.age,
        gender = request.gender.label(hoken_types::Language::English),
        category = request.category.label(hoken_types::Language::English),
        needs = request.needs.trim(),
    )
}

/// Claim assessment against one policy
pub fn build_adjudication_prompt(policy: &Policy, incident: &str) -> String {
    let statuses = ClaimStatus::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"Act as a strict Claims Assessor (Satei-bu) for a Japanese Insurance Company.

Policy Details:
- Product: {product} ({category})
- Coverage: {coverage}
- Special Conditions: {conditions}
- Status: {status}

Incident Report:
{incident}

Task:
Determine if this incident is covered by the policy.
Set {KEY_STATUS} to one of: {statuses}.
If Approved, determine a realistic payout amount ({KEY_AMOUNT}) in JPY based on the coverage string.
Otherwise set {KEY_AMOUNT} to 0 and explain why.
Describe what the policyholder should do next in {KEY_NEXT_STEPS}.

{LANGUAGE_INSTRUCTION}
The '{KEY_REASONING}' and '{KEY_NEXT_STEPS}' fields MUST be in "CN / EN / JP(Kana)" format.

Output JSON.
"#,
        product = policy.product_name,
        category = policy.category,
        coverage = policy.coverage_amount,
        conditions = policy.special_conditions,
        status = policy.status,
        incident = incident.trim(),
    )
}

/// Structured lesson, optionally anchored on a catalog product
pub fn build_lesson_prompt(topic: &str, product: Option<&InsuranceProduct>) -> String {
    let context = match product {
        Some(product) => {
            let mut context = format!(
                "\nProduct Context:\n- Name: {}\n- Category: {}\n- Description: {}\n",
                product.name, product.category, product.description
            );
            for point in &product.coverage_points {
                context.push_str(&format!("- Coverage: {}\n", point));
            }
            context
        }
        None => String::new(),
    };
    format!(
        r#"You are a teacher at a Japanese insurance academy. Prepare a short lesson about "{topic}".
{context}
{LANGUAGE_INSTRUCTION}

Generate:
1. {KEY_TITLE}: The lesson title.
2. {KEY_CHAPTERS}: Three to five chapters in teaching order, each with a {KEY_TITLE} and {KEY_CONTENT} (Markdown).
3. {KEY_IMAGE_PROMPT}: One English sentence describing a clean, friendly infographic that illustrates the lesson. No text in the image.
"#,
        topic = topic.trim(),
    )
}

/// Narration request. Readings are removed so the voice does not read
/// the kana twice.
pub fn build_speech_prompt(text: &str) -> String {
    let spoken = RubyText::parse(text).base_text();
    format!(
        "Read the following insurance lesson aloud in a calm, friendly voice:\n\n{}",
        spoken.trim()
    )
}

pub fn build_image_prompt(prompt: &str) -> String {
    format!(
        "Educational infographic for an insurance lesson, flat illustration style, soft colors: {}",
        prompt.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hoken_domain::{
        InsuranceCategory, PolicyDraft, PolicyHolder, CUSTOM_PRODUCT_ID,
    };

    fn policy() -> Policy {
        Policy::issue(
            "p1".to_string(),
            "POL-20261019-ABC123".to_string(),
            PolicyDraft {
                product_id: CUSTOM_PRODUCT_ID.to_string(),
                plan_name: "安心医疗 / Peace Medical / 安心医療(あんしんいりょう)".to_string(),
                category: InsuranceCategory::Medical,
                premium: 5000,
                coverage_details: "住院日额1万日元 / 10,000 JPY per day / 入院日額(にゅういんにちがく)1万円".to_string(),
            },
            PolicyHolder {
                contractor_name: "山田 太郎".to_string(),
                insured_name: "山田 太郎".to_string(),
                beneficiary: "山田 花子".to_string(),
            },
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        )
    }

    #[test]
    fn test_explanation_prompt_embeds_topic_and_format() {
        let prompt = build_explanation_prompt("高額療養費制度");
        assert!(prompt.contains("\"高額療養費制度\""));
        assert!(prompt.contains("IMPORTANT OUTPUT FORMAT"));
        assert!(prompt.contains("under 400 words"));
    }

    #[test]
    fn test_proposal_prompt_describes_applicant() {
        let request = ProposalRequest {
            age: 42,
            gender: hoken_domain::Gender::Female,
            category: InsuranceCategory::Cancer,
            needs: "  先进医疗  ".to_string(),
        };
        let prompt = build_proposal_prompt(&request);
        assert!(prompt.contains("Age 42, Gender Female"));
        assert!(prompt.contains("Interested in: Cancer"));
        assert!(prompt.contains("Specific Needs: 先进医疗."));
        assert!(prompt.contains("planName"));
    }

    #[test]
    fn test_adjudication_prompt_lists_policy_and_statuses() {
        let prompt = build_adjudication_prompt(&policy(), "盲腸で5日間入院しました");
        assert!(prompt.contains("Coverage: 住院日额1万日元"));
        assert!(prompt.contains("Approved, Denied, UnderReview, NeedMoreInfo"));
        assert!(prompt.contains("盲腸で5日間入院しました"));
        assert!(prompt.contains("nextSteps"));
    }

    #[test]
    fn test_lesson_prompt_includes_product_context() {
        let product = hoken_domain::catalog::catalog().products()[0].clone();
        let with = build_lesson_prompt("终身保险", Some(&product));
        let without = build_lesson_prompt("终身保险", None);
        assert!(with.contains("Product Context"));
        assert!(with.contains(&product.description));
        assert!(!without.contains("Product Context"));
        assert!(without.contains("imagePrompt"));
    }

    #[test]
    fn test_speech_prompt_strips_readings() {
        let prompt = build_speech_prompt("保険料(ほけんりょう)を払(はら)う");
        assert!(prompt.ends_with("保険料を払う"));
    }
}

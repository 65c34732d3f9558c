//! Output formatting module

use hoken_ai::{Lesson, Proposal};
use hoken_domain::service::{normalize_breaks, render};
use hoken_domain::{Claim, InsuranceProduct, Localized, Policy, RubyText};
use hoken_types::{pick, Language, OutputFormat, Result, RubyStyle};
use serde::Serialize;

/// Display settings resolved from flags and config
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    pub format: OutputFormat,
    pub language: Option<Language>,
    pub ruby: RubyStyle,
}

impl Printer {
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Language selection then ruby rendering, line by line
    pub fn text(&self, raw: &str) -> String {
        normalize_breaks(raw)
            .lines()
            .map(|line| render(pick(line, self.language), self.ruby))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn label(&self, value: &impl Localized) -> String {
        match self.language {
            Some(lang) => self.text(value.label(lang)),
            None => self.text(&value.trilingual()),
        }
    }

    fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn products(&self, products: &[&InsuranceProduct]) -> Result<()> {
        if self.is_json() {
            return self.json(products);
        }
        if products.is_empty() {
            println!("No products.");
            return Ok(());
        }
        for product in products {
            println!("\n[{}] {}", product.id, self.text(&product.name));
            println!("Category: {}", self.label(&product.category));
            println!("{}", self.text(&product.description));
            for point in &product.coverage_points {
                println!("  - {}", self.text(point));
            }
        }
        Ok(())
    }

    pub fn topics(&self, topics: &[String]) -> Result<()> {
        if self.is_json() {
            return self.json(topics);
        }
        for (i, topic) in topics.iter().enumerate() {
            println!("{:>2}. {}", i + 1, self.text(topic));
        }
        Ok(())
    }

    pub fn explanation(&self, topic: &str, text: &str) -> Result<()> {
        if self.is_json() {
            return self.json(&serde_json::json!({ "topic": topic, "explanation": text }));
        }
        println!("{}", self.text(text));
        Ok(())
    }

    pub fn proposal(&self, proposal: &Proposal) -> Result<()> {
        if self.is_json() {
            return self.json(proposal);
        }
        println!("\nProposal");
        println!("========");
        println!("Plan:     {}", self.text(&proposal.plan_name));
        println!("Premium:  ¥{} / month", group_thousands(proposal.premium as u64));
        println!("\nCoverage:");
        println!("{}", self.text(&proposal.coverage_details));
        println!("\nAdvice:");
        println!("{}", self.text(&proposal.advice));
        Ok(())
    }

    pub fn policy(&self, policy: &Policy) -> Result<()> {
        if self.is_json() {
            return self.json(policy);
        }
        self.policy_block(policy);
        Ok(())
    }

    pub fn policies(&self, policies: &[&Policy]) -> Result<()> {
        if self.is_json() {
            return self.json(policies);
        }
        if policies.is_empty() {
            println!("No policies.");
            return Ok(());
        }
        println!(
            "{:<22} {:<10} {:<10} {:>10}  Plan",
            "Policy No.", "Category", "Status", "Premium"
        );
        println!("{}", "-".repeat(72));
        for policy in policies {
            println!(
                "{:<22} {:<10} {:<10} {:>10}  {}",
                policy.policy_number,
                policy.category.label(Language::English),
                policy.status.label(Language::English),
                format!("¥{}", group_thousands(policy.premium as u64)),
                self.text(&policy.product_name)
            );
        }
        Ok(())
    }

    fn policy_block(&self, policy: &Policy) {
        println!("\nPolicy {}", policy.policy_number);
        println!("==========================");
        println!("Plan:          {}", self.text(&policy.product_name));
        println!("Category:      {}", self.label(&policy.category));
        println!("Status:        {}", self.label(&policy.status));
        println!("Contractor:    {}", self.text(&policy.contractor_name));
        println!("Insured:       {}", self.text(&policy.insured_name));
        println!("Beneficiary:   {}", self.text(&policy.beneficiary));
        println!("Start date:    {}", policy.start_date);
        if let Some(expiry) = policy.expiry_date {
            println!("Expiry date:   {}", expiry);
        }
        println!("Premium:       ¥{} / month", group_thousands(policy.premium as u64));
        println!("Coverage:      {}", self.text(&policy.coverage_amount));
    }

    pub fn claim(&self, claim: &Claim) -> Result<()> {
        if self.is_json() {
            return self.json(claim);
        }
        self.claim_block(claim);
        Ok(())
    }

    pub fn claims(&self, claims: &[Claim]) -> Result<()> {
        if self.is_json() {
            return self.json(claims);
        }
        if claims.is_empty() {
            println!("{}", self.text("暂无记录 / No claims / 履歴(りれき)なし"));
            return Ok(());
        }
        for claim in claims {
            self.claim_block(claim);
        }
        Ok(())
    }

    fn claim_block(&self, claim: &Claim) {
        println!("\n{}  [{}]", claim.id, self.label(&claim.status));
        println!("Policy:   {}", claim.policy_number);
        println!("Filed:    {}", claim.filed_on);
        println!("Case:     {}", claim.incident_description);
        println!("{}", self.text(&claim.assessment));
        if claim.status.pays_out() {
            println!("Payout:   ¥{}", group_thousands(claim.payout_amount));
        }
        if !claim.next_steps.is_empty() {
            println!("Next:     {}", self.text(&claim.next_steps));
        }
    }

    pub fn lesson(&self, lesson: &Lesson) -> Result<()> {
        if self.is_json() {
            return self.json(lesson);
        }
        println!("\n{}", self.text(&lesson.title));
        println!("{}", "=".repeat(40));
        for (i, chapter) in lesson.chapters.iter().enumerate() {
            println!("\n{}. {}", i + 1, self.text(&chapter.title));
            println!("{}", self.text(&chapter.content));
        }
        Ok(())
    }

    pub fn annotation(&self, text: &str) -> Result<()> {
        let ruby = RubyText::parse(text);
        if self.is_json() {
            return self.json(&ruby);
        }
        println!("{}", ruby.render(self.ruby));
        Ok(())
    }
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

//! Issued (mock) policies

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{InsuranceCategory, Localized};

/// Product id given to policies issued from an AI simulation
pub const CUSTOM_PRODUCT_ID: &str = "custom_ai_prod";

/// Shown when the proposal carried no usable coverage line
pub const COVERAGE_SEE_DETAILS: &str = "详见条款 / See details / 詳細(しょうさい)参照(さんしょう)";

/// Policy lifecycle status.
///
/// Only `Active` is ever assigned today; the others are modeled so stored
/// data and claim checks have a closed set to work with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyStatus {
    #[default]
    Active,
    Lapsed,
    Cancelled,
    Claimed,
}

impl Localized for PolicyStatus {
    fn labels(&self) -> [&'static str; 3] {
        match self {
            PolicyStatus::Active => ["有效", "Active", "有効(ゆうこう)"],
            PolicyStatus::Lapsed => ["失效", "Lapsed", "失効(しっこう)"],
            PolicyStatus::Cancelled => ["已解约", "Cancelled", "解約済(かいやくず)み"],
            PolicyStatus::Claimed => ["已理赔", "Claimed", "支払済(しはらいず)み"],
        }
    }
}

impl std::fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label(hoken_types::Language::English))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    BankTransfer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Annual,
}

/// Payment metadata (no money ever moves)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    pub frequency: PaymentFrequency,
}

/// Names printed on the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyHolder {
    /// 契約者
    pub contractor_name: String,
    /// 被保険者
    pub insured_name: String,
    /// 受取人
    pub beneficiary: String,
}

/// Everything a policy is built from, fixed at the time of confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDraft {
    pub product_id: String,
    pub plan_name: String,
    pub category: InsuranceCategory,
    pub premium: u32,
    pub coverage_details: String,
}

/// Issued policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    /// Human-readable number, e.g. POL-20261019-3FA2C1
    pub policy_number: String,
    pub product_id: String,
    /// Plan name as proposed (trilingual)
    pub product_name: String,
    pub category: InsuranceCategory,
    pub contractor_name: String,
    pub insured_name: String,
    pub beneficiary: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    pub status: PolicyStatus,
    /// 保険料, monthly, JPY
    pub premium: u32,
    /// 保険金 headline (first line of the coverage details)
    pub coverage_amount: String,
    /// 特約 / full coverage text
    pub special_conditions: String,
    #[serde(default)]
    pub payment: PaymentInfo,
}

impl Policy {
    /// Issue a policy from a confirmed draft.
    ///
    /// Premium and coverage are copied verbatim and never recomputed.
    pub fn issue(
        id: String,
        policy_number: String,
        draft: PolicyDraft,
        holder: PolicyHolder,
        today: NaiveDate,
    ) -> Self {
        let coverage_amount = draft
            .coverage_details
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .unwrap_or(COVERAGE_SEE_DETAILS)
            .to_string();

        let expiry_date = if draft.category.is_annual() {
            today.checked_add_months(Months::new(12))
        } else {
            None
        };

        Self {
            id,
            policy_number,
            product_id: draft.product_id,
            product_name: draft.plan_name,
            category: draft.category,
            contractor_name: holder.contractor_name,
            insured_name: holder.insured_name,
            beneficiary: holder.beneficiary,
            start_date: today,
            expiry_date,
            status: PolicyStatus::Active,
            premium: draft.premium,
            coverage_amount,
            special_conditions: draft.coverage_details,
            payment: PaymentInfo::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }

    /// Match by internal id or by policy number
    pub fn matches(&self, reference: &str) -> bool {
        let reference = reference.trim();
        self.id == reference || self.policy_number.eq_ignore_ascii_case(reference)
    }
}

/// Six uppercase hex characters from a fresh v4 UUID
pub(crate) fn short_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_uppercase()
}

pub fn new_policy_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn new_policy_number(today: NaiveDate) -> String {
    format!("POL-{}-{}", today.format("%Y%m%d"), short_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder() -> PolicyHolder {
        PolicyHolder {
            contractor_name: "山田 太郎 / Yamada Taro".to_string(),
            insured_name: "山田 太郎 / Yamada Taro".to_string(),
            beneficiary: "山田 花子 / Yamada Hanako".to_string(),
        }
    }

    fn draft(category: InsuranceCategory, coverage: &str) -> PolicyDraft {
        PolicyDraft {
            product_id: CUSTOM_PRODUCT_ID.to_string(),
            plan_name: "安心プラン".to_string(),
            category,
            premium: 5000,
            coverage_details: coverage.to_string(),
        }
    }

    #[test]
    fn test_issue_copies_draft() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let policy = Policy::issue(
            "id-1".to_string(),
            "POL-1".to_string(),
            draft(InsuranceCategory::Medical, "入院: 5,000円/日\n手術: 20万円"),
            holder(),
            today,
        );
        assert_eq!(policy.premium, 5000);
        assert_eq!(policy.category, InsuranceCategory::Medical);
        assert_eq!(policy.start_date, today);
        assert_eq!(policy.expiry_date, None);
        assert_eq!(policy.status, PolicyStatus::Active);
        assert_eq!(policy.coverage_amount, "入院: 5,000円/日");
        assert_eq!(policy.special_conditions, "入院: 5,000円/日\n手術: 20万円");
    }

    #[test]
    fn test_issue_empty_coverage_uses_placeholder() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let policy = Policy::issue("a".into(), "b".into(), draft(InsuranceCategory::Life, ""), holder(), today);
        assert_eq!(policy.coverage_amount, COVERAGE_SEE_DETAILS);
    }

    #[test]
    fn test_annual_categories_expire_after_a_year() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let policy = Policy::issue("a".into(), "b".into(), draft(InsuranceCategory::Car, "x"), holder(), today);
        assert_eq!(policy.expiry_date, NaiveDate::from_ymd_opt(2027, 2, 28));
    }

    #[test]
    fn test_policy_number_format() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let number = new_policy_number(today);
        assert!(number.starts_with("POL-20261019-"));
        assert_eq!(number.len(), "POL-20261019-".len() + 6);
    }

    #[test]
    fn test_matches_id_or_number() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let policy = Policy::issue(
            "uuid-1".into(),
            "POL-20261019-ABCDEF".into(),
            draft(InsuranceCategory::Life, "x"),
            holder(),
            today,
        );
        assert!(policy.matches("uuid-1"));
        assert!(policy.matches("pol-20261019-abcdef"));
        assert!(!policy.matches("POL-0"));
    }
}

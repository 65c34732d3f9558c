//! Filed (mock) claims

use chrono::NaiveDate;
use hoken_types::{Error, Result};
use serde::{Deserialize, Serialize};

use super::policy::short_suffix;
use super::{Localized, Policy};

/// Outcome of an adjudication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    Approved,
    Denied,
    UnderReview,
    NeedMoreInfo,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::Approved,
        ClaimStatus::Denied,
        ClaimStatus::UnderReview,
        ClaimStatus::NeedMoreInfo,
    ];

    /// Wire name used in prompts and response schemas
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Denied => "Denied",
            ClaimStatus::UnderReview => "UnderReview",
            ClaimStatus::NeedMoreInfo => "NeedMoreInfo",
        }
    }

    /// Only approved claims pay out
    pub fn pays_out(&self) -> bool {
        *self == ClaimStatus::Approved
    }
}

impl Localized for ClaimStatus {
    fn labels(&self) -> [&'static str; 3] {
        match self {
            ClaimStatus::Approved => ["已批准", "Approved", "承認(しょうにん)"],
            ClaimStatus::Denied => ["已拒绝", "Denied", "不承認(ふしょうにん)"],
            ClaimStatus::UnderReview => ["审核中", "Under Review", "審査中(しんさちゅう)"],
            ClaimStatus::NeedMoreInfo => ["需补充材料", "Need More Info", "追加書類(ついかしょるい)が必要(ひつよう)"],
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assessment produced for a claim (by the model or its fallback)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub status: ClaimStatus,
    /// JPY
    pub payout_amount: u64,
    pub reasoning: String,
    pub next_steps: String,
}

/// Filed claim. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub policy_id: String,
    pub policy_number: String,
    pub incident_description: String,
    pub filed_on: NaiveDate,
    pub status: ClaimStatus,
    pub assessment: String,
    #[serde(default)]
    pub next_steps: String,
    pub payout_amount: u64,
}

impl Claim {
    /// File a claim against `policy`.
    ///
    /// The policy must be active; payouts on anything but an approval are
    /// forced to zero.
    pub fn file(
        id: String,
        policy: &Policy,
        incident_description: &str,
        filed_on: NaiveDate,
        assessment: Assessment,
    ) -> Result<Self> {
        if !policy.is_active() {
            return Err(Error::PolicyNotActive {
                policy_number: policy.policy_number.clone(),
                status: policy.status.to_string(),
            });
        }

        let payout_amount = if assessment.status.pays_out() {
            assessment.payout_amount
        } else {
            0
        };

        Ok(Self {
            id,
            policy_id: policy.id.clone(),
            policy_number: policy.policy_number.clone(),
            incident_description: incident_description.to_string(),
            filed_on,
            status: assessment.status,
            assessment: assessment.reasoning,
            next_steps: assessment.next_steps,
            payout_amount,
        })
    }
}

pub fn new_claim_id(today: NaiveDate) -> String {
    format!("CLM-{}-{}", today.format("%Y%m%d"), short_suffix())
}

//! Domain model types

pub mod category;
pub mod claim;
pub mod policy;
pub mod product;

pub use category::{Gender, InsuranceCategory, Localized};
pub use claim::{new_claim_id, Assessment, Claim, ClaimStatus};
pub use policy::{
    new_policy_id, new_policy_number, PaymentFrequency, PaymentInfo, PaymentMethod, Policy,
    PolicyDraft, PolicyHolder, PolicyStatus, COVERAGE_SEE_DETAILS, CUSTOM_PRODUCT_ID,
};
pub use product::InsuranceProduct;

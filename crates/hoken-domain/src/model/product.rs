use serde::{Deserialize, Serialize};

use super::InsuranceCategory;

/// Catalog product (immutable reference data)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceProduct {
    pub id: String,
    pub category: InsuranceCategory,
    /// Trilingual display name
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub coverage_points: Vec<String>,
}

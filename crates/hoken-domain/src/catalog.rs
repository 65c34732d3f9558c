//! Built-in product catalog
//!
//! Loaded once from the embedded `catalog.toml` and never mutated.

use std::sync::LazyLock;

use hoken_types::{Result, Trilingual};
use serde::Deserialize;

use crate::model::{InsuranceCategory, InsuranceProduct};

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    common_topics: Vec<String>,
    products: Vec<InsuranceProduct>,
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
    let raw = include_str!("catalog.toml");
    Catalog::parse(raw).expect("Failed to parse embedded catalog.toml")
});

/// The shared catalog instance
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

impl Catalog {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn products(&self) -> &[InsuranceProduct] {
        &self.products
    }

    pub fn product(&self, id: &str) -> Option<&InsuranceProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn by_category(&self, category: InsuranceCategory) -> Vec<&InsuranceProduct> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Suggested glossary topics for the learning view
    pub fn common_topics(&self) -> &[String] {
        &self.common_topics
    }
}

/// Query string used when a suggested topic is picked: its first
/// (Chinese) part
pub fn topic_query(topic: &str) -> &str {
    Trilingual::split(topic).chinese
}

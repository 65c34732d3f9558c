//! Closed enumerations and their display tables

use hoken_types::{trilingual, Language};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Localized display labels for an enumeration value.
///
/// Identity values never carry language content; these tables are the only
/// place display strings live.
pub trait Localized {
    /// Labels in [Chinese, English, Japanese] order
    fn labels(&self) -> [&'static str; 3];

    fn label(&self, lang: Language) -> &'static str {
        self.labels()[lang.index()]
    }

    /// "中文 / English / 日本語" form used in prompts and tables
    fn trilingual(&self) -> String {
        let [zh, en, ja] = self.labels();
        trilingual(zh, en, ja)
    }
}

/// Insurance category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsuranceCategory {
    Life,
    Medical,
    Cancer,
    Car,
    Fire,
    Other,
}

impl InsuranceCategory {
    pub const ALL: [InsuranceCategory; 6] = [
        InsuranceCategory::Life,
        InsuranceCategory::Medical,
        InsuranceCategory::Cancer,
        InsuranceCategory::Car,
        InsuranceCategory::Fire,
        InsuranceCategory::Other,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            InsuranceCategory::Life => "life",
            InsuranceCategory::Medical => "medical",
            InsuranceCategory::Cancer => "cancer",
            InsuranceCategory::Car => "car",
            InsuranceCategory::Fire => "fire",
            InsuranceCategory::Other => "other",
        }
    }

    /// Non-life contracts in Japan renew yearly
    pub fn is_annual(&self) -> bool {
        matches!(self, InsuranceCategory::Car | InsuranceCategory::Fire)
    }
}

impl Localized for InsuranceCategory {
    fn labels(&self) -> [&'static str; 3] {
        match self {
            InsuranceCategory::Life => ["终身保险", "Life", "生命保険(せいめいほけん)"],
            InsuranceCategory::Medical => ["医疗保险", "Medical", "医療保険(いりょうほけん)"],
            InsuranceCategory::Cancer => ["癌症保险", "Cancer", "がん保険(がんほけん)"],
            InsuranceCategory::Car => ["汽车保险", "Car", "自動車保険(じどうしゃほけん)"],
            InsuranceCategory::Fire => ["火灾保险", "Fire", "火災保険(かさいほけん)"],
            InsuranceCategory::Other => ["其他保险", "Other", "その他(た)の保険(ほけん)"],
        }
    }
}

impl std::fmt::Display for InsuranceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for InsuranceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.key() == needle)
            .ok_or_else(|| {
                let keys: Vec<_> = Self::ALL.iter().map(|c| c.key()).collect();
                format!("unknown category '{}' (expected one of: {})", s, keys.join(", "))
            })
    }
}

/// Applicant gender for the premium simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn key(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl Localized for Gender {
    fn labels(&self) -> [&'static str; 3] {
        match self {
            Gender::Male => ["男", "Male", "男性"],
            Gender::Female => ["女", "Female", "女性"],
            Gender::Other => ["其他", "Other", "その他(た)"],
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "x" => Ok(Gender::Other),
            _ => Err(format!("unknown gender '{}' (expected male, female or other)", s)),
        }
    }
}

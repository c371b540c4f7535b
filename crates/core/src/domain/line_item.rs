use serde::{Deserialize, Serialize};

use crate::domain::rates::RateSet;

/// Hierarchy depth at which a saved term override is anchored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingLevel {
    Segment,
    Category,
    Item,
}

impl PricingLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            PricingLevel::Segment => "segment",
            PricingLevel::Category => "category",
            PricingLevel::Item => "item",
        }
    }
}

impl std::fmt::Display for PricingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PricingLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "segment" => Ok(Self::Segment),
            "category" => Ok(Self::Category),
            "item" => Ok(Self::Item),
            other => Err(format!("unknown pricing level `{other}`")),
        }
    }
}

/// One persisted contract term row.
///
/// As input (re-seeding an existing contract) the level may be any of the
/// three and fields never set at that level stay `None`. As output of a
/// flatten pass the level is always `Item` and every field is materialized
/// from the resolved effective rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractLineItem {
    pub pricing_level: PricingLevel,
    pub target_id: String,
    #[serde(flatten)]
    pub rates: RateSet,
}

impl ContractLineItem {
    pub fn new(pricing_level: PricingLevel, target_id: impl Into<String>, rates: RateSet) -> Self {
        Self { pricing_level, target_id: target_id.into(), rates }
    }
}

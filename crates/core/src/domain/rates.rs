use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The five contract-term fields a hierarchy node may override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateField {
    Discount,
    Rebate,
    ConditionalRebate,
    GrowthRebate,
    QuantityCommitment,
}

impl RateField {
    pub const ALL: [RateField; 5] = [
        RateField::Discount,
        RateField::Rebate,
        RateField::ConditionalRebate,
        RateField::GrowthRebate,
        RateField::QuantityCommitment,
    ];

    /// Percentage fields are range-checked to [0, 100]; the commitment is
    /// only required to be non-negative.
    pub fn is_percentage(self) -> bool {
        !matches!(self, RateField::QuantityCommitment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RateField::Discount => "discount_pct",
            RateField::Rebate => "rebate_pct",
            RateField::ConditionalRebate => "conditional_rebate_pct",
            RateField::GrowthRebate => "growth_rebate_pct",
            RateField::QuantityCommitment => "monthly_quantity_commitment",
        }
    }
}

impl std::fmt::Display for RateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit term overrides anchored at one hierarchy node.
///
/// Every field is optional: `None` means "inherit from the ancestor path",
/// which is a different state from an explicit zero. Sentinel encodings are
/// deliberately avoided so inheritance resolution stays unambiguous.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSet {
    pub discount_pct: Option<Decimal>,
    pub rebate_pct: Option<Decimal>,
    pub conditional_rebate_pct: Option<Decimal>,
    pub growth_rebate_pct: Option<Decimal>,
    pub monthly_quantity_commitment: Option<Decimal>,
}

impl RateSet {
    pub fn get(&self, field: RateField) -> Option<Decimal> {
        match field {
            RateField::Discount => self.discount_pct,
            RateField::Rebate => self.rebate_pct,
            RateField::ConditionalRebate => self.conditional_rebate_pct,
            RateField::GrowthRebate => self.growth_rebate_pct,
            RateField::QuantityCommitment => self.monthly_quantity_commitment,
        }
    }

    pub fn set(&mut self, field: RateField, value: Option<Decimal>) {
        match field {
            RateField::Discount => self.discount_pct = value,
            RateField::Rebate => self.rebate_pct = value,
            RateField::ConditionalRebate => self.conditional_rebate_pct = value,
            RateField::GrowthRebate => self.growth_rebate_pct = value,
            RateField::QuantityCommitment => self.monthly_quantity_commitment = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        RateField::ALL.iter().all(|field| self.get(*field).is_none())
    }
}

/// One boolean per term field, used for both dirty tracking and inheritance
/// provenance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateFlags {
    pub discount: bool,
    pub rebate: bool,
    pub conditional_rebate: bool,
    pub growth_rebate: bool,
    pub quantity_commitment: bool,
}

impl RateFlags {
    pub fn get(&self, field: RateField) -> bool {
        match field {
            RateField::Discount => self.discount,
            RateField::Rebate => self.rebate,
            RateField::ConditionalRebate => self.conditional_rebate,
            RateField::GrowthRebate => self.growth_rebate,
            RateField::QuantityCommitment => self.quantity_commitment,
        }
    }

    pub fn set(&mut self, field: RateField, value: bool) {
        match field {
            RateField::Discount => self.discount = value,
            RateField::Rebate => self.rebate = value,
            RateField::ConditionalRebate => self.conditional_rebate = value,
            RateField::GrowthRebate => self.growth_rebate = value,
            RateField::QuantityCommitment => self.quantity_commitment = value,
        }
    }
}

/// The resolved term values for one item after walking its ancestor path.
///
/// All fields are concrete: a field unset along the whole path resolves to
/// zero. `inherited` records, per field, whether the winning value came from
/// an ancestor rather than the item itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveRate {
    pub discount_pct: Decimal,
    pub rebate_pct: Decimal,
    pub conditional_rebate_pct: Decimal,
    pub growth_rebate_pct: Decimal,
    pub monthly_quantity_commitment: Decimal,
    pub inherited: RateFlags,
}

impl EffectiveRate {
    pub fn get(&self, field: RateField) -> Decimal {
        match field {
            RateField::Discount => self.discount_pct,
            RateField::Rebate => self.rebate_pct,
            RateField::ConditionalRebate => self.conditional_rebate_pct,
            RateField::GrowthRebate => self.growth_rebate_pct,
            RateField::QuantityCommitment => self.monthly_quantity_commitment,
        }
    }

    pub fn set(&mut self, field: RateField, value: Decimal) {
        match field {
            RateField::Discount => self.discount_pct = value,
            RateField::Rebate => self.rebate_pct = value,
            RateField::ConditionalRebate => self.conditional_rebate_pct = value,
            RateField::GrowthRebate => self.growth_rebate_pct = value,
            RateField::QuantityCommitment => self.monthly_quantity_commitment = value,
        }
    }

    /// The set of fields carried into a flattened line item: every field,
    /// materialized even when inherited.
    pub fn materialize(&self) -> RateSet {
        RateSet {
            discount_pct: Some(self.discount_pct),
            rebate_pct: Some(self.rebate_pct),
            conditional_rebate_pct: Some(self.conditional_rebate_pct),
            growth_rebate_pct: Some(self.growth_rebate_pct),
            monthly_quantity_commitment: Some(self.monthly_quantity_commitment),
        }
    }
}

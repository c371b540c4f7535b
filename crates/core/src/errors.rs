use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::line_item::PricingLevel;
use crate::domain::rates::RateField;

/// Rejected term input. The mutation is refused and the node keeps its prior
/// value; callers surface the rejection to the user instead of failing the
/// session.
#[derive(Clone, Debug, Error, PartialEq, Serialize, Deserialize)]
pub enum RateInputError {
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: RateField, value: Decimal },
    #[error("{field} must be non-negative, got {value}")]
    NegativeQuantity { field: RateField, value: Decimal },
    #[error("node is no longer part of the hierarchy")]
    UnknownNode,
}

/// A saved reference that could not be mapped onto the live catalog while
/// building the hierarchy. Non-fatal: the entry is skipped and the rest of
/// the tree builds normally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionWarning {
    pub level: PricingLevel,
    pub target_id: String,
    pub detail: String,
}

impl ResolutionWarning {
    pub fn new(
        level: PricingLevel,
        target_id: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self { level, target_id: target_id.into(), detail: detail.into() }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::RateInputError;
    use crate::domain::rates::RateField;

    #[test]
    fn rejection_messages_name_the_field_and_value() {
        let error = RateInputError::PercentOutOfRange {
            field: RateField::Discount,
            value: Decimal::new(1015, 1),
        };
        assert_eq!(error.to_string(), "discount_pct must be between 0 and 100, got 101.5");

        let error = RateInputError::NegativeQuantity {
            field: RateField::QuantityCommitment,
            value: Decimal::NEGATIVE_ONE,
        };
        assert_eq!(error.to_string(), "monthly_quantity_commitment must be non-negative, got -1");
    }
}

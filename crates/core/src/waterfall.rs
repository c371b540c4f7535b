use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::line_item::{ContractLineItem, PricingLevel};
use crate::domain::rates::EffectiveRate;
use crate::hierarchy::{HierarchyTree, ItemFacts};

/// The full pricing waterfall for one item under its effective rate.
///
/// Prices cascade multiplicatively in a fixed order: discount, rebate,
/// conditional rebate, growth rebate. Margins are fractions (0.40 = 40%).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub normal_margin: Decimal,
    pub price_after_discount: Decimal,
    pub price_after_rebate: Decimal,
    pub price_after_conditional_rebate: Decimal,
    pub price_after_growth_rebate: Decimal,
    /// Margin at the post-conditional price. Excludes the growth rebate: a
    /// volume incentive, not a price-list change, so it must not depress the
    /// figure used for contract approval.
    pub contract_margin: Decimal,
    /// Informational worst case, with the growth rebate applied.
    pub growth_margin: Decimal,
    pub contract_margin_delta: Decimal,
    pub growth_margin_delta: Decimal,
    /// Commitment priced at the discounted, not fully rebated, rate. Rebates
    /// are realized after the fact, not at order time.
    pub commitment_dollars: Decimal,
    pub total_eaches: Decimal,
    pub net_monthly_revenue: Decimal,
}

fn rate_multiplier(pct: Decimal) -> Decimal {
    // Inputs are range-checked at entry; the clamp only guards against a
    // programmer error upstream.
    let pct = pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    Decimal::ONE - pct / Decimal::ONE_HUNDRED
}

fn margin(price: Decimal, cost: Decimal) -> Decimal {
    // Non-positive denominators yield zero margin, never NaN or an error.
    if price > Decimal::ZERO {
        (price - cost) / price
    } else {
        Decimal::ZERO
    }
}

/// Pure waterfall computation: identical inputs always produce identical
/// output, so callers are free to rerun it on every keystroke.
pub fn compute(facts: &ItemFacts, effective: &EffectiveRate) -> PricingResult {
    let list_price = facts.list_price;
    let cost = facts.cost;

    let normal_margin = margin(list_price, cost);

    let price_after_discount = list_price * rate_multiplier(effective.discount_pct);
    let price_after_rebate = price_after_discount * rate_multiplier(effective.rebate_pct);
    let price_after_conditional_rebate =
        price_after_rebate * rate_multiplier(effective.conditional_rebate_pct);
    let price_after_growth_rebate =
        price_after_conditional_rebate * rate_multiplier(effective.growth_rebate_pct);

    let contract_margin = margin(price_after_conditional_rebate, cost);
    let growth_margin = margin(price_after_growth_rebate, cost);

    let quantity = effective.monthly_quantity_commitment;

    PricingResult {
        normal_margin,
        price_after_discount,
        price_after_rebate,
        price_after_conditional_rebate,
        price_after_growth_rebate,
        contract_margin,
        growth_margin,
        contract_margin_delta: contract_margin - normal_margin,
        growth_margin_delta: growth_margin - normal_margin,
        commitment_dollars: price_after_discount * quantity,
        total_eaches: quantity * facts.eaches_per_unit_of_measure,
        net_monthly_revenue: price_after_conditional_rebate * quantity,
    }
}

/// Flattens the session tree into the persistence payload: one line item per
/// selected item, with every rate field resolved and materialized so that
/// nothing in the stored contract is left implicit.
///
/// This is the only crossing of the core/persistence boundary; the caller
/// hands the list to the external endpoint, the core never saves anything
/// itself.
pub fn flatten(tree: &HierarchyTree) -> Vec<ContractLineItem> {
    tree.items()
        .filter(|id| tree.node(*id).map(|node| node.selected).unwrap_or(false))
        .filter_map(|id| {
            let node = tree.node(id)?;
            let effective = tree.resolve(id)?;
            Some(ContractLineItem::new(
                PricingLevel::Item,
                node.target_id.clone(),
                effective.materialize(),
            ))
        })
        .collect()
}

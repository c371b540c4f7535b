use rust_decimal::Decimal;
use sqlx::Row;
use tracing::debug;

use cascade_core::domain::line_item::{ContractLineItem, PricingLevel};
use cascade_core::domain::rates::RateSet;

use super::catalog::parse_decimal;
use super::{LineItemRepository, RepositoryError};
use crate::DbPool;

pub struct SqlLineItemRepository {
    pool: DbPool,
}

impl SqlLineItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_level(raw: &str) -> Result<PricingLevel, RepositoryError> {
    raw.parse().map_err(|message: String| RepositoryError::Decode(message))
}

fn optional_decimal(
    column: &str,
    raw: Option<String>,
) -> Result<Option<Decimal>, RepositoryError> {
    raw.map(|value| parse_decimal(column, &value)).transpose()
}

fn encode(value: Option<Decimal>) -> Option<String> {
    value.map(|decimal| decimal.to_string())
}

#[async_trait::async_trait]
impl LineItemRepository for SqlLineItemRepository {
    async fn list_for_contract(
        &self,
        contract_id: &str,
    ) -> Result<Vec<ContractLineItem>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT pricing_level, target_id, discount_pct, rebate_pct,
                    conditional_rebate_pct, growth_rebate_pct, monthly_quantity_commitment
             FROM contract_line_item
             WHERE contract_id = ?
             ORDER BY id",
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let rates = RateSet {
                    discount_pct: optional_decimal("discount_pct", row.get("discount_pct"))?,
                    rebate_pct: optional_decimal("rebate_pct", row.get("rebate_pct"))?,
                    conditional_rebate_pct: optional_decimal(
                        "conditional_rebate_pct",
                        row.get("conditional_rebate_pct"),
                    )?,
                    growth_rebate_pct: optional_decimal(
                        "growth_rebate_pct",
                        row.get("growth_rebate_pct"),
                    )?,
                    monthly_quantity_commitment: optional_decimal(
                        "monthly_quantity_commitment",
                        row.get("monthly_quantity_commitment"),
                    )?,
                };
                Ok(ContractLineItem::new(
                    parse_level(&row.get::<String, _>("pricing_level"))?,
                    row.get::<String, _>("target_id"),
                    rates,
                ))
            })
            .collect()
    }

    /// Deletes and rewrites the contract's rows in one transaction, matching
    /// the save contract: the flattened set replaces whatever was stored
    /// before, all or nothing.
    async fn replace_for_contract(
        &self,
        contract_id: &str,
        line_items: &[ContractLineItem],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM contract_line_item WHERE contract_id = ?")
            .bind(contract_id)
            .execute(&mut *tx)
            .await?;

        for line_item in line_items {
            sqlx::query(
                "INSERT INTO contract_line_item
                    (contract_id, pricing_level, target_id, discount_pct, rebate_pct,
                     conditional_rebate_pct, growth_rebate_pct, monthly_quantity_commitment)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(contract_id)
            .bind(line_item.pricing_level.as_str())
            .bind(&line_item.target_id)
            .bind(encode(line_item.rates.discount_pct))
            .bind(encode(line_item.rates.rebate_pct))
            .bind(encode(line_item.rates.conditional_rebate_pct))
            .bind(encode(line_item.rates.growth_rebate_pct))
            .bind(encode(line_item.rates.monthly_quantity_commitment))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(contract_id, line_count = line_items.len(), "replaced contract line items");
        Ok(())
    }
}

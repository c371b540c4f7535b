use sqlx::Executor;
use tracing::info;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Ids the fixture file is expected to leave behind, shared with the seed
/// command's verification step.
pub const SEED_CONTRACT_ID: &str = "contract-demo-001";
pub const SEED_SEGMENT_IDS: &[&str] = &["seg-medical", "seg-surgical"];
pub const SEED_ITEM_COUNT: i64 = 6;
pub const SEED_LINE_ITEM_COUNT: i64 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub contract_id: &'static str,
    pub segment_count: i64,
    pub item_count: i64,
    pub line_item_count: i64,
}

/// Deterministic demo dataset: a small two-segment catalog and one saved
/// contract carrying overrides at all three pricing levels.
pub struct SeedDataset;

impl SeedDataset {
    pub const SQL: &'static str = include_str!("../fixtures/seed_dataset.sql");

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        let result = Self::verify(pool).await?;
        info!(
            contract_id = result.contract_id,
            items = result.item_count,
            line_items = result.line_item_count,
            "seed dataset loaded"
        );
        Ok(result)
    }

    /// Counts the seeded rows and fails with a decode error when the fixture
    /// file and the expectations drift apart.
    pub async fn verify(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let segment_count = count(pool, "SELECT COUNT(*) FROM segment").await?;
        let item_count = count(pool, "SELECT COUNT(*) FROM item").await?;
        let line_item_count = count(
            pool,
            "SELECT COUNT(*) FROM contract_line_item WHERE contract_id = 'contract-demo-001'",
        )
        .await?;

        if segment_count < SEED_SEGMENT_IDS.len() as i64 {
            return Err(RepositoryError::Decode(format!(
                "seed verification failed: expected at least {} segments, found {segment_count}",
                SEED_SEGMENT_IDS.len()
            )));
        }
        if item_count < SEED_ITEM_COUNT {
            return Err(RepositoryError::Decode(format!(
                "seed verification failed: expected at least {SEED_ITEM_COUNT} items, found {item_count}"
            )));
        }
        if line_item_count != SEED_LINE_ITEM_COUNT {
            return Err(RepositoryError::Decode(format!(
                "seed verification failed: expected {SEED_LINE_ITEM_COUNT} line items, found {line_item_count}"
            )));
        }

        Ok(SeedResult {
            contract_id: SEED_CONTRACT_ID,
            segment_count,
            item_count,
            line_item_count,
        })
    }
}

async fn count(pool: &DbPool, query: &str) -> Result<i64, RepositoryError> {
    use sqlx::Row;

    let row = sqlx::query(query).fetch_one(pool).await?;
    Ok(row.get::<i64, _>(0))
}

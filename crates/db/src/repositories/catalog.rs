use rust_decimal::Decimal;
use sqlx::Row;

use cascade_core::domain::catalog::{
    CategoryId, CategoryRecord, ItemId, ItemRecord, SegmentId, SegmentRecord,
};

use super::{CatalogRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn parse_decimal(column: &str, raw: &str) -> Result<Decimal, RepositoryError> {
    raw.parse().map_err(|_| {
        RepositoryError::Decode(format!("column `{column}` holds a non-decimal value `{raw}`"))
    })
}

#[async_trait::async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn list_segments(&self) -> Result<Vec<SegmentRecord>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name FROM segment ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| SegmentRecord {
                id: SegmentId(row.get("id")),
                name: row.get("name"),
            })
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, segment_id FROM category ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryRecord {
                id: CategoryId(row.get("id")),
                name: row.get("name"),
                segment_id: SegmentId(row.get("segment_id")),
            })
            .collect())
    }

    async fn list_items(&self) -> Result<Vec<ItemRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, category_id, list_price, cost, eaches_per_unit_of_measure
             FROM item ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ItemRecord {
                    id: ItemId(row.get("id")),
                    name: row.get("name"),
                    category_id: CategoryId(row.get("category_id")),
                    list_price: parse_decimal("list_price", &row.get::<String, _>("list_price"))?,
                    cost: parse_decimal("cost", &row.get::<String, _>("cost"))?,
                    eaches_per_unit_of_measure: parse_decimal(
                        "eaches_per_unit_of_measure",
                        &row.get::<String, _>("eaches_per_unit_of_measure"),
                    )?,
                })
            })
            .collect()
    }
}

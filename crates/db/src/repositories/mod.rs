use async_trait::async_trait;
use thiserror::Error;

use cascade_core::domain::catalog::{CategoryRecord, ItemRecord, SegmentRecord};
use cascade_core::domain::line_item::ContractLineItem;

pub mod catalog;
pub mod line_item;
pub mod memory;

pub use catalog::SqlCatalogRepository;
pub use line_item::SqlLineItemRepository;
pub use memory::{InMemoryCatalogRepository, InMemoryLineItemRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Read-only source for the taxonomy lists a pricing session is seeded from.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_segments(&self) -> Result<Vec<SegmentRecord>, RepositoryError>;
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepositoryError>;
    async fn list_items(&self) -> Result<Vec<ItemRecord>, RepositoryError>;
}

/// Persistence boundary for a contract's term rows. Saving replaces the
/// prior set wholesale; there is no partial update surface.
#[async_trait]
pub trait LineItemRepository: Send + Sync {
    async fn list_for_contract(
        &self,
        contract_id: &str,
    ) -> Result<Vec<ContractLineItem>, RepositoryError>;

    async fn replace_for_contract(
        &self,
        contract_id: &str,
        line_items: &[ContractLineItem],
    ) -> Result<(), RepositoryError>;
}

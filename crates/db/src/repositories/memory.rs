use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cascade_core::domain::catalog::{CategoryRecord, ItemRecord, SegmentRecord};
use cascade_core::domain::line_item::ContractLineItem;

use super::{CatalogRepository, LineItemRepository, RepositoryError};

/// Catalog backed by plain vectors, for tests and offline runs.
#[derive(Clone, Default)]
pub struct InMemoryCatalogRepository {
    segments: Vec<SegmentRecord>,
    categories: Vec<CategoryRecord>,
    items: Vec<ItemRecord>,
}

impl InMemoryCatalogRepository {
    pub fn new(
        segments: Vec<SegmentRecord>,
        categories: Vec<CategoryRecord>,
        items: Vec<ItemRecord>,
    ) -> Self {
        Self { segments, categories, items }
    }
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_segments(&self) -> Result<Vec<SegmentRecord>, RepositoryError> {
        Ok(self.segments.clone())
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepositoryError> {
        Ok(self.categories.clone())
    }

    async fn list_items(&self) -> Result<Vec<ItemRecord>, RepositoryError> {
        Ok(self.items.clone())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryLineItemRepository {
    by_contract: Arc<Mutex<HashMap<String, Vec<ContractLineItem>>>>,
}

#[async_trait::async_trait]
impl LineItemRepository for InMemoryLineItemRepository {
    async fn list_for_contract(
        &self,
        contract_id: &str,
    ) -> Result<Vec<ContractLineItem>, RepositoryError> {
        let store = match self.by_contract.lock() {
            Ok(store) => store,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(store.get(contract_id).cloned().unwrap_or_default())
    }

    async fn replace_for_contract(
        &self,
        contract_id: &str,
        line_items: &[ContractLineItem],
    ) -> Result<(), RepositoryError> {
        let mut store = match self.by_contract.lock() {
            Ok(store) => store,
            Err(poisoned) => poisoned.into_inner(),
        };
        store.insert(contract_id.to_string(), line_items.to_vec());
        Ok(())
    }
}

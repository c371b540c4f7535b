pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, DbPool};
pub use fixtures::{SeedDataset, SeedResult};
pub use repositories::{
    CatalogRepository, InMemoryCatalogRepository, InMemoryLineItemRepository, LineItemRepository,
    RepositoryError, SqlCatalogRepository, SqlLineItemRepository,
};

use serde::Serialize;

use cascade_core::config::LoadOptions;
use cascade_core::session::{PricedLine, PricingSession};
use cascade_core::ResolutionWarning;
use cascade_db::{
    CatalogRepository, LineItemRepository, SqlCatalogRepository, SqlLineItemRepository,
};

use crate::commands::{block_on, connect_and_migrate, load_config, CommandResult};

#[derive(Debug, Serialize)]
struct PriceReport {
    command: &'static str,
    status: &'static str,
    contract_id: String,
    warnings: Vec<ResolutionWarning>,
    lines: Vec<PricedLine>,
    flattened: Vec<cascade_core::ContractLineItem>,
}

/// Opens a pricing session for one contract and reports the resolved,
/// recomputed waterfall for every item plus the payload a save would
/// persist. Read-only: nothing is written back.
pub fn run(options: LoadOptions, contract_id: &str) -> CommandResult {
    let config = match load_config("price", options) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let outcome = block_on("price", async {
        let pool = connect_and_migrate(&config).await?;
        let catalog = SqlCatalogRepository::new(pool.clone());
        let line_items = SqlLineItemRepository::new(pool.clone());

        let segments = catalog
            .list_segments()
            .await
            .map_err(|error| ("catalog_fetch", error.to_string(), 6u8))?;
        let categories = catalog
            .list_categories()
            .await
            .map_err(|error| ("catalog_fetch", error.to_string(), 6u8))?;
        let items = catalog
            .list_items()
            .await
            .map_err(|error| ("catalog_fetch", error.to_string(), 6u8))?;
        let saved = line_items
            .list_for_contract(contract_id)
            .await
            .map_err(|error| ("line_item_fetch", error.to_string(), 6u8))?;
        pool.close().await;

        let session = PricingSession::open(&segments, &categories, &items, &saved);
        Ok(PriceReport {
            command: "price",
            status: "ok",
            contract_id: contract_id.to_string(),
            warnings: session.warnings().to_vec(),
            lines: session.priced_lines(),
            flattened: session.flatten(),
        })
    });

    match outcome {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(output) => CommandResult { exit_code: 0, output },
            Err(error) => CommandResult::failure(
                "price",
                "serialization",
                format!("could not serialize price report: {error}"),
                7,
            ),
        },
        Err(result) => result,
    }
}

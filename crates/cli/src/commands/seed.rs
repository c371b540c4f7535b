use cascade_core::config::LoadOptions;
use cascade_db::SeedDataset;

use crate::commands::{block_on, connect_and_migrate, load_config, CommandResult};

pub fn run(options: LoadOptions) -> CommandResult {
    let config = match load_config("seed", options) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let outcome = block_on("seed", async {
        let pool = connect_and_migrate(&config).await?;
        let result = SeedDataset::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 6u8))?;
        pool.close().await;
        Ok(result)
    });

    match outcome {
        Ok(result) => CommandResult::success(
            "seed",
            format!(
                "seeded {} segments, {} items, and contract {} with {} line items",
                result.segment_count, result.item_count, result.contract_id, result.line_item_count
            ),
        ),
        Err(result) => result,
    }
}

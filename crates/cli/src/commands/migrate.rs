use cascade_core::config::LoadOptions;

use crate::commands::{block_on, connect_and_migrate, load_config, CommandResult};

pub fn run(options: LoadOptions) -> CommandResult {
    let config = match load_config("migrate", options) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let outcome = block_on("migrate", async {
        let pool = connect_and_migrate(&config).await?;
        pool.close().await;
        Ok(())
    });

    match outcome {
        Ok(()) => CommandResult::success("migrate", "applied pending migrations"),
        Err(result) => result,
    }
}

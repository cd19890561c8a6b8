use callcenter_core::config::LoadOptions;
use callcenter_db::migrations;

use crate::bootstrap::{block_on, load_config, open_database};
use crate::commands::CommandResult;

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match load_config(options) {
        Ok(config) => config,
        Err(failure) => return failure.into_result("migrate"),
    };

    let result = block_on(async {
        let pool = open_database(&config).await?;
        pool.close().await;
        Ok(())
    });

    match result {
        Ok(()) => CommandResult::success(
            "migrate",
            format!("applied pending migrations ({} known)", migrations::known_versions()),
        ),
        Err(failure) => failure.into_result("migrate"),
    }
}

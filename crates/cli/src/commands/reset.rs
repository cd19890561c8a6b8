use callcenter_core::config::LoadOptions;
use callcenter_db::{HistoryRepository, SqlHistoryRepository};

use crate::bootstrap::{block_on, load_config, open_database, Failure};
use crate::commands::CommandResult;

/// Clears the stored log. Survey state only lives as long as a chat process.
pub fn run(options: &LoadOptions, user_id: &str) -> CommandResult {
    let config = match load_config(options) {
        Ok(config) => config,
        Err(failure) => return failure.into_result("reset"),
    };

    let result = block_on(async {
        let pool = open_database(&config).await?;
        let removed = SqlHistoryRepository::new(pool.clone())
            .clear(user_id)
            .await
            .map_err(Failure::repository)?;
        pool.close().await;
        Ok(removed)
    });

    match result {
        Ok(removed) => CommandResult::success(
            "reset",
            format!("removed {removed} stored messages for {user_id}"),
        ),
        Err(failure) => failure.into_result("reset"),
    }
}

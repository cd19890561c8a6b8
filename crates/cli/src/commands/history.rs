use callcenter_core::config::LoadOptions;
use callcenter_db::{HistoryRepository, SqlHistoryRepository};

use crate::bootstrap::{block_on, load_config, open_database, Failure};
use crate::commands::CommandResult;

pub fn run(options: &LoadOptions, user_id: &str, limit: Option<u32>) -> CommandResult {
    let config = match load_config(options) {
        Ok(config) => config,
        Err(failure) => return failure.into_result("history"),
    };

    let result = block_on(async {
        let pool = open_database(&config).await?;
        let lines = SqlHistoryRepository::new(pool.clone())
            .list(user_id, limit)
            .await
            .map_err(Failure::repository)?;
        pool.close().await;
        serde_json::to_value(&lines)
            .map(|data| (lines.len(), data))
            .map_err(|error| Failure::new("serialization", error.to_string(), 10))
    });

    match result {
        Ok((count, data)) => CommandResult::success_with_data(
            "history",
            format!("{count} stored messages for {user_id}"),
            Some(data),
        ),
        Err(failure) => failure.into_result("history"),
    }
}

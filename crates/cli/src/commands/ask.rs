use serde_json::json;

use callcenter_core::config::LoadOptions;

use crate::bootstrap::{block_on, load_config, open_service, Failure};
use crate::commands::CommandResult;

/// One message in, one reply out. The reply is the `message` field.
pub fn run(options: &LoadOptions, user_id: &str, message: &str) -> CommandResult {
    if message.trim().is_empty() {
        return CommandResult::failure("ask", "invalid_input", "message must not be empty", 9);
    }
    let config = match load_config(options) {
        Ok(config) => config,
        Err(failure) => return failure.into_result("ask"),
    };

    let result = block_on(async {
        let (service, pool) = open_service(&config).await?;
        let reply = service.send(user_id, message).await.map_err(Failure::repository)?;
        let panel = service.satisfaction(user_id).await;
        pool.close().await;
        Ok((reply, panel))
    });

    match result {
        Ok((reply, panel)) => CommandResult::success_with_data(
            "ask",
            reply,
            Some(json!({ "user_id": user_id, "satisfaction": panel })),
        ),
        Err(failure) => failure.into_result("ask"),
    }
}

use callcenter_core::config::LoadOptions;

use crate::bootstrap::load_config;
use crate::commands::CommandResult;

/// Effective configuration after file, environment and flag overrides.
pub fn run(options: &LoadOptions) -> CommandResult {
    match load_config(options) {
        Ok(config) => CommandResult::success_with_data(
            "config",
            "effective config (source precedence: flags > env > file > default)",
            Some(config.redacted()),
        ),
        Err(failure) => failure.into_result("config"),
    }
}

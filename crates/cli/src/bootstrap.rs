use std::future::Future;
use std::sync::Arc;

use callcenter_agent::{client_from_config, AgentRuntime};
use callcenter_core::backend::MockTelecomBackend;
use callcenter_core::config::{AppConfig, LoadOptions};
use callcenter_db::{connect_with_config, migrations, DbPool, SqlHistoryRepository};

use crate::commands::CommandResult;
use crate::session::ChatService;

/// A command that stopped early, with the class and exit code it reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub error_class: &'static str,
    pub message: String,
    pub exit_code: u8,
}

impl Failure {
    pub fn new(error_class: &'static str, message: impl Into<String>, exit_code: u8) -> Self {
        Self { error_class, message: message.into(), exit_code }
    }

    pub fn config(error: impl std::fmt::Display) -> Self {
        Self::new("config_validation", format!("configuration issue: {error}"), 2)
    }

    pub fn db_connectivity(error: impl std::fmt::Display) -> Self {
        Self::new("db_connectivity", error.to_string(), 4)
    }

    pub fn migration(error: impl std::fmt::Display) -> Self {
        Self::new("migration", error.to_string(), 5)
    }

    pub fn agent_init(error: impl std::fmt::Display) -> Self {
        Self::new("agent_init", error.to_string(), 6)
    }

    pub fn repository(error: impl std::fmt::Display) -> Self {
        Self::new("repository", error.to_string(), 7)
    }

    pub fn session(error: impl std::fmt::Display) -> Self {
        Self::new("chat_session", error.to_string(), 8)
    }

    pub fn into_result(self, command: &str) -> CommandResult {
        CommandResult::failure(command, self.error_class, self.message, self.exit_code)
    }
}

pub fn load_config(options: &LoadOptions) -> Result<AppConfig, Failure> {
    AppConfig::load(options.clone()).map_err(Failure::config)
}

/// Runs `work` on a fresh current-thread runtime.
pub fn block_on<T, F>(work: F) -> Result<T, Failure>
where
    F: Future<Output = Result<T, Failure>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| {
            Failure::new("runtime_init", format!("failed to initialize async runtime: {error}"), 3)
        })?;
    runtime.block_on(work)
}

pub async fn open_database(config: &AppConfig) -> Result<DbPool, Failure> {
    let pool = connect_with_config(&config.database).await.map_err(Failure::db_connectivity)?;
    migrations::run_pending(&pool).await.map_err(Failure::migration)?;
    Ok(pool)
}

pub fn build_runtime(config: &AppConfig) -> Result<AgentRuntime, Failure> {
    let llm = client_from_config(&config.llm).map_err(Failure::agent_init)?;
    AgentRuntime::builder(llm, Arc::new(MockTelecomBackend::new()))
        .with_config(&config.agent)
        .build()
        .map_err(Failure::agent_init)
}

/// Database, migrations, language model and engine wired into one chat service.
pub async fn open_service(config: &AppConfig) -> Result<(ChatService, DbPool), Failure> {
    let pool = open_database(config).await?;
    let runtime = build_runtime(config)?;
    tracing::info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        llm_provider = config.llm.provider.as_str(),
        "chat service ready"
    );
    let history = Arc::new(SqlHistoryRepository::new(pool.clone()));
    Ok((ChatService::new(runtime, history), pool))
}

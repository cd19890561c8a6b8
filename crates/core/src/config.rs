use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::telecom::BillingPeriod;

pub const DEFAULT_CONFIG_FILE: &str = "callcenter.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub agent: AgentConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Period used when the keyword classifier plans a billing lookup.
    pub default_billing_period: BillingPeriod,
    /// Seeds canned-reply selection; unset means thread-local randomness.
    pub reply_seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    Ollama,
    Offline,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Offline => "offline",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub llm_provider: Option<LlmProvider>,
    pub llm_model: Option<String>,
    pub llm_base_url: Option<String>,
    pub reply_seed: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://callcenter.db?mode=rwc".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            llm: LlmConfig {
                provider: LlmProvider::Ollama,
                api_key: None,
                base_url: Some("http://localhost:11434".to_string()),
                model: "llama3".to_string(),
                timeout_secs: 120,
            },
            agent: AgentConfig {
                default_billing_period: BillingPeriod::Last3Months,
                reply_seed: None,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "offline" => Ok(Self::Offline),
            other => Err(ConfigError::Validation(format!(
                "unsupported llm provider `{other}` (expected ollama|offline)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            if let Some(llm_api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(llm_api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = Some(base_url);
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(agent) = patch.agent {
            if let Some(period) = agent.default_billing_period {
                self.agent.default_billing_period =
                    parse_billing_period("agent.default_billing_period", &period)?;
            }
            if let Some(reply_seed) = agent.reply_seed {
                self.agent.reply_seed = Some(reply_seed);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CALLCENTER_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("CALLCENTER_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("CALLCENTER_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("CALLCENTER_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("CALLCENTER_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("CALLCENTER_LLM_PROVIDER") {
            self.llm.provider = value.parse()?;
        }
        if let Some(value) = read_env("CALLCENTER_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("CALLCENTER_LLM_BASE_URL") {
            self.llm.base_url = Some(value);
        }
        if let Some(value) = read_env("CALLCENTER_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("CALLCENTER_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("CALLCENTER_LLM_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("CALLCENTER_AGENT_DEFAULT_BILLING_PERIOD") {
            self.agent.default_billing_period = parse_billing_period(
                "agent.default_billing_period (CALLCENTER_AGENT_DEFAULT_BILLING_PERIOD)",
                &value,
            )?;
        }
        if let Some(value) = read_env("CALLCENTER_AGENT_REPLY_SEED") {
            self.agent.reply_seed = Some(parse_u64("CALLCENTER_AGENT_REPLY_SEED", &value)?);
        }

        let log_level =
            read_env("CALLCENTER_LOGGING_LEVEL").or_else(|| read_env("CALLCENTER_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CALLCENTER_LOGGING_FORMAT").or_else(|| read_env("CALLCENTER_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(llm_provider) = overrides.llm_provider {
            self.llm.provider = llm_provider;
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(llm_base_url) = overrides.llm_base_url {
            self.llm.base_url = Some(llm_base_url);
        }
        if let Some(reply_seed) = overrides.reply_seed {
            self.agent.reply_seed = Some(reply_seed);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_llm(&self.llm)?;
        validate_logging(&self.logging)?;
        Ok(())
    }

    /// Effective configuration with secrets masked, for operator display.
    pub fn redacted(&self) -> Value {
        json!({
            "database": {
                "url": self.database.url,
                "max_connections": self.database.max_connections,
                "timeout_secs": self.database.timeout_secs,
            },
            "llm": {
                "provider": self.llm.provider.as_str(),
                "base_url": self.llm.base_url,
                "model": self.llm.model,
                "api_key": self.llm.api_key.as_ref().map(|_| "***"),
                "timeout_secs": self.llm.timeout_secs,
            },
            "agent": {
                "default_billing_period": self.agent.default_billing_period.as_str(),
                "reply_seed": self.agent.reply_seed,
            },
            "logging": {
                "level": self.logging.level,
                "format": self.logging.format.as_str(),
            },
        })
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    match llm.provider {
        LlmProvider::Ollama => {
            let base_url = llm.base_url.as_deref().map(str::trim).unwrap_or_default();
            if base_url.is_empty() {
                return Err(ConfigError::Validation(
                    "llm.base_url is required for ollama provider".to_string(),
                ));
            }
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::Validation(
                    "llm.base_url must start with http:// or https://".to_string(),
                ));
            }
            if llm.model.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "llm.model is required for ollama provider".to_string(),
                ));
            }
            let blank_key =
                llm.api_key.as_ref().map(|key| key.expose_secret().trim().is_empty());
            if blank_key == Some(true) {
                return Err(ConfigError::Validation(
                    "llm.api_key must not be blank when set".to_string(),
                ));
            }
        }
        LlmProvider::Offline => {}
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_billing_period(key: &str, value: &str) -> Result<BillingPeriod, ConfigError> {
    BillingPeriod::from_code(value).ok_or_else(|| {
        ConfigError::Validation(format!(
            "{key} must be one of {} (got `{value}`)",
            BillingPeriod::CODES.join("|")
        ))
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    llm: Option<LlmPatch>,
    agent: Option<AgentPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct AgentPatch {
    default_billing_period: Option<String>,
    reply_seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LlmProvider, LoadOptions, LogFormat};
    use crate::domain::telecom::BillingPeriod;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_are_valid_without_a_file() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.llm.provider == LlmProvider::Ollama, "default provider should be ollama")?;
        ensure(
            config.agent.default_billing_period == BillingPeriod::Last3Months,
            "default billing period should be last_3_months",
        )?;
        ensure(config.agent.reply_seed.is_none(), "reply seed should be unset by default")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_CALLCENTER_LLM_KEY", "key-from-env");
        env::set_var("TEST_CALLCENTER_MODEL", "llama3.1");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("callcenter.toml");
            fs::write(
                &path,
                r#"
[llm]
api_key = "${TEST_CALLCENTER_LLM_KEY}"
model = "${TEST_CALLCENTER_MODEL}"

[agent]
default_billing_period = "current"
reply_seed = 42
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.llm.api_key.as_ref().map(|key| key.expose_secret().to_string())
                    == Some("key-from-env".to_string()),
                "api key should be interpolated from environment",
            )?;
            ensure(config.llm.model == "llama3.1", "model should be interpolated")?;
            ensure(
                config.agent.default_billing_period == BillingPeriod::Current,
                "billing period should come from the file",
            )?;
            ensure(config.agent.reply_seed == Some(42), "reply seed should come from the file")
        })();

        clear_vars(&["TEST_CALLCENTER_LLM_KEY", "TEST_CALLCENTER_MODEL"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("callcenter.toml");
        fs::write(&path, "[llm]\nmodel = \"${CALLCENTER_TEST_UNSET_VARIABLE}\"\n")
            .map_err(|err| err.to_string())?;

        match AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() }) {
            Err(ConfigError::MissingEnvInterpolation { var }) => ensure(
                var == "CALLCENTER_TEST_UNSET_VARIABLE",
                "error should name the missing variable",
            ),
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected interpolation failure".to_string()),
        }
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CALLCENTER_LOG_LEVEL", "warn");
        env::set_var("CALLCENTER_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )
        })();

        clear_vars(&["CALLCENTER_LOG_LEVEL", "CALLCENTER_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CALLCENTER_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("CALLCENTER_LLM_PROVIDER", "offline");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("callcenter.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://from-file.db"
max_connections = 2

[llm]
provider = "ollama"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.database.max_connections == 2, "file value should beat defaults")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.llm.provider == LlmProvider::Offline,
                "env provider should win over file and defaults",
            )
        })();

        clear_vars(&["CALLCENTER_DATABASE_URL", "CALLCENTER_LLM_PROVIDER"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CALLCENTER_LLM_TIMEOUT_SECS", "0");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("llm.timeout_secs")
            );
            ensure(has_message, "validation failure should mention llm.timeout_secs")
        })();

        clear_vars(&["CALLCENTER_LLM_TIMEOUT_SECS"]);
        result
    }

    #[test]
    fn invalid_billing_period_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CALLCENTER_AGENT_DEFAULT_BILLING_PERIOD", "Temmuz");

        let result = match AppConfig::load(LoadOptions::default()) {
            Err(ConfigError::Validation(message)) => ensure(
                message.contains("agent.default_billing_period")
                    && message.contains("CALLCENTER_AGENT_DEFAULT_BILLING_PERIOD"),
                "validation failure should name the config path and the env key",
            ),
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected validation failure".to_string()),
        };

        clear_vars(&["CALLCENTER_AGENT_DEFAULT_BILLING_PERIOD"]);
        result
    }

    #[test]
    fn invalid_billing_period_in_file_names_the_config_path() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("callcenter.toml");
        fs::write(&path, "[agent]\ndefault_billing_period = \"Temmuz\"\n")
            .map_err(|err| err.to_string())?;

        match AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() }) {
            Err(ConfigError::Validation(message)) => ensure(
                message.contains("agent.default_billing_period") && message.contains("Temmuz"),
                "validation failure should name the config path and the bad value",
            ),
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected validation failure".to_string()),
        }
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug_or_redaction() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CALLCENTER_LLM_API_KEY", "sk-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");
            let redacted = config.redacted().to_string();

            ensure(!debug.contains("sk-secret-value"), "debug output should not contain api key")?;
            ensure(
                !redacted.contains("sk-secret-value"),
                "redacted output should not contain api key",
            )?;
            ensure(redacted.contains("***"), "redacted output should mask the api key")
        })();

        clear_vars(&["CALLCENTER_LLM_API_KEY"]);
        result
    }
}

pub mod bootstrap;
pub mod commands;
pub mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use callcenter_core::config::{AppConfig, ConfigOverrides, LlmProvider, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "callcenter",
    about = "Telecom support assistant CLI",
    long_about = "Chat with the Turkish telecom support assistant, inspect stored conversations, and operate its database and configuration.",
    after_help = "Examples:\n  callcenter chat --user 05551234567\n  callcenter ask --user 05559876543 \"Faturamı öğrenmek istiyorum\"\n  callcenter history --user 05551234567 --limit 10"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    #[arg(long, global = true, help = "Path to a callcenter.toml file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override database.url")]
    database_url: Option<String>,
    #[arg(long, global = true, help = "Override llm.provider (ollama|offline)")]
    llm_provider: Option<LlmProvider>,
    #[arg(long, global = true, help = "Override logging.level")]
    log_level: Option<String>,
}

impl GlobalArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                database_url: self.database_url.clone(),
                log_level: self.log_level.clone(),
                llm_provider: self.llm_provider,
                ..ConfigOverrides::default()
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive chat session (/history, /rating, /reset, /quit)")]
    Chat {
        #[arg(long, help = "Customer phone number used as the session id")]
        user: String,
    },
    #[command(about = "Send one message and print the reply as JSON")]
    Ask {
        #[arg(long)]
        user: String,
        message: String,
    },
    #[command(about = "Print the stored chat history of a customer")]
    History {
        #[arg(long)]
        user: String,
        #[arg(long, help = "Only the newest N lines")]
        limit: Option<u32>,
    },
    #[command(about = "Delete stored chat history and satisfaction data of a customer")]
    Reset {
        #[arg(long)]
        user: String,
    },
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Print the effective configuration with secrets redacted")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.global.load_options();

    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Chat { user } => commands::chat::run(&options, &user),
        Command::Ask { user, message } => commands::ask::run(&options, &user, &message),
        Command::History { user, limit } => commands::history::run(&options, &user, limit),
        Command::Reset { user } => commands::reset::run(&options, &user),
        Command::Migrate => commands::migrate::run(&options),
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so command output on stdout stays machine readable.
pub fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let installed = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if installed.is_err() {
        tracing::debug!(event_name = "system.logging.already_installed", "subscriber already set");
    }
}

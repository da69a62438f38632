use clap::{Parser, Subcommand};
use std::sync::Arc;

use riel_bot::application::messaging::Dispatcher;
use riel_bot::domain::entities::{Inbound, Outgoing};
use riel_bot::domain::traits::{ChartRenderer, LedgerStore, Transport, UserDirectory};
use riel_bot::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use riel_bot::infrastructure::chart::SvgPieChart;
use riel_bot::infrastructure::config::Config;
use riel_bot::infrastructure::database::Database;

#[derive(Parser)]
#[command(name = "riel-bot")]
#[command(about = "A Telegram expense-tracking bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config, cli.token);
        }
        Commands::Version => {
            println!("riel-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config(cli.config);
        }
    }
}

fn run_bot(config_path: String, token_override: Option<String>) {
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting {}", config.bot.name);

    let database = match Database::new(&config.database.path) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            return;
        }
    };
    tracing::info!("Database initialized");

    let ledger: Arc<dyn LedgerStore> = database.clone();
    let directory: Arc<dyn UserDirectory> = database;
    let chart: Arc<dyn ChartRenderer> = Arc::new(SvgPieChart::new());
    let dispatcher = Dispatcher::new(ledger, directory, chart, config.access_settings());

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return;
        }
    };

    if let Some(token) = token_override.or_else(|| config.bot.token.clone()) {
        rt.block_on(run_telegram_bot(token, dispatcher));
    } else {
        tracing::warn!("No bot token configured, running in console mode");
        let handle = config.access.owner_handle.clone();
        rt.block_on(run_console_bot(dispatcher, handle));
    }
}

async fn run_telegram_bot(token: String, dispatcher: Dispatcher) {
    let mut bot = TelegramAdapter::new(token);

    if let Err(e) = bot.fetch_bot_info().await {
        tracing::error!("Failed to fetch bot info: {}", e);
        return;
    }
    tracing::info!("Bot started: @{}", bot.bot_info().username);

    if let Err(e) = bot.register_commands().await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let mut offset: i64 = 0;
    let timeout_seconds = 30;

    tracing::info!("Starting message loop...");

    loop {
        match bot.get_updates(offset, timeout_seconds).await {
            Ok(updates) => {
                for update in &updates {
                    if let Some(msg) = &update.message {
                        let inbound = msg.to_inbound();
                        let replies = dispatcher.dispatch(&inbound).await;
                        deliver(&bot, replies).await;
                    }
                }
                if !updates.is_empty() {
                    offset = TelegramAdapter::get_next_offset(&updates);
                }
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(dispatcher: Dispatcher, handle: String) {
    let bot = ConsoleAdapter::new();
    println!("riel-bot console mode, acting as @{}. Try /add 50 USD Lunch", handle);

    loop {
        let Some(line) = bot.read_line("> ") else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        let inbound = Inbound::new(0, handle.clone(), line);
        let replies = dispatcher.dispatch(&inbound).await;
        deliver(&bot, replies).await;
    }
}

async fn deliver<T: Transport>(transport: &T, replies: Vec<Outgoing>) {
    for reply in replies {
        let result = match &reply {
            Outgoing::Text { chat, body } => transport.send_text(*chat, body).await,
            Outgoing::Photo { chat, bytes } => transport.send_photo(*chat, bytes).await,
        };
        if let Err(e) = result {
            tracing::error!(chat = reply.chat(), "delivery failed: {}", e);
        }
    }
}

fn init_config(path: String) {
    let config = Config::default();
    match serde_yaml::to_string(&config) {
        Ok(yaml) => match std::fs::write(&path, yaml) {
            Ok(()) => println!("Wrote default config to {}", path),
            Err(e) => tracing::error!("Failed to write config: {}", e),
        },
        Err(e) => tracing::error!("Failed to serialize config: {}", e),
    }
}

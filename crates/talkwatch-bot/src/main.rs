//! talkwatch bot: watches a talks-schedule document and announces changes
//! to Telegram chats.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use talkwatch_bot::{config, cycle, logging, telegram};
use talkwatch_core::{
    RetryPolicy, ScheduleWatcher, SnapshotSource, SnapshotStore, spawn_poll_trigger,
};
use tokio::sync::mpsc;

use config::Config;
use cycle::UpdateCycle;
use logging::{LogConfig, LogFormat};
use telegram::{ConsoleTransport, TelegramTransport, Transport};

/// Talks-schedule change notifier.
#[derive(Parser, Debug)]
#[command(name = "talkwatch-bot")]
#[command(about = "Announces talks-schedule changes to Telegram chats")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the watched data file from config
    #[arg(long, value_name = "FILE")]
    data_file: Option<PathBuf>,

    /// Poll the data file instead of using filesystem notifications
    #[arg(long)]
    poll: bool,

    /// Print messages to stdout instead of delivering to Telegram
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging (INFO level for most targets)
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging (everything, including watcher noise)
    #[arg(long)]
    trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "source=debug").
    /// Can be given multiple times; targets are prefixed with "talkwatch::"
    /// automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        cli.log_overrides,
        cli.log_format,
    );
    logging::init(&log_config);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env()?;

    // CLI overrides win over file and environment.
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }
    if cli.poll {
        config.poll = true;
    }

    let transport = if cli.dry_run {
        Transport::Console(ConsoleTransport)
    } else {
        let token = std::env::var("TELEGRAM_API_KEY")
            .context("TELEGRAM_API_KEY must be set (or use --dry-run)")?;
        if config.chat_ids.is_empty() {
            bail!("no chat IDs configured (set CHAT_IDS or chat_ids in the config file)");
        }
        Transport::Telegram(TelegramTransport::new(config.api_url.clone(), token))
    };

    tracing::info!(
        target: "talkwatch::startup",
        data_file = %config.data_file.display(),
        state_file = %config.state_file.display(),
        chats = config.chat_ids.len(),
        transport = transport.name(),
        "loaded configuration"
    );

    let source = SnapshotSource::new(&config.data_file);
    let store = SnapshotStore::open(&config.state_file)?;
    let cycle = UpdateCycle::bootstrap(
        source,
        store,
        transport,
        config.chat_ids.clone(),
        RetryPolicy::default(),
    )
    .await?;
    tracing::info!(
        target: "talkwatch::startup",
        date = cycle.current_date(),
        "snapshot state initialized"
    );

    let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
    let _watcher_handle = if config.poll {
        spawn_poll_trigger(Duration::from_secs(config.poll_interval_secs), trigger_tx);
        tracing::info!(
            target: "talkwatch::startup",
            interval_secs = config.poll_interval_secs,
            "poll trigger started"
        );
        None
    } else {
        let handle = ScheduleWatcher::new(&config.data_file).spawn(trigger_tx)?;
        tracing::info!(target: "talkwatch::startup", "filesystem watcher started");
        Some(handle)
    };

    cycle.run(trigger_rx).await;
    Ok(())
}

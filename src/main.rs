use anyhow::{anyhow, bail, Context};
use attendant_registry::cli::output::{self, OutputMode};
use attendant_registry::cli::{shell, Cli, Commands, RegisterArgs, RemoteCommands};
use attendant_registry::config::{AppConfig, LoggingConfig};
use attendant_registry::coordinator::{
    build_coordinator, build_identifier_strategy, build_roster_cache,
};
use attendant_registry::identifier::IdentifierProvider;
use attendant_registry::remote::{build_dhis2_client, KeyValueStore};
use clap::Parser;
use std::sync::Arc;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut app_config = AppConfig::load_from(&cli.config_dir)
        .with_context(|| format!("failed to load configuration from {}", cli.config_dir))?;
    if let Some(strategy) = cli.strategy {
        app_config.identifier.strategy = strategy;
    }

    let _log_guard = init_logging(&app_config.logging);
    debug!(config = ?app_config, "configuration loaded");

    let mode = OutputMode::from_json_flag(cli.json);

    match &cli.command {
        Commands::Register(args) => run_register(&app_config, cli.no_cache, args, mode).await?,
        Commands::Shell => {
            let coordinator = build_coordinator(&app_config, cli.no_cache)?;
            shell::run(&coordinator, mode).await?;
        }
        Commands::Roster { detail } => {
            let cache = build_roster_cache(&app_config.cache, cli.no_cache);
            println!("{}", output::render_roster(&cache.load(), mode, *detail)?);
        }
        Commands::Ids { count } => run_ids(&app_config, *count, mode).await?,
        Commands::Remote(command) => run_remote(&app_config, command, mode).await?,
    }

    Ok(())
}

async fn run_register(
    app_config: &AppConfig,
    no_cache: bool,
    args: &RegisterArgs,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let coordinator = build_coordinator(app_config, no_cache)?;
    for (field, value) in args.field_values() {
        coordinator.set_field(field, value);
    }

    match coordinator.handle_submit().await {
        Some(record) => {
            match mode {
                OutputMode::Json => output::print_item(&record)?,
                OutputMode::Table => {
                    println!("\x1b[32m✓ Registered {}\x1b[0m", record.identifier);
                    println!("  {}", record.detail());
                }
            }
            if let Some(notice) = coordinator.notice() {
                eprintln!("{}", output::render_notice(&notice));
            }
            Ok(())
        }
        None => {
            let notice = coordinator
                .notice()
                .ok_or_else(|| anyhow!("submission did not complete"))?;
            match mode {
                OutputMode::Json => output::print_item(&notice)?,
                OutputMode::Table => eprintln!("{}", output::render_notice(&notice)),
            }
            Err(anyhow!(notice.message))
        }
    }
}

async fn run_ids(app_config: &AppConfig, count: usize, mode: OutputMode) -> anyhow::Result<()> {
    if count == 0 {
        bail!("--count must be at least 1");
    }
    let client = Arc::new(build_dhis2_client(&app_config.dhis2)?);
    let strategy = build_identifier_strategy(app_config, client)?;
    let ids = strategy.next_identifiers(count).await?;
    output::print_lines(&ids, mode)
}

async fn run_remote(
    app_config: &AppConfig,
    command: &RemoteCommands,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let client = build_dhis2_client(&app_config.dhis2)?;
    let namespace = &app_config.dhis2.namespace;

    match command {
        RemoteCommands::List => {
            let keys = client.list_keys(namespace).await?;
            output::print_lines(&keys, mode)
        }
        RemoteCommands::Get { key } => match client.read_entry(namespace, key).await? {
            Some(value) => output::print_item(&value),
            None => bail!("no entry '{key}' in namespace '{namespace}'"),
        },
    }
}

/// Console logging on stderr plus an optional daily rolling file.
///
/// The returned guard flushes the file writer; keep it alive until exit.
fn init_logging(cfg: &LoggingConfig) -> Option<WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{Layer, Registry};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,attendant_registry={}", cfg.level)));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);
    if cfg.json {
        layers.push(console.json().boxed());
    } else {
        layers.push(console.boxed());
    }

    let mut guard = None;
    if let Some(dir) = &cfg.dir {
        match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, "attendant-registry.log");
                let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
                guard = Some(worker_guard);
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false) // No color codes in file
                        .with_target(true)
                        .boxed(),
                );
            }
            Err(e) => eprintln!(
                "Warning: Could not create log directory {} ({}), file logging disabled",
                dir.display(),
                e
            ),
        }
    }

    if let Err(e) = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
    {
        eprintln!("Warning: logging already initialised: {e}");
    }

    guard
}

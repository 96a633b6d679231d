use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use howler::adapters::{DiscordWebhook, NhlClient, PostgresStore};
use howler::config::AppConfig;
use howler::error::{HowlerError, Result};
use howler::tracker::{GameTracker, Notifier, ScheduleSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "howler", about = "NHL game-day tracker", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tracker service
    Run,
    /// Look up the schedule for a date and print the matchup
    Lookup {
        /// Date to look up (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_service().await,
        Commands::Lookup { date } => run_lookup(date).await,
    }
}

async fn run_service() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config);

    if let Err(errors) = config.validate() {
        for e in &errors {
            error!("config: {e}");
        }
        return Err(HowlerError::Validation(errors.join("; ")));
    }

    let store = PostgresStore::new(&config.database.url, config.database.max_connections).await?;
    store.migrate().await?;

    let source = NhlClient::new(
        &config.source.base_url,
        Duration::from_secs(config.source.timeout_secs),
    )?;
    let sink = Arc::new(DiscordWebhook::new(config.notify.webhook_url.clone()));
    let notifier = Notifier::new(sink, config.tracker.team_abbrev.clone());

    let tracker = GameTracker::new(
        &config.tracker,
        Arc::new(source),
        Arc::new(store),
        notifier,
    )?;

    tokio::select! {
        _ = tracker.run_forever() => {}
        _ = shutdown_signal() => {
            info!("shutting down");
        }
    }

    Ok(())
}

/// Manual schedule lookup — a pass-through to the data source, outside the
/// poll cycle.
async fn run_lookup(date: Option<NaiveDate>) -> Result<()> {
    init_logging_simple();

    let config = AppConfig::load()?;
    let date = date.unwrap_or_else(|| {
        Utc::now()
            .with_timezone(&config.tracker.reference_offset())
            .date_naive()
    });

    let source = NhlClient::new(
        &config.source.base_url,
        Duration::from_secs(config.source.timeout_secs),
    )?;

    let games = source.fetch_schedule(date).await?;
    if games.is_empty() {
        println!("No games on {date}");
        return Ok(());
    }

    for game in &games {
        let marker = if game.home_team.abbrev == config.tracker.team_abbrev
            || game.away_team.abbrev == config.tracker.team_abbrev
        {
            " <-- tracked"
        } else {
            ""
        };
        println!(
            "{} @ {}  {}  (game {}){}",
            game.away_team.abbrev,
            game.home_team.abbrev,
            game.start_time_utc.format("%Y-%m-%d %H:%M UTC"),
            game.id,
            marker
        );
    }

    Ok(())
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", config.logging.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn init_logging_simple() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

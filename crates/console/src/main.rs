mod args;
mod commands;

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eduhub_client::{ApiClient, SqliteTokenStore};
use eduhub_console::{AppState, ConsoleConfig};
use eduhub_events::{EmailConfig, EmailDelivery, EventBus, LogMailer, Mailer, Outbox, OutboxConfig};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eduhub_console=info,eduhub_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // --- Configuration ---
    let config = ConsoleConfig::from_env()?;
    tracing::debug!(
        api = %config.api_base_url,
        realtime = %config.realtime_url,
        "Loaded console configuration",
    );

    // --- Local token storage ---
    let tokens = SqliteTokenStore::connect(&config.token_db_url).await?;

    // --- Event bus ---
    let bus = EventBus::default();
    let mut events = bus.subscribe();

    // --- Outbound queue ---
    let mailer: Arc<dyn Mailer> = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(host = %email_config.host, "SMTP delivery enabled");
            Arc::new(EmailDelivery::new(email_config)?)
        }
        None => Arc::new(LogMailer),
    };
    let (outbox, worker) = Outbox::new(mailer, bus.clone(), OutboxConfig::default());
    let cancel = CancellationToken::new();
    let worker_handle = tokio::spawn(worker.run(cancel.clone()));

    // --- App state ---
    let client = ApiClient::new(config.client_config(), Arc::new(tokens), bus.clone())?;
    let state = AppState::new(config, client, bus.clone(), outbox);

    let result = match cli.command {
        Commands::Listen => commands::listen(&state, &mut events, cancel.clone()).await,
        command => commands::execute(&state, command).await,
    };

    // Dropping the last outbox handle lets the worker finish queued emails.
    drop(state);
    if let Err(e) = worker_handle.await {
        tracing::error!(error = %e, "Outbox worker panicked");
    }
    commands::drain_events(&mut events);

    result.map_err(Into::into)
}

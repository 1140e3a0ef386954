use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;

use ledgerbell::commands::{CommandContext, ConversationEngine};
use ledgerbell::core::{Clock, Config, RunMode, SystemClock};
use ledgerbell::database::Database;
use ledgerbell::features::reminders::ReminderScheduler;
use ledgerbell::transport::{run_long_poll, webhook, MaxApiClient, Outbound};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let mut config = Config::load()?;
    if let Some(arg) = std::env::args().nth(1) {
        config.mode = Some(arg.parse()?);
    }
    let mode = config.mode.unwrap_or(RunMode::Both);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting bot in {mode:?} mode...");

    let database = Database::new(&config.storage_file, config.max_reminders_per_user).await?;
    let client = Arc::new(MaxApiClient::new(&config.api_base, &config.access_token)?);
    let outbound: Arc<dyn Outbound> = client.clone();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let context = CommandContext::new(
        database.clone(),
        outbound.clone(),
        clock.clone(),
        config.timezone.clone(),
    );
    let engine = Arc::new(ConversationEngine::new(context));

    // Start the reminder scheduler
    let scheduler = ReminderScheduler::new(database, outbound, clock, config.poll_interval());
    tokio::spawn(async move {
        scheduler.run().await;
    });

    let timeout = config.updates_timeout();
    match mode {
        RunMode::Bot => run_long_poll(client, engine, timeout).await,
        RunMode::Webhook => {
            webhook::serve(engine, &config.webhook_secret, config.port).await?;
        }
        RunMode::Both => {
            let poll_engine = engine.clone();
            tokio::spawn(async move {
                run_long_poll(client, poll_engine, timeout).await;
            });
            if let Err(e) = webhook::serve(engine, &config.webhook_secret, config.port).await {
                error!("Webhook server failed: {e}");
                return Err(e);
            }
        }
    }

    Ok(())
}

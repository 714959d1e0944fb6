use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use warden::{
    actuator::{
        discord::DiscordGateway,
        rank::{HttpRankProvider, RankProvider},
        stream::{StreamProvider, TwitchStreamProvider},
    },
    bot,
    config::Config,
    error::AppError,
    scheduler::{self, shutdown::Shutdown, Scheduler},
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client()?;
    let policy = Arc::new(config.policy.clone());

    let mut client = bot::start::build_client(&config.discord_bot_token, db.clone(), policy.clone())
        .await?;
    let discord = DiscordGateway::new(client.http.clone(), client.cache.clone());
    let shard_manager = client.shard_manager.clone();

    let rank: Arc<dyn RankProvider> = Arc::new(HttpRankProvider::new(
        http_client.clone(),
        config.rank_api_base_url.clone(),
        config.rank_season.clone(),
    ));
    let stream: Option<Arc<dyn StreamProvider>> = config.twitch.clone().map(|credentials| {
        Arc::new(TwitchStreamProvider::new(http_client.clone(), credentials))
            as Arc<dyn StreamProvider>
    });

    let state = Arc::new(AppState::new(
        db.clone(),
        discord,
        rank,
        stream,
        config.policy.clone(),
    ));

    let (trigger, shutdown) = Shutdown::channel();
    let mut sweeps = Scheduler::new(Arc::new(db.clone()), shutdown);
    scheduler::tasks::register_all(&mut sweeps, state, &config.intervals);

    tracing::info!("Starting Discord bot...");
    let bot = tokio::spawn(async move {
        if let Err(e) = client.start().await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    let sweeps = tokio::spawn(sweeps.run());

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }

    tracing::info!("Shutting down");
    trigger.trigger();
    shard_manager.shutdown_all().await;

    match sweeps.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Scheduler error: {}", e),
        Err(e) => tracing::error!("Scheduler task failed: {}", e),
    }
    if let Err(e) = bot.await {
        tracing::error!("Discord bot task failed: {}", e);
    }

    Ok(())
}

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::all::{Client, GatewayIntents};

use crate::{bot::handler::Handler, config::PolicyConfig, error::AppError};

/// Builds the Discord client without connecting.
///
/// The caller reads `client.http` and `client.cache` to build the actuator for
/// scheduled tasks, then calls `client.start()` from its own task.
///
/// # Arguments
/// - `token` - Bot token
/// - `db` - Database connection for event handlers
/// - `policy` - Policy tunables shared with the scheduled tasks
///
/// # Returns
/// - `Ok(Client)` - Client ready to start
/// - `Err(AppError)` - Invalid token or client construction failure
pub async fn build_client(
    token: &str,
    db: DatabaseConnection,
    policy: Arc<PolicyConfig>,
) -> Result<Client, AppError> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::DIRECT_MESSAGE_REACTIONS
        | GatewayIntents::GUILD_MESSAGE_POLLS;

    let client = Client::builder(token, intents)
        .event_handler(Handler::new(db, policy))
        .await?;

    Ok(client)
}

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::all::{
    Context, EventHandler, GuildId, Message, MessagePollVoteAddEvent, Reaction, Ready,
};
use serenity::async_trait;

use crate::{
    actuator::discord::DiscordGateway, config::PolicyConfig,
    data::guild_settings::GuildSettingsRepository, error::AppError,
    model::guild_settings::GuildSettings,
};

pub mod message;
pub mod poll;
pub mod reaction;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub db: DatabaseConnection,
    pub policy: Arc<PolicyConfig>,
}

impl Handler {
    pub fn new(db: DatabaseConnection, policy: Arc<PolicyConfig>) -> Self {
        Self { db, policy }
    }
}

/// Actuator for one event, sharing the context's REST client and cache.
fn gateway(ctx: &Context) -> DiscordGateway {
    DiscordGateway::new(ctx.http.clone(), ctx.cache.clone())
}

async fn settings(
    db: &DatabaseConnection,
    guild_id: GuildId,
) -> Result<GuildSettings, AppError> {
    GuildSettingsRepository::new(db).get_or_disabled(guild_id).await
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(&self.db, &self.policy, ctx, message).await;
    }

    /// Called when a reaction is added to a guild or DM message
    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        reaction::handle_reaction_add(&self.db, &self.policy, ctx, reaction).await;
    }

    /// Called when a member votes in a poll
    async fn poll_vote_add(&self, ctx: Context, event: MessagePollVoteAddEvent) {
        poll::handle_poll_vote_add(&self.db, &self.policy, ctx, event).await;
    }
}

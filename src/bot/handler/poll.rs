use chrono::Utc;
use sea_orm::DatabaseConnection;
use serenity::all::{Context, MessagePollVoteAddEvent};

use crate::{
    bot::handler::{gateway, settings},
    config::PolicyConfig,
    model::guild_settings::Feature,
    service::moderator::ModeratorService,
};

/// Credits moderators who vote in polls.
pub async fn handle_poll_vote_add(
    db: &DatabaseConnection,
    policy: &PolicyConfig,
    ctx: Context,
    event: MessagePollVoteAddEvent,
) {
    let Some(guild_id) = event.guild_id else {
        return;
    };

    let settings = match settings(db, guild_id).await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load settings for guild {}: {}", guild_id, e);
            return;
        }
    };
    if !settings.is_enabled(Feature::ModeratorPoints) {
        return;
    }

    let discord = gateway(&ctx);
    if let Err(e) = ModeratorService::new(db, &discord, &discord, &policy.moderator)
        .on_poll_vote(&settings, event.user_id, Utc::now())
        .await
    {
        tracing::error!(
            "Failed to credit poll vote to {} in guild {}: {}",
            event.user_id,
            guild_id,
            e
        );
    }
}

use chrono::Utc;
use sea_orm::DatabaseConnection;
use serenity::all::{Context, Message};

use crate::{
    bot::handler::{gateway, settings},
    config::PolicyConfig,
    model::guild_settings::Feature,
    service::{ban::BanService, moderator::ModeratorService, xp::XpService},
};

/// Handles a guild message.
///
/// Messages from actively banned members are deleted and earn nothing.
/// Otherwise the author is credited XP and, for moderators, points.
pub async fn handle_message(
    db: &DatabaseConnection,
    policy: &PolicyConfig,
    ctx: Context,
    message: Message,
) {
    let Some(guild_id) = message.guild_id else {
        return;
    };
    if message.author.bot {
        return;
    }

    let now = Utc::now();
    let discord = gateway(&ctx);

    match BanService::new(db, &discord)
        .on_message(guild_id, message.channel_id, message.id, message.author.id, now)
        .await
    {
        Ok(true) => {
            tracing::info!(
                "Deleted message from banned user {} in guild {}",
                message.author.id,
                guild_id
            );
            return;
        }
        Ok(false) => {}
        Err(e) => tracing::error!("Failed to check ban for user {}: {}", message.author.id, e),
    }

    let settings = match settings(db, guild_id).await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load settings for guild {}: {}", guild_id, e);
            return;
        }
    };

    if settings.is_enabled(Feature::Xp) {
        match XpService::new(db, &discord, &discord, &policy.xp)
            .on_message(guild_id, message.author.id, now)
            .await
        {
            Ok(Some(change)) if change.level > change.previous_level => {
                tracing::info!(
                    "User {} reached level {} in guild {}",
                    message.author.id,
                    change.level,
                    guild_id
                );
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Failed to credit XP to {}: {}", message.author.id, e),
        }
    }

    if settings.is_enabled(Feature::ModeratorPoints) {
        if let Err(e) = ModeratorService::new(db, &discord, &discord, &policy.moderator)
            .on_message(&settings, message.author.id, message.poll.is_some(), now)
            .await
        {
            tracing::error!(
                "Failed to credit moderator points to {}: {}",
                message.author.id,
                e
            );
        }
    }
}

use chrono::Utc;
use sea_orm::DatabaseConnection;
use serenity::all::{Context, Reaction, ReactionType};

use crate::{
    bot::handler::{gateway, settings},
    config::PolicyConfig,
    model::guild_settings::Feature,
    service::{giveaway::GiveawayService, warning::WarningService},
};

/// Handles a reaction.
///
/// In a guild it may be a giveaway entry. In a DM it may acknowledge a warning.
pub async fn handle_reaction_add(
    db: &DatabaseConnection,
    policy: &PolicyConfig,
    ctx: Context,
    reaction: Reaction,
) {
    let Some(user_id) = reaction.user_id else {
        return;
    };
    // Custom emoji never match an entry or acknowledgment emoji
    let ReactionType::Unicode(emoji) = &reaction.emoji else {
        return;
    };

    let is_bot = user_id == ctx.cache.current_user().id
        || reaction
            .member
            .as_ref()
            .is_some_and(|member| member.user.bot);
    let discord = gateway(&ctx);

    let Some(guild_id) = reaction.guild_id else {
        if is_bot {
            return;
        }

        match WarningService::new(db, &discord, &policy.warning)
            .on_reaction(user_id, reaction.message_id, emoji, Utc::now())
            .await
        {
            Ok(true) => tracing::info!("User {} acknowledged a warning", user_id),
            Ok(false) => {}
            Err(e) => tracing::error!("Failed to acknowledge warning for {}: {}", user_id, e),
        }
        return;
    };

    let settings = match settings(db, guild_id).await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load settings for guild {}: {}", guild_id, e);
            return;
        }
    };
    if !settings.is_enabled(Feature::Giveaways) {
        return;
    }

    if let Err(e) = GiveawayService::new(db, &discord, &discord, &policy.giveaway)
        .on_reaction(reaction.message_id, user_id, is_bot, emoji)
        .await
    {
        tracing::error!(
            "Failed to record giveaway entry for {} on message {}: {}",
            user_id,
            reaction.message_id,
            e
        );
    }
}

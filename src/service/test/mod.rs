use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use serenity::all::{ChannelId, GuildId, MessageId, RoleId, UserId};
use test_utils::{builder::TestBuilder, factory};

use crate::{
    actuator::{
        mock::{Action, Call, MockDiscord, MockRank, MockRankProvider, MockStreamProvider},
        GuildDirectory, VoicePresence,
    },
    error::{actuator::ActuatorError, AppError},
    scheduler::shutdown::Shutdown,
};

mod giveaway;
mod moderator;
mod xp;

/// Parses an ID stored as a string by the factories.
fn snowflake<T: From<u64>>(value: &str) -> T {
    T::from(value.parse::<u64>().unwrap())
}

/// Creates a guild with every feature enabled and returns its ID.
async fn enabled_guild(db: &DatabaseConnection) -> Result<GuildId, AppError> {
    let settings = factory::create_guild_settings(db).await?;
    Ok(snowflake(&settings.guild_id))
}

use super::*;
use crate::{
    config::ModeratorConfig,
    data::{
        guild_settings::GuildSettingsRepository,
        moderator::{ModeratorEventRepository, ModeratorRepository},
        task_marker::TaskMarkerRepository,
    },
    model::guild_settings::GuildSettings,
    service::moderator::{ModeratorService, ROLLOVER_MARKER, VOICE_MARKER},
};
use test_utils::factory::{
    guild_settings::GuildSettingsFactory, moderator_point_profile::ModeratorPointProfileFactory,
};

mod enforce_inactivity;
mod weekly_rollover;

const MODERATOR_ROLE: u64 = 800;
const PATROL_CHANNEL: u64 = 900;

async fn moderator_test() -> test_utils::context::TestContext {
    TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .with_table(entity::prelude::ModeratorPointProfile)
        .with_table(entity::prelude::ModeratorPointEvent)
        .with_table(entity::prelude::TaskMarker)
        .build()
        .await
        .unwrap()
}

/// Creates a guild with a configured moderator role and one patrol voice channel.
async fn moderated_guild(db: &DatabaseConnection) -> Result<GuildSettings, AppError> {
    let created = GuildSettingsFactory::new(db)
        .moderator_role_id(Some(MODERATOR_ROLE.to_string()))
        .moderator_voice_channel_ids(vec![PATROL_CHANNEL.to_string()])
        .build()
        .await?;

    Ok(GuildSettingsRepository::new(db)
        .get(snowflake(&created.guild_id))
        .await?
        .unwrap())
}

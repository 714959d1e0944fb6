use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TryIntoModel,
};
use serenity::all::GuildId;

use crate::{
    data::collect_valid,
    error::AppError,
    model::guild_settings::{Feature, GuildSettings},
    util::parse::encode_snowflake_list,
};

pub struct GuildSettingsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GuildSettingsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the stored settings for a guild
    ///
    /// # Returns
    /// - `Ok(Some(GuildSettings))`: Settings row exists
    /// - `Ok(None)`: Guild has never been configured
    /// - `Err(AppError)`: Database error or malformed row
    pub async fn get(&self, guild_id: GuildId) -> Result<Option<GuildSettings>, AppError> {
        entity::prelude::GuildSettings::find()
            .filter(entity::guild_settings::Column::GuildId.eq(guild_id.to_string()))
            .one(self.db)
            .await?
            .map(GuildSettings::from_entity)
            .transpose()
    }

    /// Gets the settings for a guild, treating a missing row as every feature disabled
    pub async fn get_or_disabled(&self, guild_id: GuildId) -> Result<GuildSettings, AppError> {
        Ok(self
            .get(guild_id)
            .await?
            .unwrap_or_else(|| GuildSettings::disabled(guild_id)))
    }

    /// Gets every guild with the given feature enabled, in id order
    pub async fn get_enabled(&self, feature: Feature) -> Result<Vec<GuildSettings>, AppError> {
        use entity::guild_settings::Column;

        let column = match feature {
            Feature::Bans => Column::BansEnabled,
            Feature::Warnings => Column::WarningsEnabled,
            Feature::Xp => Column::XpEnabled,
            Feature::ModeratorPoints => Column::ModeratorPointsEnabled,
            Feature::RankRoles => Column::RankRolesEnabled,
            Feature::Giveaways => Column::GiveawaysEnabled,
            Feature::StreamAlerts => Column::StreamAlertsEnabled,
        };

        let rows = entity::prelude::GuildSettings::find()
            .filter(column.eq(true))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await?;

        Ok(collect_valid(
            "guild_settings",
            rows,
            GuildSettings::from_entity,
            |row| row.id,
        ))
    }

    /// Creates or replaces the settings row for a guild
    ///
    /// # Arguments
    /// - `settings`: Full settings to persist
    ///
    /// # Returns
    /// - `Ok(GuildSettings)`: The stored settings
    /// - `Err(AppError)`: Database error
    pub async fn upsert(&self, settings: &GuildSettings) -> Result<GuildSettings, AppError> {
        let existing = entity::prelude::GuildSettings::find()
            .filter(entity::guild_settings::Column::GuildId.eq(settings.guild_id.to_string()))
            .one(self.db)
            .await?;

        let model = entity::guild_settings::ActiveModel {
            id: existing
                .map(|row| ActiveValue::Unchanged(row.id))
                .unwrap_or(ActiveValue::NotSet),
            guild_id: ActiveValue::Set(settings.guild_id.to_string()),
            bans_enabled: ActiveValue::Set(settings.bans_enabled),
            warnings_enabled: ActiveValue::Set(settings.warnings_enabled),
            xp_enabled: ActiveValue::Set(settings.xp_enabled),
            moderator_points_enabled: ActiveValue::Set(settings.moderator_points_enabled),
            rank_roles_enabled: ActiveValue::Set(settings.rank_roles_enabled),
            giveaways_enabled: ActiveValue::Set(settings.giveaways_enabled),
            stream_alerts_enabled: ActiveValue::Set(settings.stream_alerts_enabled),
            moderator_role_id: ActiveValue::Set(
                settings.moderator_role_id.map(|id| id.to_string()),
            ),
            moderator_voice_channel_ids: ActiveValue::Set(encode_snowflake_list(
                &settings.moderator_voice_channel_ids,
            )?),
            stream_channel_id: ActiveValue::Set(
                settings.stream_channel_id.map(|id| id.to_string()),
            ),
            updated_at: ActiveValue::Set(Utc::now()),
        };

        let saved = model.save(self.db).await?.try_into_model()?;

        GuildSettings::from_entity(saved)
    }
}

//! Guild settings factory for creating per-guild configuration rows.

use crate::factory::helpers::next_snowflake;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating guild settings with every feature enabled by default.
///
/// # Example
///
/// ```rust,ignore
/// let settings = GuildSettingsFactory::new(&db)
///     .xp_enabled(false)
///     .moderator_role_id(Some("555".to_string()))
///     .build()
///     .await?;
/// ```
pub struct GuildSettingsFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    bans_enabled: bool,
    warnings_enabled: bool,
    xp_enabled: bool,
    moderator_points_enabled: bool,
    rank_roles_enabled: bool,
    giveaways_enabled: bool,
    stream_alerts_enabled: bool,
    moderator_role_id: Option<String>,
    moderator_voice_channel_ids: Vec<String>,
    stream_channel_id: Option<String>,
}

impl<'a> GuildSettingsFactory<'a> {
    /// Creates a new factory for a fresh guild with all features enabled.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `GuildSettingsFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_snowflake(),
            bans_enabled: true,
            warnings_enabled: true,
            xp_enabled: true,
            moderator_points_enabled: true,
            rank_roles_enabled: true,
            giveaways_enabled: true,
            stream_alerts_enabled: true,
            moderator_role_id: None,
            moderator_voice_channel_ids: Vec::new(),
            stream_channel_id: None,
        }
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn bans_enabled(mut self, enabled: bool) -> Self {
        self.bans_enabled = enabled;
        self
    }

    pub fn warnings_enabled(mut self, enabled: bool) -> Self {
        self.warnings_enabled = enabled;
        self
    }

    pub fn xp_enabled(mut self, enabled: bool) -> Self {
        self.xp_enabled = enabled;
        self
    }

    pub fn moderator_points_enabled(mut self, enabled: bool) -> Self {
        self.moderator_points_enabled = enabled;
        self
    }

    pub fn rank_roles_enabled(mut self, enabled: bool) -> Self {
        self.rank_roles_enabled = enabled;
        self
    }

    pub fn giveaways_enabled(mut self, enabled: bool) -> Self {
        self.giveaways_enabled = enabled;
        self
    }

    pub fn stream_alerts_enabled(mut self, enabled: bool) -> Self {
        self.stream_alerts_enabled = enabled;
        self
    }

    pub fn moderator_role_id(mut self, role_id: Option<String>) -> Self {
        self.moderator_role_id = role_id;
        self
    }

    pub fn moderator_voice_channel_ids(mut self, channel_ids: Vec<String>) -> Self {
        self.moderator_voice_channel_ids = channel_ids;
        self
    }

    pub fn stream_channel_id(mut self, channel_id: Option<String>) -> Self {
        self.stream_channel_id = channel_id;
        self
    }

    /// Builds and inserts the guild settings entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::guild_settings::Model)` - Created settings entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::guild_settings::Model, DbErr> {
        let channel_ids = serde_json::to_string(&self.moderator_voice_channel_ids)
            .map_err(|e| DbErr::Custom(e.to_string()))?;

        entity::guild_settings::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            bans_enabled: ActiveValue::Set(self.bans_enabled),
            warnings_enabled: ActiveValue::Set(self.warnings_enabled),
            xp_enabled: ActiveValue::Set(self.xp_enabled),
            moderator_points_enabled: ActiveValue::Set(self.moderator_points_enabled),
            rank_roles_enabled: ActiveValue::Set(self.rank_roles_enabled),
            giveaways_enabled: ActiveValue::Set(self.giveaways_enabled),
            stream_alerts_enabled: ActiveValue::Set(self.stream_alerts_enabled),
            moderator_role_id: ActiveValue::Set(self.moderator_role_id),
            moderator_voice_channel_ids: ActiveValue::Set(channel_ids),
            stream_channel_id: ActiveValue::Set(self.stream_channel_id),
            updated_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates guild settings for a fresh guild with every feature enabled.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok(entity::guild_settings::Model)` - Created settings entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_guild_settings(
    db: &DatabaseConnection,
) -> Result<entity::guild_settings::Model, DbErr> {
    GuildSettingsFactory::new(db).build().await
}

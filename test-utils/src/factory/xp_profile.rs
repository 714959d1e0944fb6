//! XP profile factory for creating test member profiles.

use crate::factory::helpers::next_snowflake;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating XP profiles with customizable fields.
///
/// Defaults to a level 1 profile with zero XP that last gained XP now.
pub struct XpProfileFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    user_id: String,
    xp: i64,
    level: i32,
    last_gain_at: DateTime<Utc>,
}

impl<'a> XpProfileFactory<'a> {
    /// Creates a new XpProfileFactory with default values.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `guild_id` - Guild the profile belongs to
    ///
    /// # Returns
    /// - `XpProfileFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        Self {
            db,
            guild_id: guild_id.into(),
            user_id: next_snowflake(),
            xp: 0,
            level: 1,
            last_gain_at: Utc::now(),
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn xp(mut self, xp: i64) -> Self {
        self.xp = xp;
        self
    }

    pub fn level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn last_gain_at(mut self, last_gain_at: DateTime<Utc>) -> Self {
        self.last_gain_at = last_gain_at;
        self
    }

    /// Builds and inserts the XP profile into the database.
    ///
    /// # Returns
    /// - `Ok(entity::xp_profile::Model)` - Created profile
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::xp_profile::Model, DbErr> {
        entity::xp_profile::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            xp: ActiveValue::Set(self.xp),
            level: ActiveValue::Set(self.level),
            last_gain_at: ActiveValue::Set(self.last_gain_at),
            revision: ActiveValue::Set(0),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a fresh level 1 XP profile in the given guild.
pub async fn create_xp_profile(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
) -> Result<entity::xp_profile::Model, DbErr> {
    XpProfileFactory::new(db, guild_id).build().await
}

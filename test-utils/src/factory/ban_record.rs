//! Ban record factory for creating test bans.

use crate::factory::helpers::next_snowflake;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating ban records with customizable fields.
///
/// Defaults to an active, permanent ban created now.
pub struct BanRecordFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    user_id: String,
    moderator_id: String,
    reason: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    active: bool,
}

impl<'a> BanRecordFactory<'a> {
    /// Creates a new BanRecordFactory with default values.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `guild_id` - Guild the ban belongs to
    ///
    /// # Returns
    /// - `BanRecordFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        Self {
            db,
            guild_id: guild_id.into(),
            user_id: next_snowflake(),
            moderator_id: next_snowflake(),
            reason: "Test ban".to_string(),
            created_at: Utc::now(),
            expires_at: None,
            active: true,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the expiry; `None` makes the ban permanent.
    pub fn expires_at(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Builds and inserts the ban record into the database.
    ///
    /// # Returns
    /// - `Ok(entity::ban_record::Model)` - Created ban record
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::ban_record::Model, DbErr> {
        entity::ban_record::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            moderator_id: ActiveValue::Set(self.moderator_id),
            reason: ActiveValue::Set(self.reason),
            created_at: ActiveValue::Set(self.created_at),
            expires_at: ActiveValue::Set(self.expires_at),
            active: ActiveValue::Set(self.active),
            lifted_at: ActiveValue::Set(None),
            lift_reason: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active permanent ban in the given guild.
pub async fn create_ban_record(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
) -> Result<entity::ban_record::Model, DbErr> {
    BanRecordFactory::new(db, guild_id).build().await
}

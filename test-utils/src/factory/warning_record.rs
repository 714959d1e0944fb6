//! Warning record factory for creating test warnings.

use crate::factory::helpers::next_snowflake;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating warning records with customizable fields.
///
/// Defaults to an unacknowledged first warning created now with no DM sent.
pub struct WarningRecordFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    user_id: String,
    moderator_id: String,
    sequence: i32,
    reason: String,
    created_at: DateTime<Utc>,
    acknowledged: bool,
    dm_message_id: Option<String>,
    timeout_applied: bool,
    timeout_attempted: bool,
}

impl<'a> WarningRecordFactory<'a> {
    /// Creates a new WarningRecordFactory with default values.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `guild_id` - Guild the warning belongs to
    ///
    /// # Returns
    /// - `WarningRecordFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        Self {
            db,
            guild_id: guild_id.into(),
            user_id: next_snowflake(),
            moderator_id: next_snowflake(),
            sequence: 1,
            reason: "Test warning".to_string(),
            created_at: Utc::now(),
            acknowledged: false,
            dm_message_id: None,
            timeout_applied: false,
            timeout_attempted: false,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn sequence(mut self, sequence: i32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn acknowledged(mut self, acknowledged: bool) -> Self {
        self.acknowledged = acknowledged;
        self
    }

    pub fn dm_message_id(mut self, dm_message_id: Option<String>) -> Self {
        self.dm_message_id = dm_message_id;
        self
    }

    pub fn timeout_applied(mut self, applied: bool) -> Self {
        self.timeout_applied = applied;
        self
    }

    pub fn timeout_attempted(mut self, attempted: bool) -> Self {
        self.timeout_attempted = attempted;
        self
    }

    /// Builds and inserts the warning record into the database.
    ///
    /// # Returns
    /// - `Ok(entity::warning_record::Model)` - Created warning record
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::warning_record::Model, DbErr> {
        entity::warning_record::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            moderator_id: ActiveValue::Set(self.moderator_id),
            sequence: ActiveValue::Set(self.sequence),
            reason: ActiveValue::Set(self.reason),
            created_at: ActiveValue::Set(self.created_at),
            acknowledged: ActiveValue::Set(self.acknowledged),
            acknowledged_at: ActiveValue::Set(self.acknowledged.then(Utc::now)),
            dm_message_id: ActiveValue::Set(self.dm_message_id),
            timeout_applied: ActiveValue::Set(self.timeout_applied),
            timeout_attempted: ActiveValue::Set(self.timeout_attempted),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an unacknowledged first warning in the given guild.
pub async fn create_warning_record(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
) -> Result<entity::warning_record::Model, DbErr> {
    WarningRecordFactory::new(db, guild_id).build().await
}

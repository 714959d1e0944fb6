//! Moderator point profile factory.

use crate::factory::helpers::next_snowflake;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating moderator point profiles with customizable fields.
///
/// Defaults to zero points with no activity recorded and no rollover yet.
pub struct ModeratorPointProfileFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    user_id: String,
    points: f64,
    last_point_at: Option<DateTime<Utc>>,
    last_penalty_at: Option<DateTime<Utc>>,
    weekly_total: f64,
    previous_weekly_total: f64,
    last_rollover_week: Option<String>,
}

impl<'a> ModeratorPointProfileFactory<'a> {
    /// Creates a new ModeratorPointProfileFactory with default values.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `guild_id` - Guild the profile belongs to
    ///
    /// # Returns
    /// - `ModeratorPointProfileFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        Self {
            db,
            guild_id: guild_id.into(),
            user_id: next_snowflake(),
            points: 0.0,
            last_point_at: None,
            last_penalty_at: None,
            weekly_total: 0.0,
            previous_weekly_total: 0.0,
            last_rollover_week: None,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn points(mut self, points: f64) -> Self {
        self.points = points;
        self
    }

    pub fn last_point_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_point_at = at;
        self
    }

    pub fn last_penalty_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_penalty_at = at;
        self
    }

    pub fn weekly_total(mut self, total: f64) -> Self {
        self.weekly_total = total;
        self
    }

    pub fn previous_weekly_total(mut self, total: f64) -> Self {
        self.previous_weekly_total = total;
        self
    }

    pub fn last_rollover_week(mut self, week: Option<String>) -> Self {
        self.last_rollover_week = week;
        self
    }

    /// Builds and inserts the profile into the database.
    ///
    /// # Returns
    /// - `Ok(entity::moderator_point_profile::Model)` - Created profile
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::moderator_point_profile::Model, DbErr> {
        entity::moderator_point_profile::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            points: ActiveValue::Set(self.points),
            last_point_at: ActiveValue::Set(self.last_point_at),
            last_penalty_at: ActiveValue::Set(self.last_penalty_at),
            weekly_total: ActiveValue::Set(self.weekly_total),
            previous_weekly_total: ActiveValue::Set(self.previous_weekly_total),
            last_rollover_week: ActiveValue::Set(self.last_rollover_week),
            revision: ActiveValue::Set(0),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an empty moderator point profile in the given guild.
pub async fn create_moderator_point_profile(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
) -> Result<entity::moderator_point_profile::Model, DbErr> {
    ModeratorPointProfileFactory::new(db, guild_id).build().await
}

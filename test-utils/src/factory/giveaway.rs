//! Giveaway factory for creating test giveaways.

use crate::factory::helpers::{next_id, next_snowflake};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating giveaways with customizable fields.
///
/// Defaults to an active single-winner giveaway ending in one hour with no
/// participants and no required role.
///
/// # Example
///
/// ```rust,ignore
/// let giveaway = GiveawayFactory::new(&db, &guild_id)
///     .ends_at(Utc::now() - Duration::seconds(5))
///     .participants(vec!["1".into(), "2".into()])
///     .build()
///     .await?;
/// ```
pub struct GiveawayFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    channel_id: String,
    message_id: String,
    host_id: String,
    prize: String,
    winners_count: i32,
    required_role_id: Option<String>,
    ends_at: DateTime<Utc>,
    status: String,
    participants: Vec<String>,
    winners: Vec<String>,
    ended_at: Option<DateTime<Utc>>,
}

impl<'a> GiveawayFactory<'a> {
    /// Creates a new GiveawayFactory with default values.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `guild_id` - Guild the giveaway runs in
    ///
    /// # Returns
    /// - `GiveawayFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        Self {
            db,
            guild_id: guild_id.into(),
            channel_id: next_snowflake(),
            message_id: next_snowflake(),
            host_id: next_snowflake(),
            prize: format!("Prize {}", next_id()),
            winners_count: 1,
            required_role_id: None,
            ends_at: Utc::now() + Duration::hours(1),
            status: "active".to_string(),
            participants: Vec::new(),
            winners: Vec::new(),
            ended_at: None,
        }
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    pub fn prize(mut self, prize: impl Into<String>) -> Self {
        self.prize = prize.into();
        self
    }

    pub fn winners_count(mut self, winners_count: i32) -> Self {
        self.winners_count = winners_count;
        self
    }

    pub fn required_role_id(mut self, role_id: Option<String>) -> Self {
        self.required_role_id = role_id;
        self
    }

    pub fn ends_at(mut self, ends_at: DateTime<Utc>) -> Self {
        self.ends_at = ends_at;
        self
    }

    pub fn participants(mut self, participants: Vec<String>) -> Self {
        self.participants = participants;
        self
    }

    /// Marks the giveaway ended with the given winners.
    pub fn ended(mut self, winners: Vec<String>) -> Self {
        self.status = "ended".to_string();
        self.winners = winners;
        self.ended_at = Some(self.ends_at);
        self
    }

    /// Builds and inserts the giveaway into the database.
    ///
    /// # Returns
    /// - `Ok(entity::giveaway::Model)` - Created giveaway
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::giveaway::Model, DbErr> {
        let participants =
            serde_json::to_string(&self.participants).map_err(|e| DbErr::Custom(e.to_string()))?;
        let winners =
            serde_json::to_string(&self.winners).map_err(|e| DbErr::Custom(e.to_string()))?;

        entity::giveaway::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            channel_id: ActiveValue::Set(self.channel_id),
            message_id: ActiveValue::Set(self.message_id),
            host_id: ActiveValue::Set(self.host_id),
            prize: ActiveValue::Set(self.prize),
            winners_count: ActiveValue::Set(self.winners_count),
            required_role_id: ActiveValue::Set(self.required_role_id),
            ends_at: ActiveValue::Set(self.ends_at),
            status: ActiveValue::Set(self.status),
            participants: ActiveValue::Set(participants),
            winners: ActiveValue::Set(winners),
            ended_at: ActiveValue::Set(self.ended_at),
            revision: ActiveValue::Set(0),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active giveaway in the given guild ending in one hour.
pub async fn create_giveaway(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
) -> Result<entity::giveaway::Model, DbErr> {
    GiveawayFactory::new(db, guild_id).build().await
}

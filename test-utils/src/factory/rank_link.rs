//! Rank link factory.

use crate::factory::helpers::{next_id, next_snowflake};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating rank links with customizable fields.
///
/// Defaults to a never-synced link with a unique `Player#NNNN` handle.
pub struct RankLinkFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    user_id: String,
    handle: String,
    last_synced_rank: Option<String>,
    last_synced_at: Option<DateTime<Utc>>,
}

impl<'a> RankLinkFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        Self {
            db,
            guild_id: guild_id.into(),
            user_id: next_snowflake(),
            handle: format!("Player#{:04}", next_id() % 10_000),
            last_synced_rank: None,
            last_synced_at: None,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = handle.into();
        self
    }

    pub fn last_synced_rank(mut self, rank: Option<String>) -> Self {
        self.last_synced_rank = rank;
        self
    }

    pub fn last_synced_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_synced_at = at;
        self
    }

    /// Builds and inserts the rank link into the database.
    ///
    /// # Returns
    /// - `Ok(entity::rank_link::Model)` - Created link
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::rank_link::Model, DbErr> {
        entity::rank_link::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            handle: ActiveValue::Set(self.handle),
            last_synced_rank: ActiveValue::Set(self.last_synced_rank),
            last_synced_at: ActiveValue::Set(self.last_synced_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a never-synced rank link in the given guild.
pub async fn create_rank_link(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
) -> Result<entity::rank_link::Model, DbErr> {
    RankLinkFactory::new(db, guild_id).build().await
}

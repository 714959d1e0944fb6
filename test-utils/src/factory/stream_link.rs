//! Stream link factory.

use crate::factory::helpers::{next_id, next_snowflake};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating stream links with customizable fields.
///
/// Defaults to an offline link with no role applied.
pub struct StreamLinkFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    user_id: String,
    twitch_handle: String,
    live: bool,
    role_applied: bool,
}

impl<'a> StreamLinkFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, guild_id: impl Into<String>) -> Self {
        Self {
            db,
            guild_id: guild_id.into(),
            user_id: next_snowflake(),
            twitch_handle: format!("streamer_{}", next_id()),
            live: false,
            role_applied: false,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn twitch_handle(mut self, handle: impl Into<String>) -> Self {
        self.twitch_handle = handle.into();
        self
    }

    /// Marks the link live with the role applied.
    pub fn live(mut self) -> Self {
        self.live = true;
        self.role_applied = true;
        self
    }

    /// Builds and inserts the stream link into the database.
    ///
    /// # Returns
    /// - `Ok(entity::stream_link::Model)` - Created link
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::stream_link::Model, DbErr> {
        entity::stream_link::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            twitch_handle: ActiveValue::Set(self.twitch_handle),
            live: ActiveValue::Set(self.live),
            role_applied: ActiveValue::Set(self.role_applied),
            updated_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an offline stream link in the given guild.
pub async fn create_stream_link(
    db: &DatabaseConnection,
    guild_id: impl Into<String>,
) -> Result<entity::stream_link::Model, DbErr> {
    StreamLinkFactory::new(db, guild_id).build().await
}

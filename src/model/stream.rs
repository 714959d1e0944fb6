//! Domain models for live-stream tracking.

use chrono::{DateTime, Utc};
use serenity::all::{GuildId, UserId};

use crate::{error::AppError, util::parse::parse_snowflake};

/// Link between a member and their Twitch channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamLink {
    pub id: i32,
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub twitch_handle: String,
    pub live: bool,
    /// Only true while `live` is true.
    pub role_applied: bool,
    pub updated_at: DateTime<Utc>,
}

impl StreamLink {
    pub fn from_entity(entity: entity::stream_link::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            guild_id: parse_snowflake(&entity.guild_id)?,
            user_id: parse_snowflake(&entity.user_id)?,
            twitch_handle: entity.twitch_handle,
            live: entity.live,
            role_applied: entity.role_applied,
            updated_at: entity.updated_at,
        })
    }
}

/// A stream currently on air.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStream {
    /// Lowercase login the stream was matched on.
    pub user_login: String,
    pub title: String,
    pub game_name: Option<String>,
    /// Thumbnail URL with size placeholders already filled in.
    pub thumbnail_url: Option<String>,
}

impl LiveStream {
    pub fn url(&self) -> String {
        format!("https://twitch.tv/{}", self.user_login)
    }
}

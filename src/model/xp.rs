//! Domain models for the experience system.

use chrono::{DateTime, Utc};
use serenity::all::{GuildId, UserId};

use crate::{error::AppError, util::parse::parse_snowflake};

/// A member's experience and derived level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpProfile {
    pub id: i32,
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub xp: i64,
    pub level: i32,
    /// Last time XP was credited. Decay does not move it.
    pub last_gain_at: DateTime<Utc>,
    pub revision: i32,
}

impl XpProfile {
    pub fn from_entity(entity: entity::xp_profile::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            guild_id: parse_snowflake(&entity.guild_id)?,
            user_id: parse_snowflake(&entity.user_id)?,
            xp: entity.xp,
            level: entity.level,
            last_gain_at: entity.last_gain_at,
            revision: entity.revision,
        })
    }
}

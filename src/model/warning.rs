//! Domain models for warnings.

use chrono::{DateTime, Utc};
use serenity::all::{GuildId, MessageId, UserId};

use crate::{error::AppError, util::parse::parse_snowflake};

/// A warning issued to a member, awaiting acknowledgment.
#[derive(Debug, Clone, PartialEq)]
pub struct WarningRecord {
    pub id: i32,
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub moderator_id: UserId,
    /// Per-member warning number, starting at 1.
    pub sequence: i32,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub acknowledged: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
    /// The DM the member must react to.
    pub dm_message_id: Option<MessageId>,
    pub timeout_applied: bool,
    /// Set when Discord refused the timeout; the sweep stops retrying.
    pub timeout_attempted: bool,
}

impl WarningRecord {
    /// Converts an entity model to a warning domain model at the repository boundary.
    pub fn from_entity(entity: entity::warning_record::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            guild_id: parse_snowflake(&entity.guild_id)?,
            user_id: parse_snowflake(&entity.user_id)?,
            moderator_id: parse_snowflake(&entity.moderator_id)?,
            sequence: entity.sequence,
            reason: entity.reason,
            created_at: entity.created_at,
            acknowledged: entity.acknowledged,
            acknowledged_at: entity.acknowledged_at,
            dm_message_id: entity
                .dm_message_id
                .as_deref()
                .map(parse_snowflake)
                .transpose()?,
            timeout_applied: entity.timeout_applied,
            timeout_attempted: entity.timeout_attempted,
        })
    }
}

/// Parameters for issuing a warning.
#[derive(Debug, Clone)]
pub struct WarnParams {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub moderator_id: UserId,
    pub reason: String,
}

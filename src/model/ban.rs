//! Domain models for bans.

use chrono::{DateTime, Utc};
use serenity::all::{GuildId, UserId};

use crate::{
    error::{internal::InternalError, AppError},
    util::parse::parse_snowflake,
};

/// A ban placed on a member, retained after it is lifted for audit.
#[derive(Debug, Clone, PartialEq)]
pub struct BanRecord {
    pub id: i32,
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub moderator_id: UserId,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    /// `None` for a permanent ban.
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub lifted_at: Option<DateTime<Utc>>,
    pub lift_reason: Option<LiftReason>,
}

impl BanRecord {
    /// Converts an entity model to a ban domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(BanRecord)` - The converted ban
    /// - `Err(AppError::InternalErr)` - A stored ID or lift reason is malformed
    pub fn from_entity(entity: entity::ban_record::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            guild_id: parse_snowflake(&entity.guild_id)?,
            user_id: parse_snowflake(&entity.user_id)?,
            moderator_id: parse_snowflake(&entity.moderator_id)?,
            reason: entity.reason,
            created_at: entity.created_at,
            expires_at: entity.expires_at,
            active: entity.active,
            lifted_at: entity.lifted_at,
            lift_reason: entity
                .lift_reason
                .as_deref()
                .map(LiftReason::parse)
                .transpose()?,
        })
    }

    /// Whether the ban is in force at `now`.
    pub fn is_in_force(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

/// Why a ban stopped being active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiftReason {
    /// The expiry sweep lifted it.
    Expired,
    /// Discord no longer had the ban when the sweep tried to lift it.
    Missing,
    /// A moderator lifted it.
    Manual,
    /// Discord permanently refused the unban, so the sweep stopped retrying.
    Failed,
}

impl LiftReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Missing => "missing",
            Self::Manual => "manual",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, InternalError> {
        match value {
            "expired" => Ok(Self::Expired),
            "missing" => Ok(Self::Missing),
            "manual" => Ok(Self::Manual),
            "failed" => Ok(Self::Failed),
            other => Err(InternalError::UnknownVariant {
                field: "lift_reason",
                value: other.to_string(),
            }),
        }
    }
}

/// Parameters for placing a ban.
#[derive(Debug, Clone)]
pub struct BanParams {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub moderator_id: UserId,
    pub reason: String,
    /// `None` for a permanent ban.
    pub expires_at: Option<DateTime<Utc>>,
}

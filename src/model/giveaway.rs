//! Domain models for giveaways.

use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, GuildId, MessageId, RoleId, UserId};

use crate::{
    error::{internal::InternalError, AppError},
    util::parse::{parse_snowflake, parse_snowflake_list},
};

/// A giveaway and everyone who entered it.
#[derive(Debug, Clone, PartialEq)]
pub struct Giveaway {
    pub id: i32,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub host_id: UserId,
    pub prize: String,
    pub winners_count: u32,
    /// Entrants without this role are skipped when drawing.
    pub required_role_id: Option<RoleId>,
    pub ends_at: DateTime<Utc>,
    pub status: GiveawayStatus,
    /// Entrants in entry order. Never cleared, so an ended giveaway can be rerolled.
    pub participants: Vec<UserId>,
    /// Result of the latest draw.
    pub winners: Vec<UserId>,
    pub ended_at: Option<DateTime<Utc>>,
    pub revision: i32,
}

impl Giveaway {
    /// Converts an entity model to a giveaway domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(Giveaway)` - The converted giveaway
    /// - `Err(AppError)` - A stored ID, status or JSON list is malformed
    pub fn from_entity(entity: entity::giveaway::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            guild_id: parse_snowflake(&entity.guild_id)?,
            channel_id: parse_snowflake(&entity.channel_id)?,
            message_id: parse_snowflake(&entity.message_id)?,
            host_id: parse_snowflake(&entity.host_id)?,
            prize: entity.prize,
            winners_count: entity.winners_count.max(0) as u32,
            required_role_id: entity
                .required_role_id
                .as_deref()
                .map(parse_snowflake)
                .transpose()?,
            ends_at: entity.ends_at,
            status: GiveawayStatus::parse(&entity.status)?,
            participants: parse_snowflake_list(&entity.participants)?,
            winners: parse_snowflake_list(&entity.winners)?,
            ended_at: entity.ended_at,
            revision: entity.revision,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == GiveawayStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveawayStatus {
    Active,
    Ended,
    /// Ended by a moderator without a draw. Cannot be rerolled.
    Cancelled,
}

impl GiveawayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Result<Self, InternalError> {
        match value {
            "active" => Ok(Self::Active),
            "ended" => Ok(Self::Ended),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(InternalError::UnknownVariant {
                field: "giveaway status",
                value: other.to_string(),
            }),
        }
    }
}

/// Parameters for starting a giveaway.
#[derive(Debug, Clone)]
pub struct StartGiveawayParams {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub host_id: UserId,
    pub prize: String,
    pub winners_count: u32,
    pub required_role_id: Option<RoleId>,
    pub ends_at: DateTime<Utc>,
}

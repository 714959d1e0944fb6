//! Domain models for rank role mirroring.

use chrono::{DateTime, Utc};
use serenity::all::{GuildId, UserId};

use crate::{
    error::{internal::InternalError, AppError},
    util::parse::parse_snowflake,
};

/// Placement at or above which a player holds the Ruby tier.
const RUBY_PLACEMENT_CUTOFF: u32 = 500;

/// Link between a member and their in-game handle.
#[derive(Debug, Clone, PartialEq)]
pub struct RankLink {
    pub id: i32,
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub handle: String,
    /// Tier whose role was last applied. Only written after a successful fetch.
    pub last_synced_rank: Option<RankTier>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl RankLink {
    pub fn from_entity(entity: entity::rank_link::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            guild_id: parse_snowflake(&entity.guild_id)?,
            user_id: parse_snowflake(&entity.user_id)?,
            handle: entity.handle,
            last_synced_rank: entity
                .last_synced_rank
                .as_deref()
                .map(RankTier::parse)
                .transpose()?,
            last_synced_at: entity.last_synced_at,
        })
    }
}

/// A player's current standing as reported by the rank API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankSnapshot {
    pub score: i64,
    /// Leaderboard position, 1-based. `None` when unranked.
    pub placement: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Ruby,
}

impl RankTier {
    pub const ALL: [RankTier; 6] = [
        Self::Bronze,
        Self::Silver,
        Self::Gold,
        Self::Platinum,
        Self::Diamond,
        Self::Ruby,
    ];

    /// Derives the tier for a snapshot. Top placements are Ruby regardless of score.
    pub fn from_snapshot(snapshot: &RankSnapshot) -> Self {
        if let Some(placement) = snapshot.placement {
            if (1..=RUBY_PLACEMENT_CUTOFF).contains(&placement) {
                return Self::Ruby;
            }
        }

        match snapshot.score {
            score if score < 10_000 => Self::Bronze,
            score if score < 20_000 => Self::Silver,
            score if score < 30_000 => Self::Gold,
            score if score < 40_000 => Self::Platinum,
            _ => Self::Diamond,
        }
    }

    /// Name of the Discord role for this tier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Diamond => "Diamond",
            Self::Ruby => "Ruby",
        }
    }

    /// Colour used when the tier role has to be created.
    pub fn colour(&self) -> u32 {
        match self {
            Self::Bronze => 0xCD7F32,
            Self::Silver => 0xC0C0C0,
            Self::Gold => 0xFFD700,
            Self::Platinum => 0xE5E4E2,
            Self::Diamond => 0xB9F2FF,
            Self::Ruby => 0xE0115F,
        }
    }

    pub fn parse(value: &str) -> Result<Self, InternalError> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.name() == value)
            .ok_or_else(|| InternalError::UnknownVariant {
                field: "rank tier",
                value: value.to_string(),
            })
    }
}

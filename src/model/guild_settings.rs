//! Per-guild feature switches and configuration.

use serenity::all::{ChannelId, GuildId, RoleId};

use crate::{
    error::AppError,
    util::parse::{parse_snowflake, parse_snowflake_list},
};

/// A toggleable policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Bans,
    Warnings,
    Xp,
    ModeratorPoints,
    RankRoles,
    Giveaways,
    StreamAlerts,
}

/// Configuration for one guild. A guild without a row has every feature disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSettings {
    pub guild_id: GuildId,
    pub bans_enabled: bool,
    pub warnings_enabled: bool,
    pub xp_enabled: bool,
    pub moderator_points_enabled: bool,
    pub rank_roles_enabled: bool,
    pub giveaways_enabled: bool,
    pub stream_alerts_enabled: bool,
    /// Members holding this role earn moderator points.
    pub moderator_role_id: Option<RoleId>,
    /// Voice channels that count toward moderator voice points.
    pub moderator_voice_channel_ids: Vec<ChannelId>,
    /// Where go-live notifications are posted.
    pub stream_channel_id: Option<ChannelId>,
}

impl GuildSettings {
    pub fn from_entity(entity: entity::guild_settings::Model) -> Result<Self, AppError> {
        Ok(Self {
            guild_id: parse_snowflake(&entity.guild_id)?,
            bans_enabled: entity.bans_enabled,
            warnings_enabled: entity.warnings_enabled,
            xp_enabled: entity.xp_enabled,
            moderator_points_enabled: entity.moderator_points_enabled,
            rank_roles_enabled: entity.rank_roles_enabled,
            giveaways_enabled: entity.giveaways_enabled,
            stream_alerts_enabled: entity.stream_alerts_enabled,
            moderator_role_id: entity
                .moderator_role_id
                .as_deref()
                .map(parse_snowflake)
                .transpose()?,
            moderator_voice_channel_ids: parse_snowflake_list(&entity.moderator_voice_channel_ids)?,
            stream_channel_id: entity
                .stream_channel_id
                .as_deref()
                .map(parse_snowflake)
                .transpose()?,
        })
    }

    /// Settings for a guild with no stored row.
    pub fn disabled(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            bans_enabled: false,
            warnings_enabled: false,
            xp_enabled: false,
            moderator_points_enabled: false,
            rank_roles_enabled: false,
            giveaways_enabled: false,
            stream_alerts_enabled: false,
            moderator_role_id: None,
            moderator_voice_channel_ids: Vec::new(),
            stream_channel_id: None,
        }
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Bans => self.bans_enabled,
            Feature::Warnings => self.warnings_enabled,
            Feature::Xp => self.xp_enabled,
            Feature::ModeratorPoints => self.moderator_points_enabled,
            Feature::RankRoles => self.rank_roles_enabled,
            Feature::Giveaways => self.giveaways_enabled,
            Feature::StreamAlerts => self.stream_alerts_enabled,
        }
    }
}

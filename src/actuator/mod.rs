//! Adapters for every external side effect and read.
//!
//! Policies only talk to Discord and the HTTP APIs through these traits so the
//! same reconciliation code runs against the live gateway and the in-crate
//! mocks used by tests.

pub mod discord;
pub mod rank;
pub mod stream;


use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, GuildId, MessageId, RoleId, UserId};

use crate::{
    error::actuator::ActuatorError,
    model::{notice::Notice, role::RoleSpec},
};

/// Outcome of a direct message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectMessage {
    Delivered(MessageId),
    /// The member has DMs closed or shares no server with the bot.
    Undeliverable,
}

/// A member connected to a voice channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicePresence {
    pub user_id: UserId,
    pub channel_id: ChannelId,
    pub is_bot: bool,
}

/// Side effects against the chat platform.
#[async_trait]
pub trait ChatActuator: Send + Sync {
    async fn assign_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), ActuatorError>;

    async fn remove_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), ActuatorError>;

    async fn send_message(
        &self,
        channel_id: ChannelId,
        notice: &Notice,
    ) -> Result<MessageId, ActuatorError>;

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        notice: &Notice,
    ) -> Result<(), ActuatorError>;

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), ActuatorError>;

    async fn ban_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), ActuatorError>;

    async fn unban_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), ActuatorError>;

    /// Sends a DM. A closed inbox is reported as `Undeliverable`, not an error.
    async fn send_direct_message(
        &self,
        user_id: UserId,
        notice: &Notice,
    ) -> Result<DirectMessage, ActuatorError>;

    /// Times a member out until `until`, or lifts the timeout when `None`.
    async fn timeout_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        until: Option<DateTime<Utc>>,
    ) -> Result<(), ActuatorError>;

    async fn create_role(&self, guild_id: GuildId, spec: &RoleSpec)
        -> Result<RoleId, ActuatorError>;
}

/// Read-side view of guild state.
#[async_trait]
pub trait GuildDirectory: Send + Sync {
    /// Role IDs a member holds, or `None` when they are not in the guild.
    async fn member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Vec<RoleId>>, ActuatorError>;

    /// Members in voice channels other than the AFK channel.
    fn voice_presence(&self, guild_id: GuildId) -> Vec<VoicePresence>;

    fn role_by_name(&self, guild_id: GuildId, name: &str) -> Option<RoleId>;

    fn members_with_role(&self, guild_id: GuildId, role_id: RoleId) -> Vec<UserId>;
}

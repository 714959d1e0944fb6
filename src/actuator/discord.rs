use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serenity::{
    all::{ChannelId, GuildId, MessageId, RoleId, UserId},
    builder::{CreateEmbed, CreateEmbedFooter, CreateMessage, EditMember, EditMessage, EditRole},
    cache::Cache,
    http::Http,
};

use crate::{
    actuator::{ChatActuator, DirectMessage, GuildDirectory, VoicePresence},
    error::actuator::ActuatorError,
    model::{notice::Notice, role::RoleSpec},
};

/// Live Discord implementation of the actuator and directory traits.
///
/// Writes go through the REST client; reads come from the gateway cache and
/// fall back to REST for member lookups the cache does not hold.
#[derive(Clone)]
pub struct DiscordGateway {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }
}

/// Renders a notice as a Discord embed.
fn build_embed(notice: &Notice) -> CreateEmbed {
    let mut embed = CreateEmbed::new().description(&notice.description);

    if let Some(title) = &notice.title {
        embed = embed.title(title);
    }
    if let Some(url) = &notice.url {
        embed = embed.url(url);
    }
    if let Some(colour) = notice.colour {
        embed = embed.color(colour);
    }
    for (name, value) in &notice.fields {
        embed = embed.field(name, value, true);
    }
    if let Some(image_url) = &notice.image_url {
        embed = embed.image(image_url);
    }
    if let Some(footer) = &notice.footer {
        embed = embed.footer(CreateEmbedFooter::new(footer));
    }

    embed
}

#[async_trait]
impl ChatActuator for DiscordGateway {
    async fn assign_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), ActuatorError> {
        self.http
            .add_member_role(guild_id, user_id, role_id, Some(reason))
            .await
            .map_err(ActuatorError::from)
    }

    async fn remove_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> Result<(), ActuatorError> {
        self.http
            .remove_member_role(guild_id, user_id, role_id, Some(reason))
            .await
            .map_err(ActuatorError::from)
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        notice: &Notice,
    ) -> Result<MessageId, ActuatorError> {
        let message = CreateMessage::new().embed(build_embed(notice));

        let sent = channel_id.send_message(&self.http, message).await?;

        Ok(sent.id)
    }

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        notice: &Notice,
    ) -> Result<(), ActuatorError> {
        let edit = EditMessage::new().embed(build_embed(notice));

        self.http
            .edit_message(channel_id, message_id, &edit, vec![])
            .await?;

        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), ActuatorError> {
        self.http
            .delete_message(channel_id, message_id, None)
            .await
            .map_err(ActuatorError::from)
    }

    async fn ban_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), ActuatorError> {
        self.http
            .ban_user(guild_id, user_id, 0, Some(reason))
            .await
            .map_err(ActuatorError::from)
    }

    async fn unban_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), ActuatorError> {
        self.http
            .remove_ban(guild_id, user_id, Some(reason))
            .await
            .map_err(ActuatorError::from)
    }

    async fn send_direct_message(
        &self,
        user_id: UserId,
        notice: &Notice,
    ) -> Result<DirectMessage, ActuatorError> {
        let message = CreateMessage::new().embed(build_embed(notice));

        match user_id.direct_message(&self.http, message).await {
            Ok(sent) => Ok(DirectMessage::Delivered(sent.id)),
            Err(e) => match ActuatorError::classify(&e) {
                // Discord answers 403 for closed DMs and 404 for unknown users
                ActuatorError::Forbidden(_) | ActuatorError::NotFound(_) => {
                    Ok(DirectMessage::Undeliverable)
                }
                other => Err(other),
            },
        }
    }

    async fn timeout_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        until: Option<DateTime<Utc>>,
    ) -> Result<(), ActuatorError> {
        let edit = match until {
            Some(until) => EditMember::new()
                .disable_communication_until(until.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => EditMember::new().enable_communication(),
        };

        guild_id.edit_member(&self.http, user_id, edit).await?;

        Ok(())
    }

    async fn create_role(
        &self,
        guild_id: GuildId,
        spec: &RoleSpec,
    ) -> Result<RoleId, ActuatorError> {
        let builder = EditRole::new()
            .name(&spec.name)
            .colour(spec.colour)
            .hoist(spec.hoist)
            .mentionable(spec.mentionable)
            .audit_log_reason("Managed role was missing");

        let role = guild_id.create_role(&self.http, builder).await?;

        Ok(role.id)
    }
}

#[async_trait]
impl GuildDirectory for DiscordGateway {
    async fn member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Vec<RoleId>>, ActuatorError> {
        // Scoped so the cache guard is released before the REST fallback awaits
        let cached = {
            self.cache.guild(guild_id).and_then(|guild| {
                guild
                    .members
                    .get(&user_id)
                    .map(|member| member.roles.clone())
            })
        };
        if let Some(roles) = cached {
            return Ok(Some(roles));
        }

        match self.http.get_member(guild_id, user_id).await {
            Ok(member) => Ok(Some(member.roles)),
            Err(e) => match ActuatorError::classify(&e) {
                ActuatorError::NotFound(_) => Ok(None),
                other => Err(other),
            },
        }
    }

    fn voice_presence(&self, guild_id: GuildId) -> Vec<VoicePresence> {
        let Some(guild) = self.cache.guild(guild_id) else {
            return Vec::new();
        };
        let afk_channel = guild.afk_metadata.as_ref().map(|afk| afk.afk_channel_id);

        guild
            .voice_states
            .values()
            .filter_map(|state| {
                let channel_id = state.channel_id?;
                if Some(channel_id) == afk_channel {
                    return None;
                }

                let is_bot = state
                    .member
                    .as_ref()
                    .map(|member| member.user.bot)
                    .or_else(|| guild.members.get(&state.user_id).map(|m| m.user.bot))
                    .unwrap_or(false);

                Some(VoicePresence {
                    user_id: state.user_id,
                    channel_id,
                    is_bot,
                })
            })
            .collect()
    }

    fn role_by_name(&self, guild_id: GuildId, name: &str) -> Option<RoleId> {
        let guild = self.cache.guild(guild_id)?;

        guild
            .roles
            .values()
            .find(|role| role.name == name)
            .map(|role| role.id)
    }

    fn members_with_role(&self, guild_id: GuildId, role_id: RoleId) -> Vec<UserId> {
        let Some(guild) = self.cache.guild(guild_id) else {
            return Vec::new();
        };

        guild
            .members
            .values()
            .filter(|member| !member.user.bot && member.roles.contains(&role_id))
            .map(|member| member.user.id)
            .collect()
    }
}

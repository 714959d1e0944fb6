//! Temporary and permanent bans, and the sweep that lifts expired ones.
//!
//! The ban record is the source of truth for "is this member banned by us".
//! Discord is told first and the record follows, so a failed Discord call
//! never leaves a record claiming a ban that does not exist.

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serenity::all::{ChannelId, GuildId, MessageId, UserId};

use crate::{
    actuator::ChatActuator,
    data::ban::BanRepository,
    error::{actuator::ActuatorError, AppError},
    model::ban::{BanParams, BanRecord, LiftReason},
    scheduler::shutdown::Shutdown,
    service::isolate,
};

pub struct BanService<'a> {
    db: &'a DatabaseConnection,
    actuator: &'a dyn ChatActuator,
}

impl<'a> BanService<'a> {
    pub fn new(db: &'a DatabaseConnection, actuator: &'a dyn ChatActuator) -> Self {
        Self { db, actuator }
    }

    /// Bans a member and records the ban.
    ///
    /// A member who already has an active ban keeps that single record with
    /// the new moderator, reason and expiry.
    ///
    /// # Arguments
    /// - `params` - Guild, member, moderator, reason and optional expiry
    /// - `now` - Time the ban is issued
    ///
    /// # Returns
    /// - `Ok(BanRecord)` - The active ban
    /// - `Err(AppError::ActuatorErr)` - Discord refused the ban; nothing was recorded
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn ban(&self, params: &BanParams, now: DateTime<Utc>) -> Result<BanRecord, AppError> {
        self.actuator
            .ban_member(params.guild_id, params.user_id, &params.reason)
            .await?;

        let repo = BanRepository::new(self.db);
        if let Some(existing) = repo.find_active(params.guild_id, params.user_id).await? {
            if let Some(updated) = repo.update_active(existing.id, params).await? {
                tracing::info!(
                    "Updated ban {} for user {} in guild {}",
                    updated.id,
                    params.user_id,
                    params.guild_id
                );
                return Ok(updated);
            }
        }

        let ban = repo.create(params, now).await?;
        tracing::info!(
            "Banned user {} in guild {} until {}",
            params.user_id,
            params.guild_id,
            ban.expires_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "lifted".to_string())
        );

        Ok(ban)
    }

    /// Lifts a member's ban by hand.
    ///
    /// # Returns
    /// - `Ok(true)` - An active ban record was lifted
    /// - `Ok(false)` - The member had no active ban record; Discord was still told to unban
    /// - `Err(AppError)` - Discord or database failure; the record stays active
    pub async fn lift(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        match self
            .actuator
            .unban_member(guild_id, user_id, "Ban lifted by moderator")
            .await
        {
            Ok(()) | Err(ActuatorError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let repo = BanRepository::new(self.db);
        let Some(ban) = repo.find_active(guild_id, user_id).await? else {
            return Ok(false);
        };

        repo.deactivate(ban.id, LiftReason::Manual, now).await
    }

    pub async fn is_actively_banned(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        BanRepository::new(self.db)
            .is_actively_banned(guild_id, user_id, now)
            .await
    }

    /// Lifts every active ban whose expiry has passed.
    ///
    /// A ban is only marked inactive once Discord confirms the unban, reports
    /// there is no ban left to lift, or refuses the unban for good. Transient
    /// failures leave the record active for the next sweep.
    pub async fn expire_bans(&self, now: DateTime<Utc>, shutdown: &Shutdown) -> Result<(), AppError> {
        let expired = BanRepository::new(self.db).find_expired(now).await?;

        for ban in expired {
            if shutdown.is_requested() {
                break;
            }

            let result = self.expire_one(&ban, now).await;
            isolate("ban_expiry", format_args!("ban {}", ban.id), result)?;
        }

        Ok(())
    }

    async fn expire_one(&self, ban: &BanRecord, now: DateTime<Utc>) -> Result<(), AppError> {
        let repo = BanRepository::new(self.db);

        let reason = match self
            .actuator
            .unban_member(ban.guild_id, ban.user_id, "Temporary ban expired")
            .await
        {
            Ok(()) => LiftReason::Expired,
            Err(ActuatorError::NotFound(_)) => {
                tracing::warn!(
                    "Ban {} for user {} no longer exists on Discord",
                    ban.id,
                    ban.user_id
                );
                LiftReason::Missing
            }
            Err(e) if e.is_permanent() => {
                tracing::warn!(
                    "Discord refused to lift ban {} for user {}: {}; closing the record",
                    ban.id,
                    ban.user_id,
                    e
                );
                LiftReason::Failed
            }
            Err(e) => return Err(e.into()),
        };

        if repo.deactivate(ban.id, reason, now).await? {
            tracing::info!(
                "Lifted expired ban {} for user {} in guild {}",
                ban.id,
                ban.user_id,
                ban.guild_id
            );
        }

        Ok(())
    }

    /// Deletes a message posted by a member who is actively banned.
    ///
    /// # Returns
    /// - `Ok(true)` - The author is banned and the message was removed
    /// - `Ok(false)` - The author is not banned
    pub async fn on_message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        author_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        if !self.is_actively_banned(guild_id, author_id, now).await? {
            return Ok(false);
        }

        match self.actuator.delete_message(channel_id, message_id).await {
            Ok(()) | Err(ActuatorError::NotFound(_)) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}

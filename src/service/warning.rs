//! Warnings that must be acknowledged, and the timeout that enforces them.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serenity::all::{GuildId, MessageId, UserId};

use crate::{
    actuator::{ChatActuator, DirectMessage},
    config::WarningConfig,
    data::{guild_settings::GuildSettingsRepository, warning::WarningRepository},
    error::{actuator::ActuatorError, AppError},
    model::{
        guild_settings::Feature,
        notice::Notice,
        warning::{WarnParams, WarningRecord},
    },
    scheduler::shutdown::Shutdown,
    service::isolate,
};

const WARNING_COLOUR: u32 = 0xE67E22;
const TIMEOUT_COLOUR: u32 = 0xE74C3C;
const ACKNOWLEDGED_COLOUR: u32 = 0x2ECC71;

pub struct WarningService<'a> {
    db: &'a DatabaseConnection,
    actuator: &'a dyn ChatActuator,
    config: &'a WarningConfig,
}

impl<'a> WarningService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        actuator: &'a dyn ChatActuator,
        config: &'a WarningConfig,
    ) -> Self {
        Self {
            db,
            actuator,
            config,
        }
    }

    /// Records a warning and DMs the member asking for acknowledgment.
    ///
    /// The warning stands even when the DM cannot be delivered. A member who
    /// cannot receive the DM has no way to acknowledge it, so such warnings
    /// are excluded from the timeout sweep.
    ///
    /// # Returns
    /// - `Ok(WarningRecord)` - The persisted warning, with `dm_message_id` set when delivered
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn warn(
        &self,
        params: &WarnParams,
        now: DateTime<Utc>,
    ) -> Result<WarningRecord, AppError> {
        let repo = WarningRepository::new(self.db);
        let mut warning = repo.create(params, now).await?;

        tracing::info!(
            "Issued warning #{} to user {} in guild {}",
            warning.sequence,
            warning.user_id,
            warning.guild_id
        );

        match self
            .actuator
            .send_direct_message(warning.user_id, &self.warning_notice(&warning))
            .await
        {
            Ok(DirectMessage::Delivered(message_id)) => {
                repo.set_dm_message(warning.id, message_id).await?;
                warning.dm_message_id = Some(message_id);
            }
            Ok(DirectMessage::Undeliverable) => {
                tracing::info!(
                    "User {} does not accept DMs; warning {} will not be enforced",
                    warning.user_id,
                    warning.id
                );
                repo.mark_timeout_attempted(warning.id).await?;
                warning.timeout_attempted = true;
            }
            Err(e) => {
                tracing::warn!("Failed to DM warning {} to user {}: {}", warning.id, warning.user_id, e);
            }
        }

        Ok(warning)
    }

    /// Handles a reaction on a direct message.
    ///
    /// An acknowledgment emoji on a stored warning DM marks that warning
    /// acknowledged and lifts the timeout the sweep applied for it.
    ///
    /// # Returns
    /// - `Ok(true)` - A warning was acknowledged
    /// - `Ok(false)` - Not an acknowledgment, or already acknowledged
    /// - `Err(AppError)` - Lifting the timeout failed; the warning stays unacknowledged
    pub async fn on_reaction(
        &self,
        user_id: UserId,
        message_id: MessageId,
        emoji: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        if emoji != self.config.ack_emoji {
            return Ok(false);
        }

        let repo = WarningRepository::new(self.db);
        let Some(warning) = repo.find_by_dm_message(user_id, message_id).await? else {
            return Ok(false);
        };
        if warning.acknowledged {
            return Ok(false);
        }

        if warning.timeout_applied {
            match self
                .actuator
                .timeout_member(warning.guild_id, warning.user_id, None)
                .await
            {
                Ok(()) | Err(ActuatorError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        if !repo.acknowledge(warning.id, now).await? {
            return Ok(false);
        }

        tracing::info!(
            "User {} acknowledged warning #{} in guild {}",
            warning.user_id,
            warning.sequence,
            warning.guild_id
        );

        let confirmation = Notice::new(format!(
            "Thank you for acknowledging warning #{}.",
            warning.sequence
        ))
        .title("Warning acknowledged")
        .colour(ACKNOWLEDGED_COLOUR);
        if let Err(e) = self
            .actuator
            .send_direct_message(warning.user_id, &confirmation)
            .await
        {
            tracing::debug!("Acknowledgment confirmation to {} failed: {}", warning.user_id, e);
        }

        Ok(true)
    }

    /// Times out members who let a warning go unacknowledged past the deadline.
    pub async fn enforce_deadlines(
        &self,
        now: DateTime<Utc>,
        shutdown: &Shutdown,
    ) -> Result<(), AppError> {
        let enabled: HashSet<GuildId> = GuildSettingsRepository::new(self.db)
            .get_enabled(Feature::Warnings)
            .await?
            .into_iter()
            .map(|settings| settings.guild_id)
            .collect();

        let due = WarningRepository::new(self.db)
            .find_due_for_timeout(now - self.config.ack_deadline)
            .await?;

        for warning in due {
            if shutdown.is_requested() {
                break;
            }
            if !enabled.contains(&warning.guild_id) {
                continue;
            }

            let result = self.enforce_one(&warning, now).await;
            isolate("warning_reminder", format_args!("warning {}", warning.id), result)?;
        }

        Ok(())
    }

    async fn enforce_one(&self, warning: &WarningRecord, now: DateTime<Utc>) -> Result<(), AppError> {
        let repo = WarningRepository::new(self.db);
        let until = now + self.config.timeout_duration;

        match self
            .actuator
            .timeout_member(warning.guild_id, warning.user_id, Some(until))
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_permanent() => {
                tracing::warn!(
                    "Cannot time out user {} for warning {}: {}",
                    warning.user_id,
                    warning.id,
                    e
                );
                repo.mark_timeout_attempted(warning.id).await?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        if !repo.mark_timeout_applied(warning.id).await? {
            // Acknowledged while the timeout was being applied
            self.actuator
                .timeout_member(warning.guild_id, warning.user_id, None)
                .await?;
            return Ok(());
        }

        tracing::info!(
            "Timed out user {} in guild {} for unacknowledged warning #{}",
            warning.user_id,
            warning.guild_id,
            warning.sequence
        );

        let reminder = Notice::new(format!(
            "You have been timed out for not acknowledging a warning within {} hours.\n\n\
             To remove the timeout, react with {} to the original warning message in your DMs.",
            self.config.ack_deadline.num_hours(),
            self.config.ack_emoji
        ))
        .title("Timed out")
        .colour(TIMEOUT_COLOUR)
        .field("Reason", warning.reason.clone());

        match self
            .actuator
            .send_direct_message(warning.user_id, &reminder)
            .await
        {
            Ok(DirectMessage::Delivered(_)) => {}
            Ok(DirectMessage::Undeliverable) => {
                tracing::info!("Timeout reminder for warning {} not delivered", warning.id)
            }
            Err(e) => tracing::warn!("Timeout reminder for warning {} failed: {}", warning.id, e),
        }

        Ok(())
    }

    fn warning_notice(&self, warning: &WarningRecord) -> Notice {
        Notice::new(format!(
            "You have received warning #{} from the moderators.",
            warning.sequence
        ))
        .title("Warning")
        .colour(WARNING_COLOUR)
        .field("Reason", warning.reason.clone())
        .field(
            "Acknowledgment required",
            format!(
                "Please react with {} to acknowledge this warning. If you do not acknowledge within {} hours, you will be timed out.",
                self.config.ack_emoji,
                self.config.ack_deadline.num_hours()
            ),
        )
    }
}

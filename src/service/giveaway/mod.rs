//! Giveaway lifecycle: posting, entry, countdown, ending and rerolls.
//!
//! A giveaway leaves `active` exactly once, either `ended` with a draw or
//! `cancelled` without one. The transition is a conditional update on the
//! status, so a sweep racing an early end announces winners only once, and the
//! caller that loses the race puts the stored result back on the message.

pub mod draw;
pub mod render;

use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::DatabaseConnection;
use serenity::all::{MessageId, UserId};

use crate::{
    actuator::{ChatActuator, GuildDirectory},
    config::GiveawayConfig,
    data::giveaway::GiveawayRepository,
    error::{actuator::ActuatorError, internal::InternalError, AppError},
    model::giveaway::{Giveaway, GiveawayStatus, StartGiveawayParams},
    scheduler::shutdown::Shutdown,
    service::isolate,
};

use self::render::Listing;

const MAX_WRITE_ATTEMPTS: u32 = 3;

pub struct GiveawayService<'a> {
    db: &'a DatabaseConnection,
    actuator: &'a dyn ChatActuator,
    directory: &'a dyn GuildDirectory,
    config: &'a GiveawayConfig,
}

impl<'a> GiveawayService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        actuator: &'a dyn ChatActuator,
        directory: &'a dyn GuildDirectory,
        config: &'a GiveawayConfig,
    ) -> Self {
        Self {
            db,
            actuator,
            directory,
            config,
        }
    }

    /// Posts the giveaway message and records the giveaway against it.
    ///
    /// # Returns
    /// - `Ok(Giveaway)`: The active giveaway
    /// - `Err(AppError::BadRequest)`: No winners requested or the end time has passed
    /// - `Err(AppError)`: The message could not be posted or the store failed
    pub async fn start_giveaway(
        &self,
        params: &StartGiveawayParams,
        now: DateTime<Utc>,
    ) -> Result<Giveaway, AppError> {
        if params.winners_count == 0 {
            return Err(AppError::BadRequest(
                "A giveaway needs at least one winner".to_string(),
            ));
        }
        if params.ends_at <= now {
            return Err(AppError::BadRequest(
                "A giveaway must end in the future".to_string(),
            ));
        }

        let notice = render::running(&Listing::from(params), 0, &self.config.entry_emoji, now);
        let message_id = self.actuator.send_message(params.channel_id, &notice).await?;

        let giveaway = GiveawayRepository::new(self.db)
            .create(params, message_id, now)
            .await?;

        tracing::info!(
            "Started giveaway {} for \"{}\" in guild {}",
            giveaway.id,
            giveaway.prize,
            giveaway.guild_id
        );

        Ok(giveaway)
    }

    /// Enters a user who reacted to a giveaway message.
    ///
    /// # Returns
    /// - `Ok(true)`: The user was added to the participants
    /// - `Ok(false)`: Not an entry (wrong emoji, bot, unknown message, ended
    ///   giveaway or already entered)
    pub async fn on_reaction(
        &self,
        message_id: MessageId,
        user_id: UserId,
        is_bot: bool,
        emoji: &str,
    ) -> Result<bool, AppError> {
        if is_bot || emoji != self.config.entry_emoji {
            return Ok(false);
        }

        let repo = GiveawayRepository::new(self.db);
        let mut giveaway_id = 0;

        for _ in 0..MAX_WRITE_ATTEMPTS {
            let Some(giveaway) = repo.get_by_message(message_id).await? else {
                return Ok(false);
            };
            giveaway_id = giveaway.id;
            if !giveaway.is_active() || giveaway.participants.contains(&user_id) {
                return Ok(false);
            }

            let mut participants = giveaway.participants.clone();
            participants.push(user_id);

            if repo.update_participants(&giveaway, &participants).await? {
                tracing::debug!("User {} entered giveaway {}", user_id, giveaway.id);
                return Ok(true);
            }
        }

        Err(InternalError::WriteConflict {
            entity: "giveaway",
            id: giveaway_id,
            attempts: MAX_WRITE_ATTEMPTS,
        }
        .into())
    }

    /// Ends every active giveaway whose end time has passed.
    pub async fn end_due<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        shutdown: &Shutdown,
        rng: &mut R,
    ) -> Result<(), AppError> {
        let due = GiveawayRepository::new(self.db).find_due(now).await?;

        for giveaway in due {
            if shutdown.is_requested() {
                break;
            }

            let result = self.end(&giveaway, now, rng).await.map(|_| ());
            isolate("giveaway_end", format_args!("giveaway {}", giveaway.id), result)?;
        }

        Ok(())
    }

    /// Ends a giveaway before its scheduled time.
    ///
    /// # Returns
    /// - `Ok(Some(winners))`: This call ended the giveaway
    /// - `Ok(None)`: It had already ended
    /// - `Err(AppError::NotFound)`: No giveaway with that ID
    pub async fn end_early<R: Rng + ?Sized>(
        &self,
        id: i32,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Option<Vec<UserId>>, AppError> {
        let giveaway = self.require(id).await?;
        if !giveaway.is_active() {
            return Ok(None);
        }

        self.end(&giveaway, now, rng).await
    }

    /// Ends a giveaway without drawing winners. A cancelled giveaway cannot
    /// be rerolled.
    ///
    /// # Returns
    /// - `Ok(true)`: The giveaway was cancelled
    /// - `Ok(false)`: It had already ended or been cancelled
    pub async fn cancel(&self, id: i32, now: DateTime<Utc>) -> Result<bool, AppError> {
        let giveaway = self.require(id).await?;
        if !giveaway.is_active() {
            return Ok(false);
        }

        if !GiveawayRepository::new(self.db)
            .mark_cancelled(giveaway.id, now)
            .await?
        {
            return Ok(false);
        }

        let notice = render::cancelled(&Listing::from(&giveaway));
        if let Err(e) = self
            .actuator
            .edit_message(giveaway.channel_id, giveaway.message_id, &notice)
            .await
        {
            tracing::warn!("Could not mark giveaway {} as cancelled: {}", giveaway.id, e);
        }

        tracing::info!("Cancelled giveaway {}", giveaway.id);

        Ok(true)
    }

    /// Draws new winners for an ended giveaway from its stored participants.
    ///
    /// Earlier winners stay eligible.
    pub async fn reroll<R: Rng + ?Sized>(
        &self,
        id: i32,
        rng: &mut R,
    ) -> Result<Vec<UserId>, AppError> {
        let giveaway = self.require(id).await?;
        match giveaway.status {
            GiveawayStatus::Ended => {}
            GiveawayStatus::Active => {
                return Err(AppError::BadRequest(format!(
                    "Giveaway {} has not ended yet",
                    giveaway.id
                )))
            }
            GiveawayStatus::Cancelled => {
                return Err(AppError::BadRequest(format!(
                    "Giveaway {} was cancelled",
                    giveaway.id
                )))
            }
        }

        let eligible = draw::eligible_participants(self.directory, &giveaway).await?;
        let winners = draw::pick_winners(&eligible, giveaway.winners_count, rng);

        if !GiveawayRepository::new(self.db)
            .set_winners(giveaway.id, &winners)
            .await?
        {
            return Err(AppError::NotFound(format!("Giveaway {} not found", giveaway.id)));
        }

        let listing = Listing::from(&giveaway);
        match self
            .actuator
            .edit_message(
                giveaway.channel_id,
                giveaway.message_id,
                &render::ended(&listing, &winners),
            )
            .await
        {
            Ok(()) | Err(ActuatorError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        if let Err(e) = self
            .actuator
            .send_message(
                giveaway.channel_id,
                &render::reroll_announcement(&giveaway.prize, &winners),
            )
            .await
        {
            tracing::warn!("Reroll announcement for giveaway {} failed: {}", giveaway.id, e);
        }

        tracing::info!(
            "Rerolled giveaway {}: {} winner(s)",
            giveaway.id,
            winners.len()
        );

        Ok(winners)
    }

    /// Refreshes the time remaining on every running giveaway. Never writes.
    pub async fn countdown(&self, now: DateTime<Utc>, shutdown: &Shutdown) -> Result<(), AppError> {
        let running = GiveawayRepository::new(self.db).find_running(now).await?;

        for giveaway in running {
            if shutdown.is_requested() {
                break;
            }

            let notice = render::running(
                &Listing::from(&giveaway),
                giveaway.participants.len(),
                &self.config.entry_emoji,
                now,
            );
            let result = match self
                .actuator
                .edit_message(giveaway.channel_id, giveaway.message_id, &notice)
                .await
            {
                Ok(()) => Ok(()),
                Err(ActuatorError::NotFound(_)) => {
                    tracing::debug!(
                        "Giveaway {} message is gone; it will end on schedule",
                        giveaway.id
                    );
                    Ok(())
                }
                Err(e) => Err(e.into()),
            };
            isolate(
                "giveaway_countdown",
                format_args!("giveaway {}", giveaway.id),
                result,
            )?;
        }

        Ok(())
    }

    async fn require(&self, id: i32) -> Result<Giveaway, AppError> {
        GiveawayRepository::new(self.db)
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Giveaway {} not found", id)))
    }

    /// Draws, renders and ends one giveaway.
    ///
    /// The message edit comes before the status change so a transient edit
    /// failure leaves the giveaway active for the next sweep. A message that
    /// is gone or can no longer be edited ends the giveaway without an
    /// announcement. If another caller ended the giveaway first, this call's
    /// draw is discarded and the stored result is rendered again over it.
    async fn end<R: Rng + ?Sized>(
        &self,
        giveaway: &Giveaway,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Option<Vec<UserId>>, AppError> {
        let eligible = draw::eligible_participants(self.directory, giveaway).await?;
        let winners = draw::pick_winners(&eligible, giveaway.winners_count, rng);

        let listing = Listing::from(giveaway);
        let message_editable = match self
            .actuator
            .edit_message(
                giveaway.channel_id,
                giveaway.message_id,
                &render::ended(&listing, &winners),
            )
            .await
        {
            Ok(()) => true,
            Err(e) if e.is_permanent() => {
                tracing::warn!(
                    "Giveaway {} message cannot be edited ({}); ending without an announcement",
                    giveaway.id,
                    e
                );
                false
            }
            Err(e) => return Err(e.into()),
        };

        if !GiveawayRepository::new(self.db)
            .mark_ended(giveaway.id, &winners, now)
            .await?
        {
            tracing::debug!("Giveaway {} was already ended", giveaway.id);
            if message_editable {
                self.restore_outcome(giveaway.id).await?;
            }
            return Ok(None);
        }

        if message_editable {
            if let Err(e) = self
                .actuator
                .send_message(
                    giveaway.channel_id,
                    &render::announcement(&giveaway.prize, &winners),
                )
                .await
            {
                tracing::warn!("Winner announcement for giveaway {} failed: {}", giveaway.id, e);
            }
        }

        tracing::info!(
            "Ended giveaway {} with {} winner(s) from {} entries",
            giveaway.id,
            winners.len(),
            giveaway.participants.len()
        );

        Ok(Some(winners))
    }

    /// Renders the stored outcome of a giveaway that another caller closed,
    /// replacing whatever this caller wrote to the message.
    async fn restore_outcome(&self, id: i32) -> Result<(), AppError> {
        let Some(stored) = GiveawayRepository::new(self.db).get_by_id(id).await? else {
            return Ok(());
        };

        let listing = Listing::from(&stored);
        let notice = match stored.status {
            GiveawayStatus::Ended => render::ended(&listing, &stored.winners),
            GiveawayStatus::Cancelled => render::cancelled(&listing),
            GiveawayStatus::Active => return Ok(()),
        };

        if let Err(e) = self
            .actuator
            .edit_message(stored.channel_id, stored.message_id, &notice)
            .await
        {
            tracing::warn!(
                "Could not restore the outcome of giveaway {} on its message: {}",
                stored.id,
                e
            );
        }

        Ok(())
    }
}

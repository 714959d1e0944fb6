//! Moderator activity points: credits, the inactivity penalty, and the
//! weekly rollover report.
//!
//! Points are floats so fractional per-message credit adds up. Every credit
//! also counts towards `weekly_total`, which the rollover compares with the
//! previous week to decide the improvement bonus.

use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use serenity::all::{GuildId, RoleId, UserId};

use crate::{
    actuator::{ChatActuator, DirectMessage, GuildDirectory},
    config::ModeratorConfig,
    data::{
        guild_settings::GuildSettingsRepository,
        moderator::{ModeratorEventRepository, ModeratorRepository},
        task_marker::TaskMarkerRepository,
    },
    error::{internal::InternalError, AppError},
    model::{
        guild_settings::{Feature, GuildSettings},
        moderator::{iso_week, totals_by_reason, week_start, ModeratorProfile, ReasonTotal},
        notice::Notice,
    },
    scheduler::shutdown::Shutdown,
    service::{isolate, xp::advance_voice_marker},
};

/// Role looked up by name when a guild has not configured a moderator role.
pub const DEFAULT_MODERATOR_ROLE_NAME: &str = "Moderator";

pub const VOICE_MARKER: &str = "moderator_voice";
pub const ROLLOVER_MARKER: &str = "moderator_weekly_rollover";

const MAX_WRITE_ATTEMPTS: u32 = 3;
const REPORT_COLOUR: u32 = 0x3498DB;
const REPORT_BREAKDOWN_LINES: usize = 5;

pub struct ModeratorService<'a> {
    db: &'a DatabaseConnection,
    actuator: &'a dyn ChatActuator,
    directory: &'a dyn GuildDirectory,
    config: &'a ModeratorConfig,
}

impl<'a> ModeratorService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        actuator: &'a dyn ChatActuator,
        directory: &'a dyn GuildDirectory,
        config: &'a ModeratorConfig,
    ) -> Self {
        Self {
            db,
            actuator,
            directory,
            config,
        }
    }

    /// The guild's moderator role, falling back to a role named "Moderator".
    pub fn moderator_role(&self, settings: &GuildSettings) -> Option<RoleId> {
        settings.moderator_role_id.or_else(|| {
            self.directory
                .role_by_name(settings.guild_id, DEFAULT_MODERATOR_ROLE_NAME)
        })
    }

    pub async fn is_moderator(
        &self,
        settings: &GuildSettings,
        user_id: UserId,
    ) -> Result<bool, AppError> {
        let Some(role_id) = self.moderator_role(settings) else {
            return Ok(false);
        };

        Ok(self
            .directory
            .member_roles(settings.guild_id, user_id)
            .await?
            .is_some_and(|roles| roles.contains(&role_id)))
    }

    /// Adds points to a moderator's profile and appends the event to their
    /// points log.
    ///
    /// Positive amounts count as activity: they raise `weekly_total` and move
    /// `last_point_at`. Negative amounts are adjustments and never take points
    /// below zero.
    ///
    /// # Returns
    /// - `Ok(ModeratorProfile)` - The profile after the write
    /// - `Err(AppError)` - Database error or repeated write conflicts
    pub async fn award(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        points: f64,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<ModeratorProfile, AppError> {
        let written = self
            .apply(guild_id, user_id, |profile| {
                let mut updated = profile.clone();
                updated.points = (profile.points + points).max(0.0);
                if points > 0.0 {
                    updated.weekly_total += points;
                    updated.last_point_at = Some(now);
                }
                Some(updated)
            })
            .await?;
        let Some((_, profile)) = written else {
            return Err(AppError::InternalError(format!(
                "points for moderator {} were not written",
                user_id
            )));
        };

        ModeratorEventRepository::new(self.db)
            .record(guild_id, user_id, points, reason, now)
            .await?;

        tracing::debug!(
            "Awarded {} points to moderator {} in guild {}: {}",
            points,
            user_id,
            guild_id,
            reason
        );

        Ok(profile)
    }

    /// Credits a moderator for a message, or for a poll when the message
    /// carries one.
    ///
    /// # Returns
    /// - `Ok(true)` - The author is a moderator and was credited
    /// - `Ok(false)` - The author is not a moderator
    pub async fn on_message(
        &self,
        settings: &GuildSettings,
        user_id: UserId,
        has_poll: bool,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        if !self.is_moderator(settings, user_id).await? {
            return Ok(false);
        }

        let (points, reason) = if has_poll {
            (self.config.poll_create_points, "Poll created")
        } else {
            (self.config.message_points, "Message")
        };
        self.award(settings.guild_id, user_id, points, reason, now)
            .await?;

        Ok(true)
    }

    /// Credits a moderator for voting in a poll.
    pub async fn on_poll_vote(
        &self,
        settings: &GuildSettings,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        if !self.is_moderator(settings, user_id).await? {
            return Ok(false);
        }

        self.award(
            settings.guild_id,
            user_id,
            self.config.poll_vote_points,
            "Poll vote",
            now,
        )
        .await?;

        Ok(true)
    }

    /// Credits moderators sitting in the guild's designated voice channels.
    pub async fn credit_voice(&self, now: DateTime<Utc>, shutdown: &Shutdown) -> Result<(), AppError> {
        let guilds = GuildSettingsRepository::new(self.db)
            .get_enabled(Feature::ModeratorPoints)
            .await?;

        for settings in guilds {
            if shutdown.is_requested() {
                break;
            }
            if settings.moderator_voice_channel_ids.is_empty() {
                continue;
            }

            let result = self.credit_voice_guild(&settings, now, shutdown).await;
            isolate(
                "moderator_voice",
                format_args!("guild {}", settings.guild_id),
                result,
            )?;
        }

        Ok(())
    }

    async fn credit_voice_guild(
        &self,
        settings: &GuildSettings,
        now: DateTime<Utc>,
        shutdown: &Shutdown,
    ) -> Result<(), AppError> {
        let Some(minutes) = advance_voice_marker(
            &TaskMarkerRepository::new(self.db),
            VOICE_MARKER,
            settings.guild_id,
            now,
            self.config.voice_catch_up_minutes,
        )
        .await?
        else {
            return Ok(());
        };

        let points = minutes as f64 * self.config.voice_points_per_minute;
        let present: Vec<UserId> = self
            .directory
            .voice_presence(settings.guild_id)
            .into_iter()
            .filter(|presence| {
                !presence.is_bot
                    && settings
                        .moderator_voice_channel_ids
                        .contains(&presence.channel_id)
            })
            .map(|presence| presence.user_id)
            .collect();

        for user_id in present {
            if shutdown.is_requested() {
                break;
            }

            let result: Result<(), AppError> = async {
                if self.is_moderator(settings, user_id).await? {
                    self.award(settings.guild_id, user_id, points, "Voice activity", now)
                        .await?;
                }
                Ok(())
            }
            .await;
            isolate("moderator_voice", format_args!("user {}", user_id), result)?;
        }

        Ok(())
    }

    /// Penalises moderators with no points in the rolling inactivity window.
    ///
    /// Profiles are created first for every current moderator so that someone
    /// who never earned a point is still penalised. At most one penalty
    /// applies per window.
    pub async fn enforce_inactivity(
        &self,
        now: DateTime<Utc>,
        shutdown: &Shutdown,
    ) -> Result<(), AppError> {
        let guilds = GuildSettingsRepository::new(self.db)
            .get_enabled(Feature::ModeratorPoints)
            .await?;

        for settings in guilds {
            if shutdown.is_requested() {
                break;
            }

            let Some(role_id) = self.moderator_role(&settings) else {
                tracing::debug!("Guild {} has no moderator role", settings.guild_id);
                continue;
            };

            let repo = ModeratorRepository::new(self.db);
            let moderators = self.directory.members_with_role(settings.guild_id, role_id);
            for user_id in &moderators {
                repo.get_or_create(settings.guild_id, *user_id).await?;
            }

            for profile in repo.get_by_guild(settings.guild_id).await? {
                if shutdown.is_requested() {
                    break;
                }
                if !moderators.contains(&profile.user_id) {
                    continue;
                }

                let result = self.penalize_if_idle(&profile, now).await;
                isolate(
                    "moderator_inactivity",
                    format_args!("moderator profile {}", profile.id),
                    result,
                )?;
            }
        }

        Ok(())
    }

    async fn penalize_if_idle(
        &self,
        profile: &ModeratorProfile,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let window_start = now - self.config.inactivity_window;
        let penalty = self.config.inactivity_penalty;

        let penalized = self
            .apply(profile.guild_id, profile.user_id, |current| {
                let active = current.last_point_at.is_some_and(|at| at > window_start);
                let already = current.last_penalty_at.is_some_and(|at| at > window_start);
                if active || already {
                    return None;
                }

                let mut updated = current.clone();
                updated.points = (current.points - penalty).max(0.0);
                updated.last_penalty_at = Some(now);
                Some(updated)
            })
            .await?;

        if let Some((_, updated)) = penalized {
            ModeratorEventRepository::new(self.db)
                .record(
                    updated.guild_id,
                    updated.user_id,
                    -penalty,
                    "Inactivity penalty",
                    now,
                )
                .await?;
            tracing::info!(
                "Applied inactivity penalty to moderator {} in guild {} ({} points left)",
                updated.user_id,
                updated.guild_id,
                updated.points
            );
        }

        Ok(())
    }

    /// Closes the week for every guild whose rollover marker is behind the
    /// current ISO week.
    ///
    /// The first run for a guild only records the current week. Afterwards,
    /// each profile not yet rolled into this week gets the improvement bonus
    /// if it beat the previous week, has its weekly total moved into
    /// `previous_weekly_total`, and receives a report DM. The guild marker is
    /// only advanced once every profile is done, and each profile records its
    /// own week, so re-running within a week changes nothing.
    pub async fn weekly_rollover(
        &self,
        now: DateTime<Utc>,
        shutdown: &Shutdown,
    ) -> Result<(), AppError> {
        let week = iso_week(now);
        let markers = TaskMarkerRepository::new(self.db);
        let guilds = GuildSettingsRepository::new(self.db)
            .get_enabled(Feature::ModeratorPoints)
            .await?;

        for settings in guilds {
            if shutdown.is_requested() {
                break;
            }

            let scope = settings.guild_id.to_string();
            match markers.get(ROLLOVER_MARKER, &scope).await? {
                Some(processed) if processed == week => continue,
                Some(_) => {}
                None => {
                    markers.set(ROLLOVER_MARKER, &scope, &week, now).await?;
                    continue;
                }
            }

            let mut complete = true;
            for profile in ModeratorRepository::new(self.db)
                .get_by_guild(settings.guild_id)
                .await?
            {
                if shutdown.is_requested() {
                    complete = false;
                    break;
                }

                let result = self.roll_over_profile(&profile, &week, now).await;
                if result.is_err() {
                    complete = false;
                }
                isolate(
                    "moderator_weekly_rollover",
                    format_args!("moderator profile {}", profile.id),
                    result,
                )?;
            }

            if complete {
                markers.set(ROLLOVER_MARKER, &scope, &week, now).await?;
                let pruned = ModeratorEventRepository::new(self.db)
                    .delete_before(settings.guild_id, now - self.config.event_retention)
                    .await?;
                tracing::info!(
                    "Closed moderator week for guild {} ({} old point events pruned)",
                    settings.guild_id,
                    pruned
                );
            }
        }

        Ok(())
    }

    async fn roll_over_profile(
        &self,
        profile: &ModeratorProfile,
        week: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let bonus = self.config.improvement_bonus;

        let closed_week_end = week_start(now);
        let events = ModeratorEventRepository::new(self.db)
            .find_between(
                profile.guild_id,
                profile.user_id,
                closed_week_end - Duration::weeks(1),
                closed_week_end,
            )
            .await?;

        let rolled = self
            .apply(profile.guild_id, profile.user_id, |current| {
                if current.last_rollover_week.as_deref() == Some(week) {
                    return None;
                }

                let mut updated = current.clone();
                if current.weekly_total > current.previous_weekly_total {
                    updated.points += bonus;
                }
                updated.previous_weekly_total = current.weekly_total;
                updated.weekly_total = 0.0;
                updated.last_rollover_week = Some(week.to_string());
                Some(updated)
            })
            .await?;

        let Some((before, after)) = rolled else {
            return Ok(());
        };

        let gained = after.points - before.points;
        if gained > 0.0 {
            ModeratorEventRepository::new(self.db)
                .record(after.guild_id, after.user_id, gained, "Improvement bonus", now)
                .await?;
        }

        let report = weekly_report(
            before.weekly_total,
            before.previous_weekly_total,
            gained,
            &totals_by_reason(&events),
        );
        match self
            .actuator
            .send_direct_message(after.user_id, &report)
            .await
        {
            Ok(DirectMessage::Delivered(_)) => {}
            Ok(DirectMessage::Undeliverable) => {
                tracing::info!("Weekly report for moderator {} not delivered", after.user_id)
            }
            Err(e) => tracing::warn!("Weekly report for moderator {} failed: {}", after.user_id, e),
        }

        Ok(())
    }

    /// Applies `change` to a moderator profile with compare-and-swap retries.
    ///
    /// `change` returns the desired profile state from the freshly read one,
    /// or `None` to leave it alone. On success returns the profile as read
    /// and as written.
    async fn apply<F>(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        change: F,
    ) -> Result<Option<(ModeratorProfile, ModeratorProfile)>, AppError>
    where
        F: Fn(&ModeratorProfile) -> Option<ModeratorProfile>,
    {
        let repo = ModeratorRepository::new(self.db);
        let mut profile_id = 0;

        for _ in 0..MAX_WRITE_ATTEMPTS {
            let current = repo.get_or_create(guild_id, user_id).await?;
            profile_id = current.id;

            let Some(updated) = change(&current) else {
                return Ok(None);
            };

            if repo.update(&updated).await? {
                let written = ModeratorProfile {
                    revision: updated.revision + 1,
                    ..updated
                };
                return Ok(Some((current, written)));
            }
        }

        Err(InternalError::WriteConflict {
            entity: "moderator_point_profile",
            id: profile_id,
            attempts: MAX_WRITE_ATTEMPTS,
        }
        .into())
    }
}

fn weekly_report(
    this_week: f64,
    previous_week: f64,
    bonus: f64,
    breakdown: &[ReasonTotal],
) -> Notice {
    let description = if this_week > 0.0 {
        format!(
            "Thank you for your hard work this week! You earned **{:.1} points**. \
             Keep up the great work, your efforts are greatly appreciated.",
            this_week
        )
    } else {
        format!(
            "This week your moderation score is **{:.1} points**. Don't worry about it! \
             We all have busy periods. If you are currently unable to moderate, please \
             let the team know in the moderator chat.",
            this_week
        )
    };

    let mut notice = Notice::new(description)
        .title("📊 Weekly Moderation Report")
        .colour(REPORT_COLOUR)
        .field("This week", format!("{:.1}", this_week))
        .field("Previous week", format!("{:.1}", previous_week));
    if bonus > 0.0 {
        notice = notice.field("Improvement bonus", format!("+{:.1}", bonus));
    }
    if !breakdown.is_empty() {
        let lines: Vec<String> = breakdown
            .iter()
            .take(REPORT_BREAKDOWN_LINES)
            .map(|total| {
                format!(
                    "**{}:** {:.1} points ({} times)",
                    total.reason, total.points, total.count
                )
            })
            .collect();
        notice = notice.field("Breakdown", lines.join("\n"));
    }

    notice
}

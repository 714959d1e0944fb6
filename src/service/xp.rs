//! Experience credits, decay, and level role reconciliation.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use serenity::all::{GuildId, UserId};

use crate::{
    actuator::{ChatActuator, GuildDirectory},
    config::XpConfig,
    data::{
        guild_settings::GuildSettingsRepository, task_marker::TaskMarkerRepository,
        xp::XpRepository,
    },
    error::{internal::InternalError, AppError},
    model::{guild_settings::Feature, xp::XpProfile},
    scheduler::shutdown::Shutdown,
    service::{
        isolate,
        level::{level_for, max_level},
        role_catalog::RoleCatalog,
        role_sync::RoleDiff,
    },
};

/// Marker holding the last time voice XP was credited for a guild.
pub const VOICE_MARKER: &str = "xp_voice";

const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Result of one successful profile write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpChange {
    pub xp: i64,
    pub previous_level: i32,
    pub level: i32,
    /// The write was the first one to a newly created profile.
    pub first_write: bool,
}

impl XpChange {
    pub fn needs_role_sync(&self) -> bool {
        self.first_write || self.level != self.previous_level
    }
}

pub struct XpService<'a> {
    db: &'a DatabaseConnection,
    actuator: &'a dyn ChatActuator,
    directory: &'a dyn GuildDirectory,
    config: &'a XpConfig,
}

impl<'a> XpService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        actuator: &'a dyn ChatActuator,
        directory: &'a dyn GuildDirectory,
        config: &'a XpConfig,
    ) -> Self {
        Self {
            db,
            actuator,
            directory,
            config,
        }
    }

    /// Credits message XP unless the member gained XP within the cooldown.
    ///
    /// # Returns
    /// - `Ok(Some(XpChange))` - XP was credited
    /// - `Ok(None)` - Inside the cooldown
    /// - `Err(AppError)` - Database error or repeated write conflicts
    pub async fn on_message(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<XpChange>, AppError> {
        let cooldown = self.config.message_cooldown;
        let amount = self.config.message_xp;

        let change = self
            .apply(guild_id, user_id, now, |profile| {
                (now - profile.last_gain_at >= cooldown).then(|| (profile.xp + amount, now))
            })
            .await?;

        if let Some(change) = change {
            if change.needs_role_sync() {
                if let Err(e) = self.reconcile_roles(guild_id, user_id).await {
                    tracing::warn!(
                        "Failed to sync level roles for user {} in guild {}: {}",
                        user_id,
                        guild_id,
                        e
                    );
                }
            }
        }

        Ok(change)
    }

    /// Credits voice XP in every guild with the XP feature enabled.
    ///
    /// Each guild keeps a marker of when voice XP was last credited. Members
    /// in voice now receive XP for the whole minutes since that marker, capped
    /// at the catch-up window so downtime is not paid out in full. The marker
    /// is advanced before crediting so an interrupted sweep never pays twice.
    pub async fn credit_voice(&self, now: DateTime<Utc>, shutdown: &Shutdown) -> Result<(), AppError> {
        let guilds = GuildSettingsRepository::new(self.db)
            .get_enabled(Feature::Xp)
            .await?;

        for settings in guilds {
            if shutdown.is_requested() {
                break;
            }

            let result = self.credit_voice_guild(settings.guild_id, now, shutdown).await;
            isolate("xp_voice", format_args!("guild {}", settings.guild_id), result)?;
        }

        Ok(())
    }

    async fn credit_voice_guild(
        &self,
        guild_id: GuildId,
        now: DateTime<Utc>,
        shutdown: &Shutdown,
    ) -> Result<(), AppError> {
        let Some(minutes) = advance_voice_marker(
            &TaskMarkerRepository::new(self.db),
            VOICE_MARKER,
            guild_id,
            now,
            self.config.voice_catch_up_minutes,
        )
        .await?
        else {
            return Ok(());
        };

        let amount = minutes * self.config.voice_xp_per_minute;
        let members: Vec<UserId> = self
            .directory
            .voice_presence(guild_id)
            .into_iter()
            .filter(|presence| !presence.is_bot)
            .map(|presence| presence.user_id)
            .collect();

        for user_id in members {
            if shutdown.is_requested() {
                break;
            }

            let result = self.credit_and_sync(guild_id, user_id, amount, now).await;
            isolate("xp_voice", format_args!("user {}", user_id), result)?;
        }

        Ok(())
    }

    async fn credit_and_sync(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let change = self
            .apply(guild_id, user_id, now, |profile| Some((profile.xp + amount, now)))
            .await?;

        if change.is_some_and(|change| change.needs_role_sync()) {
            self.reconcile_roles(guild_id, user_id).await?;
        }

        Ok(())
    }

    /// Removes `decay_amount` XP from every profile idle past the inactivity
    /// threshold. Decay never moves `last_gain_at`.
    pub async fn decay(&self, now: DateTime<Utc>, shutdown: &Shutdown) -> Result<(), AppError> {
        let enabled: HashSet<GuildId> = GuildSettingsRepository::new(self.db)
            .get_enabled(Feature::Xp)
            .await?
            .into_iter()
            .map(|settings| settings.guild_id)
            .collect();

        let cutoff = now - self.config.inactivity_threshold;
        let inactive = XpRepository::new(self.db).find_inactive(cutoff).await?;

        for profile in inactive {
            if shutdown.is_requested() {
                break;
            }
            if !enabled.contains(&profile.guild_id) {
                continue;
            }

            let result = self.decay_one(&profile, cutoff, now).await;
            isolate("xp_decay", format_args!("xp profile {}", profile.id), result)?;
        }

        Ok(())
    }

    async fn decay_one(
        &self,
        profile: &XpProfile,
        cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let amount = self.config.decay_amount;

        let change = self
            .apply(profile.guild_id, profile.user_id, now, |current| {
                // Re-checked against the fresh read; a gain since the query wins
                (current.last_gain_at < cutoff && current.xp > 0)
                    .then(|| (current.xp - amount, current.last_gain_at))
            })
            .await?;

        if let Some(change) = change {
            tracing::debug!(
                "Decayed user {} in guild {} to {} XP",
                profile.user_id,
                profile.guild_id,
                change.xp
            );
            if change.level != change.previous_level {
                self.reconcile_roles(profile.guild_id, profile.user_id).await?;
            }
        }

        Ok(())
    }

    /// Brings a member's level roles in line with their stored level.
    ///
    /// The level is re-read here rather than passed in so that concurrent
    /// credits can never leave a stale role behind.
    pub async fn reconcile_roles(&self, guild_id: GuildId, user_id: UserId) -> Result<(), AppError> {
        let Some(profile) = XpRepository::new(self.db).get(guild_id, user_id).await? else {
            return Ok(());
        };
        let Some(current) = self.directory.member_roles(guild_id, user_id).await? else {
            tracing::debug!("User {} left guild {}; skipping level roles", user_id, guild_id);
            return Ok(());
        };

        let catalog = RoleCatalog::new(self.actuator, self.directory);
        let desired = catalog.ensure_level(guild_id, profile.level).await?;
        let mut managed =
            catalog.level_roles(guild_id, max_level(&self.config.level_thresholds));
        if !managed.contains(&desired) {
            managed.push(desired);
        }

        let diff = RoleDiff::between(&current, &managed, &[desired]);
        if diff.is_empty() {
            return Ok(());
        }

        diff.apply(
            self.actuator,
            guild_id,
            user_id,
            &format!("Experience level {}", profile.level),
        )
        .await?;

        tracing::info!(
            "Synced level {} roles for user {} in guild {}",
            profile.level,
            user_id,
            guild_id
        );

        Ok(())
    }

    /// Applies `change` to the member's profile with compare-and-swap retries.
    ///
    /// `change` maps the freshly read profile to the new XP and `last_gain_at`,
    /// or `None` to leave it alone. XP is floored at zero and the level is
    /// always recomputed from the new total.
    async fn apply<F>(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        now: DateTime<Utc>,
        change: F,
    ) -> Result<Option<XpChange>, AppError>
    where
        F: Fn(&XpProfile) -> Option<(i64, DateTime<Utc>)>,
    {
        let repo = XpRepository::new(self.db);
        let mut profile_id = 0;

        for _ in 0..MAX_WRITE_ATTEMPTS {
            let profile = repo.get_or_create(guild_id, user_id, now).await?;
            profile_id = profile.id;

            let Some((xp, last_gain_at)) = change(&profile) else {
                return Ok(None);
            };
            let xp = xp.max(0);
            let level = level_for(xp, &self.config.level_thresholds);

            if repo.update(&profile, xp, level, last_gain_at).await? {
                return Ok(Some(XpChange {
                    xp,
                    previous_level: profile.level,
                    level,
                    first_write: profile.revision == 0,
                }));
            }
        }

        Err(InternalError::WriteConflict {
            entity: "xp_profile",
            id: profile_id,
            attempts: MAX_WRITE_ATTEMPTS,
        }
        .into())
    }
}

/// Moves a per-guild voice marker forward and returns the whole minutes to credit.
///
/// The first call for a guild only starts the clock. Credit is capped at
/// `catch_up_minutes`; when capped the marker jumps to `now`, otherwise it
/// advances by exactly the credited minutes so partial minutes carry over.
pub(crate) async fn advance_voice_marker(
    markers: &TaskMarkerRepository<'_>,
    name: &str,
    guild_id: GuildId,
    now: DateTime<Utc>,
    catch_up_minutes: i64,
) -> Result<Option<i64>, AppError> {
    let scope = guild_id.to_string();

    let Some(last) = markers.get_timestamp(name, &scope).await? else {
        markers.set_timestamp(name, &scope, now).await?;
        return Ok(None);
    };

    let elapsed = (now - last).num_minutes();
    if elapsed <= 0 {
        return Ok(None);
    }

    let (minutes, next) = if elapsed > catch_up_minutes {
        (catch_up_minutes, now)
    } else {
        (elapsed, last + Duration::minutes(elapsed))
    };
    markers.set_timestamp(name, &scope, next).await?;

    Ok(Some(minutes).filter(|minutes| *minutes > 0))
}

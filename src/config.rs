//! Environment configuration.
//!
//! Connection settings are required; policy constants have defaults and can be
//! overridden individually through environment variables.

use std::{str::FromStr, time::Duration as StdDuration};

use chrono::Duration;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_RANK_API_BASE_URL: &str = "https://thefinals.fortunevale.de/api";
const DEFAULT_RANK_SEASON: &str = "s6";

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    pub rank_api_base_url: String,
    pub rank_season: String,

    /// Stream polling is disabled when no Twitch credentials are configured.
    pub twitch: Option<TwitchCredentials>,

    pub policy: PolicyConfig,
    pub intervals: TaskIntervals,
}

#[derive(Clone)]
pub struct TwitchCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let twitch = match (
            std::env::var("TWITCH_CLIENT_ID").ok(),
            std::env::var("TWITCH_CLIENT_SECRET").ok(),
        ) {
            (Some(client_id), Some(client_secret)) => Some(TwitchCredentials {
                client_id,
                client_secret,
            }),
            (Some(_), None) => {
                return Err(ConfigError::MissingEnvVar("TWITCH_CLIENT_SECRET".to_string()).into())
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingEnvVar("TWITCH_CLIENT_ID".to_string()).into())
            }
            (None, None) => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            rank_api_base_url: std::env::var("RANK_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_RANK_API_BASE_URL.to_string()),
            rank_season: std::env::var("RANK_SEASON")
                .unwrap_or_else(|_| DEFAULT_RANK_SEASON.to_string()),
            twitch,
            policy: PolicyConfig::from_env()?,
            intervals: TaskIntervals::from_env()?,
        })
    }
}

/// Tunables for every reconciliation policy.
#[derive(Debug, Clone, Default)]
pub struct PolicyConfig {
    pub xp: XpConfig,
    pub moderator: ModeratorConfig,
    pub warning: WarningConfig,
    pub giveaway: GiveawayConfig,
}

impl PolicyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            xp: XpConfig::from_env()?,
            moderator: ModeratorConfig::from_env()?,
            warning: WarningConfig::from_env()?,
            giveaway: GiveawayConfig::default(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct XpConfig {
    /// XP granted per message outside the cooldown.
    pub message_xp: i64,
    /// Minimum gap between two message grants for the same member.
    pub message_cooldown: Duration,
    /// XP granted per whole minute in a non-AFK voice channel.
    pub voice_xp_per_minute: i64,
    /// Most minutes a single voice sweep will credit after downtime.
    pub voice_catch_up_minutes: i64,
    /// XP removed from an inactive profile per decay sweep.
    pub decay_amount: i64,
    /// How long since the last gain before a profile decays.
    pub inactivity_threshold: Duration,
    /// Ascending XP required for each level, starting at level 1.
    pub level_thresholds: Vec<i64>,
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            message_xp: 1,
            message_cooldown: Duration::seconds(60),
            voice_xp_per_minute: 1,
            voice_catch_up_minutes: 10,
            decay_amount: 25,
            inactivity_threshold: Duration::hours(5),
            level_thresholds: vec![0, 100, 250, 500, 1000, 2000, 3500, 5500, 8000, 12000],
        }
    }
}

impl XpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            message_xp: optional("XP_PER_MESSAGE", defaults.message_xp)?,
            message_cooldown: Duration::seconds(optional(
                "XP_MESSAGE_COOLDOWN_SECS",
                defaults.message_cooldown.num_seconds(),
            )?),
            voice_xp_per_minute: optional("XP_PER_VOICE_MINUTE", defaults.voice_xp_per_minute)?,
            decay_amount: optional("XP_DECAY_AMOUNT", defaults.decay_amount)?,
            inactivity_threshold: Duration::hours(optional(
                "XP_DECAY_HOURS",
                defaults.inactivity_threshold.num_hours(),
            )?),
            ..defaults
        })
    }
}

#[derive(Debug, Clone)]
pub struct ModeratorConfig {
    pub voice_points_per_minute: f64,
    pub voice_catch_up_minutes: i64,
    pub message_points: f64,
    pub poll_create_points: f64,
    pub poll_vote_points: f64,
    /// Rolling window a moderator must earn points in to avoid the penalty.
    pub inactivity_window: Duration,
    pub inactivity_penalty: f64,
    /// Granted at rollover when the week beat the previous one.
    pub improvement_bonus: f64,
    /// How long point events are kept for weekly breakdowns.
    pub event_retention: Duration,
}

impl Default for ModeratorConfig {
    fn default() -> Self {
        Self {
            voice_points_per_minute: 10.0,
            voice_catch_up_minutes: 10,
            message_points: 0.5,
            poll_create_points: 15.0,
            poll_vote_points: 5.0,
            inactivity_window: Duration::hours(24),
            inactivity_penalty: 25.0,
            improvement_bonus: 5.0,
            event_retention: Duration::days(30),
        }
    }
}

impl ModeratorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            voice_points_per_minute: optional(
                "MOD_POINTS_PER_VOICE_MINUTE",
                defaults.voice_points_per_minute,
            )?,
            inactivity_penalty: optional("MOD_INACTIVITY_PENALTY", defaults.inactivity_penalty)?,
            improvement_bonus: optional("MOD_IMPROVEMENT_BONUS", defaults.improvement_bonus)?,
            ..defaults
        })
    }
}

#[derive(Debug, Clone)]
pub struct WarningConfig {
    /// How long a warned member has to acknowledge before being timed out.
    pub ack_deadline: Duration,
    /// Length of the communication timeout. Discord caps this at 28 days.
    pub timeout_duration: Duration,
    pub ack_emoji: String,
}

impl Default for WarningConfig {
    fn default() -> Self {
        Self {
            ack_deadline: Duration::hours(24),
            timeout_duration: Duration::days(28),
            ack_emoji: "👍".to_string(),
        }
    }
}

impl WarningConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            ack_deadline: Duration::hours(optional(
                "WARNING_ACK_HOURS",
                defaults.ack_deadline.num_hours(),
            )?),
            ..defaults
        })
    }
}

#[derive(Debug, Clone)]
pub struct GiveawayConfig {
    pub entry_emoji: String,
}

impl Default for GiveawayConfig {
    fn default() -> Self {
        Self {
            entry_emoji: "🎉".to_string(),
        }
    }
}

/// How often each scheduled task runs.
#[derive(Debug, Clone)]
pub struct TaskIntervals {
    pub ban_expiry: StdDuration,
    pub warning_reminder: StdDuration,
    pub xp_voice: StdDuration,
    pub xp_decay: StdDuration,
    pub moderator_voice: StdDuration,
    pub moderator_inactivity: StdDuration,
    pub moderator_weekly_rollover: StdDuration,
    pub rank_sync: StdDuration,
    pub giveaway_end: StdDuration,
    pub giveaway_countdown: StdDuration,
    pub stream_poll: StdDuration,
}

impl Default for TaskIntervals {
    fn default() -> Self {
        Self {
            ban_expiry: StdDuration::from_secs(10 * 60),
            warning_reminder: StdDuration::from_secs(10 * 60),
            xp_voice: StdDuration::from_secs(60),
            xp_decay: StdDuration::from_secs(5 * 60 * 60),
            moderator_voice: StdDuration::from_secs(60),
            moderator_inactivity: StdDuration::from_secs(60 * 60),
            moderator_weekly_rollover: StdDuration::from_secs(5 * 60),
            rank_sync: StdDuration::from_secs(30 * 60),
            giveaway_end: StdDuration::from_secs(30),
            giveaway_countdown: StdDuration::from_secs(15),
            stream_poll: StdDuration::from_secs(5 * 60),
        }
    }
}

impl TaskIntervals {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let secs = |name: &str, default: StdDuration| -> Result<StdDuration, ConfigError> {
            optional(name, default.as_secs()).map(StdDuration::from_secs)
        };

        Ok(Self {
            ban_expiry: secs("BAN_EXPIRY_INTERVAL_SECS", defaults.ban_expiry)?,
            warning_reminder: secs("WARNING_REMINDER_INTERVAL_SECS", defaults.warning_reminder)?,
            rank_sync: secs("RANK_SYNC_INTERVAL_SECS", defaults.rank_sync)?,
            stream_poll: secs("STREAM_POLL_INTERVAL_SECS", defaults.stream_poll)?,
            ..defaults
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

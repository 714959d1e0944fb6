//! Domain models for the moderator point economy.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serenity::all::{GuildId, UserId};

use crate::{error::AppError, util::parse::parse_snowflake};

/// A moderator's point balance and weekly activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeratorProfile {
    pub id: i32,
    pub guild_id: GuildId,
    pub user_id: UserId,
    /// Never negative.
    pub points: f64,
    /// Last time points were credited.
    pub last_point_at: Option<DateTime<Utc>>,
    pub last_penalty_at: Option<DateTime<Utc>>,
    /// Net points earned since the last rollover.
    pub weekly_total: f64,
    pub previous_weekly_total: f64,
    /// ISO week this profile was last rolled over in.
    pub last_rollover_week: Option<String>,
    pub revision: i32,
}

impl ModeratorProfile {
    pub fn from_entity(entity: entity::moderator_point_profile::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            guild_id: parse_snowflake(&entity.guild_id)?,
            user_id: parse_snowflake(&entity.user_id)?,
            points: entity.points,
            last_point_at: entity.last_point_at,
            last_penalty_at: entity.last_penalty_at,
            weekly_total: entity.weekly_total,
            previous_weekly_total: entity.previous_weekly_total,
            last_rollover_week: entity.last_rollover_week,
            revision: entity.revision,
        })
    }
}

/// One credit, adjustment or penalty applied to a moderator, kept for the
/// weekly breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeratorPointEvent {
    pub id: i32,
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub points: f64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl ModeratorPointEvent {
    pub fn from_entity(entity: entity::moderator_point_event::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            guild_id: parse_snowflake(&entity.guild_id)?,
            user_id: parse_snowflake(&entity.user_id)?,
            points: entity.points,
            reason: entity.reason,
            created_at: entity.created_at,
        })
    }
}

/// Points and event count for one reason.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasonTotal {
    pub reason: String,
    pub points: f64,
    pub count: usize,
}

/// Groups events by reason, largest point total first.
pub fn totals_by_reason(events: &[ModeratorPointEvent]) -> Vec<ReasonTotal> {
    let mut totals: Vec<ReasonTotal> = Vec::new();
    for event in events {
        match totals.iter_mut().find(|total| total.reason == event.reason) {
            Some(total) => {
                total.points += event.points;
                total.count += 1;
            }
            None => totals.push(ReasonTotal {
                reason: event.reason.clone(),
                points: event.points,
                count: 1,
            }),
        }
    }

    totals.sort_by(|a, b| b.points.total_cmp(&a.points));
    totals
}

/// Start of the ISO week containing `now`, Monday 00:00 UTC.
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let monday = now.date_naive() - Duration::days(i64::from(now.weekday().num_days_from_monday()));
    monday.and_time(NaiveTime::MIN).and_utc()
}

/// Formats the ISO week containing `now`, e.g. `2026-W42`.
pub fn iso_week(now: DateTime<Utc>) -> String {
    let week = now.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

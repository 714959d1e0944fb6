//! Giveaway message content.

use chrono::{DateTime, Duration, Utc};
use serenity::all::{RoleId, UserId};

use crate::model::{
    giveaway::{Giveaway, StartGiveawayParams},
    notice::Notice,
};

const RUNNING_COLOUR: u32 = 0x00FF00;
const ENDED_COLOUR: u32 = 0xFF0000;

/// The parts of a giveaway shown on its message.
pub struct Listing<'a> {
    pub prize: &'a str,
    pub host_id: UserId,
    pub winners_count: u32,
    pub required_role_id: Option<RoleId>,
    pub ends_at: DateTime<Utc>,
}

impl<'a> From<&'a Giveaway> for Listing<'a> {
    fn from(giveaway: &'a Giveaway) -> Self {
        Self {
            prize: &giveaway.prize,
            host_id: giveaway.host_id,
            winners_count: giveaway.winners_count,
            required_role_id: giveaway.required_role_id,
            ends_at: giveaway.ends_at,
        }
    }
}

impl<'a> From<&'a StartGiveawayParams> for Listing<'a> {
    fn from(params: &'a StartGiveawayParams) -> Self {
        Self {
            prize: &params.prize,
            host_id: params.host_id,
            winners_count: params.winners_count,
            required_role_id: params.required_role_id,
            ends_at: params.ends_at,
        }
    }
}

pub fn running(listing: &Listing<'_>, entries: usize, emoji: &str, now: DateTime<Utc>) -> Notice {
    let mut notice = Notice::new(format!(
        "**{}**\n\nReact with {} to enter!\nTime remaining: **{}**",
        listing.prize,
        emoji,
        format_remaining(listing.ends_at - now)
    ))
    .title("🎉 GIVEAWAY 🎉")
    .colour(RUNNING_COLOUR)
    .field("Hosted by", format!("<@{}>", listing.host_id))
    .field("Winners", listing.winners_count.to_string())
    .field("Entries", entries.to_string());

    if let Some(role_id) = listing.required_role_id {
        notice = notice.field("Required role", format!("<@&{}>", role_id));
    }

    notice.footer(format!("Ends at • {}", listing.ends_at.format("%Y-%m-%d %H:%M:%S UTC")))
}

pub fn ended(listing: &Listing<'_>, winners: &[UserId]) -> Notice {
    let outcome = if winners.is_empty() {
        "No valid entries found for the giveaway.".to_string()
    } else {
        format!("Winner(s): {}", mentions(winners))
    };

    Notice::new(format!("**{}**\n\n{}", listing.prize, outcome))
        .title("🎉 GIVEAWAY ENDED 🎉")
        .colour(ENDED_COLOUR)
        .field("Hosted by", format!("<@{}>", listing.host_id))
        .footer(format!("Ended at • {}", listing.ends_at.format("%Y-%m-%d %H:%M:%S UTC")))
}

pub fn cancelled(listing: &Listing<'_>) -> Notice {
    Notice::new(format!(
        "**{}**\n\nThis giveaway has been cancelled.",
        listing.prize
    ))
    .title("🚫 GIVEAWAY CANCELLED 🚫")
    .colour(ENDED_COLOUR)
}

pub fn announcement(prize: &str, winners: &[UserId]) -> Notice {
    if winners.is_empty() {
        return Notice::new(format!(
            "No winner was determined for the giveaway: **{}**",
            prize
        ));
    }

    Notice::new(format!(
        "🎉 Congratulations {}! You won **{}**!",
        mentions(winners),
        prize
    ))
}

pub fn reroll_announcement(prize: &str, winners: &[UserId]) -> Notice {
    if winners.is_empty() {
        return Notice::new(format!("No eligible entries left to reroll **{}**.", prize));
    }

    Notice::new(format!(
        "🎉 The new winner(s): {}! Congratulations, you won **{}**!",
        mentions(winners),
        prize
    ))
}

fn mentions(users: &[UserId]) -> String {
    users
        .iter()
        .map(|user_id| format!("<@{}>", user_id))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a countdown like `1d 2h 3m 4s`, dropping leading zero units.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let (days, rest) = (total / 86_400, total % 86_400);
    let (hours, rest) = (rest / 3_600, rest % 3_600);
    let (minutes, seconds) = (rest / 60, rest % 60);

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{}d ", days));
    }
    if days > 0 || hours > 0 {
        out.push_str(&format!("{}h ", hours));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m ", minutes));
    }
    out.push_str(&format!("{}s", seconds));

    out
}

//! Discord gateway integration.
//!
//! Gateway events feed the event-driven side of the policies: message credit
//! and ban enforcement, giveaway entries, warning acknowledgments and poll
//! votes. Each handler opens the services it needs with an actuator built
//! from the event's context.
//!
//! # Gateway Intents
//!
//! - `GUILDS` and `GUILD_MEMBERS` (privileged) for the role and member cache
//! - `GUILD_MESSAGES` and `MESSAGE_CONTENT` for message hooks
//! - `GUILD_VOICE_STATES` for voice credit
//! - `GUILD_MESSAGE_REACTIONS` for giveaway entries
//! - `DIRECT_MESSAGE_REACTIONS` for warning acknowledgments
//! - `GUILD_MESSAGE_POLLS` for poll votes

pub mod handler;
pub mod start;

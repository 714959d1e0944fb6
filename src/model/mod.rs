//! Domain models.
//!
//! Records are converted from their SeaORM entities at the repository boundary,
//! parsing stored snowflakes into typed Discord IDs. A row that fails to parse
//! surfaces as a permanent error for that row only.

pub mod ban;
pub mod giveaway;
pub mod guild_settings;
pub mod moderator;
pub mod notice;
pub mod rank;
pub mod role;
pub mod stream;
pub mod warning;
pub mod xp;

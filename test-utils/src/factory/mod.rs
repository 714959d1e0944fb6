//! Factory methods for creating test data.
//!
//! Each record kind has its own factory module with both a `Factory` struct for
//! customization and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let settings = factory::create_guild_settings(&db).await?;
//! let ban = factory::ban_record::BanRecordFactory::new(&db, &settings.guild_id)
//!     .expires_at(Some(Utc::now() - Duration::minutes(1)))
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `guild_settings` - Per-guild feature switches and channel/role configuration
//! - `ban_record` - Temporary and permanent bans
//! - `warning_record` - Warnings awaiting acknowledgment
//! - `giveaway` - Active and ended giveaways
//! - `xp_profile` - Member XP profiles
//! - `moderator_point_profile` - Moderator point ledgers
//! - `rank_link` - Member to game handle links
//! - `stream_link` - Member to stream channel links
//! - `helpers` - ID generation shared by all factories

pub mod ban_record;
pub mod giveaway;
pub mod guild_settings;
pub mod helpers;
pub mod moderator_point_profile;
pub mod rank_link;
pub mod stream_link;
pub mod warning_record;
pub mod xp_profile;

pub use ban_record::create_ban_record;
pub use giveaway::create_giveaway;
pub use guild_settings::create_guild_settings;
pub use helpers::{next_id, next_snowflake};
pub use moderator_point_profile::create_moderator_point_profile;
pub use rank_link::create_rank_link;
pub use stream_link::create_stream_link;
pub use warning_record::create_warning_record;
pub use xp_profile::create_xp_profile;

//! SeaORM entity definitions for every persisted record kind.

pub mod prelude;

pub mod ban_record;
pub mod giveaway;
pub mod guild_settings;
pub mod moderator_point_event;
pub mod moderator_point_profile;
pub mod rank_link;
pub mod stream_link;
pub mod task_marker;
pub mod warning_record;
pub mod xp_profile;

pub use super::ban_record::Entity as BanRecord;
pub use super::giveaway::Entity as Giveaway;
pub use super::guild_settings::Entity as GuildSettings;
pub use super::moderator_point_event::Entity as ModeratorPointEvent;
pub use super::moderator_point_profile::Entity as ModeratorPointProfile;
pub use super::rank_link::Entity as RankLink;
pub use super::stream_link::Entity as StreamLink;
pub use super::task_marker::Entity as TaskMarker;
pub use super::warning_record::Entity as WarningRecord;
pub use super::xp_profile::Entity as XpProfile;

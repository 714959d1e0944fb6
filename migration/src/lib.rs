pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_guild_settings_table;
mod m20261001_000002_create_ban_record_table;
mod m20261001_000003_create_warning_record_table;
mod m20261001_000004_create_giveaway_table;
mod m20261001_000005_create_xp_profile_table;
mod m20261001_000006_create_moderator_point_profile_table;
mod m20261001_000007_create_rank_link_table;
mod m20261001_000008_create_stream_link_table;
mod m20261001_000009_create_task_marker_table;
mod m20261001_000010_create_moderator_point_event_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_guild_settings_table::Migration),
            Box::new(m20261001_000002_create_ban_record_table::Migration),
            Box::new(m20261001_000003_create_warning_record_table::Migration),
            Box::new(m20261001_000004_create_giveaway_table::Migration),
            Box::new(m20261001_000005_create_xp_profile_table::Migration),
            Box::new(m20261001_000006_create_moderator_point_profile_table::Migration),
            Box::new(m20261001_000007_create_rank_link_table::Migration),
            Box::new(m20261001_000008_create_stream_link_table::Migration),
            Box::new(m20261001_000009_create_task_marker_table::Migration),
            Box::new(m20261001_000010_create_moderator_point_event_table::Migration),
        ]
    }
}

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModeratorPointProfile::Table)
                    .if_not_exists()
                    .col(pk_auto(ModeratorPointProfile::Id))
                    .col(string(ModeratorPointProfile::GuildId))
                    .col(string(ModeratorPointProfile::UserId))
                    .col(double(ModeratorPointProfile::Points).default(0.0))
                    .col(timestamp_null(ModeratorPointProfile::LastPointAt))
                    .col(timestamp_null(ModeratorPointProfile::LastPenaltyAt))
                    .col(double(ModeratorPointProfile::WeeklyTotal).default(0.0))
                    .col(double(ModeratorPointProfile::PreviousWeeklyTotal).default(0.0))
                    .col(string_null(ModeratorPointProfile::LastRolloverWeek))
                    .col(integer(ModeratorPointProfile::Revision).default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_moderator_point_profile_guild_user")
                    .table(ModeratorPointProfile::Table)
                    .col(ModeratorPointProfile::GuildId)
                    .col(ModeratorPointProfile::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_moderator_point_profile_guild_user")
                    .table(ModeratorPointProfile::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ModeratorPointProfile::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ModeratorPointProfile {
    Table,
    Id,
    GuildId,
    UserId,
    Points,
    LastPointAt,
    LastPenaltyAt,
    WeeklyTotal,
    PreviousWeeklyTotal,
    LastRolloverWeek,
    Revision,
}

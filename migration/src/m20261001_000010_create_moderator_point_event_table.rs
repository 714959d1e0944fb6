use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModeratorPointEvent::Table)
                    .if_not_exists()
                    .col(pk_auto(ModeratorPointEvent::Id))
                    .col(string(ModeratorPointEvent::GuildId))
                    .col(string(ModeratorPointEvent::UserId))
                    .col(double(ModeratorPointEvent::Points))
                    .col(string(ModeratorPointEvent::Reason))
                    .col(timestamp(ModeratorPointEvent::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Weekly breakdowns read one moderator's events over a time range
        manager
            .create_index(
                Index::create()
                    .name("idx_moderator_point_event_guild_user_created")
                    .table(ModeratorPointEvent::Table)
                    .col(ModeratorPointEvent::GuildId)
                    .col(ModeratorPointEvent::UserId)
                    .col(ModeratorPointEvent::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_moderator_point_event_guild_user_created")
                    .table(ModeratorPointEvent::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ModeratorPointEvent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ModeratorPointEvent {
    Table,
    Id,
    GuildId,
    UserId,
    Points,
    Reason,
    CreatedAt,
}

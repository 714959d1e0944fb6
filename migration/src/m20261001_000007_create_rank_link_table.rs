use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RankLink::Table)
                    .if_not_exists()
                    .col(pk_auto(RankLink::Id))
                    .col(string(RankLink::GuildId))
                    .col(string(RankLink::UserId))
                    .col(string(RankLink::Handle))
                    .col(string_null(RankLink::LastSyncedRank))
                    .col(timestamp_null(RankLink::LastSyncedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rank_link_guild_user")
                    .table(RankLink::Table)
                    .col(RankLink::GuildId)
                    .col(RankLink::UserId)
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
                    .name("idx_rank_link_guild_user")
                    .table(RankLink::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(RankLink::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RankLink {
    Table,
    Id,
    GuildId,
    UserId,
    Handle,
    LastSyncedRank,
    LastSyncedAt,
}

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StreamLink::Table)
                    .if_not_exists()
                    .col(pk_auto(StreamLink::Id))
                    .col(string(StreamLink::GuildId))
                    .col(string(StreamLink::UserId))
                    .col(string(StreamLink::TwitchHandle))
                    .col(boolean(StreamLink::Live).default(false))
                    .col(boolean(StreamLink::RoleApplied).default(false))
                    .col(timestamp(StreamLink::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stream_link_guild_user")
                    .table(StreamLink::Table)
                    .col(StreamLink::GuildId)
                    .col(StreamLink::UserId)
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
                    .name("idx_stream_link_guild_user")
                    .table(StreamLink::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(StreamLink::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StreamLink {
    Table,
    Id,
    GuildId,
    UserId,
    TwitchHandle,
    Live,
    RoleApplied,
    UpdatedAt,
}

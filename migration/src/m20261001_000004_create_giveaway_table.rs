use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Giveaway::Table)
                    .if_not_exists()
                    .col(pk_auto(Giveaway::Id))
                    .col(string(Giveaway::GuildId))
                    .col(string(Giveaway::ChannelId))
                    .col(string_uniq(Giveaway::MessageId))
                    .col(string(Giveaway::HostId))
                    .col(text(Giveaway::Prize))
                    .col(integer(Giveaway::WinnersCount))
                    .col(string_null(Giveaway::RequiredRoleId))
                    .col(timestamp(Giveaway::EndsAt))
                    .col(string(Giveaway::Status))
                    .col(text(Giveaway::Participants).default("[]"))
                    .col(text(Giveaway::Winners).default("[]"))
                    .col(timestamp_null(Giveaway::EndedAt))
                    .col(integer(Giveaway::Revision).default(0))
                    .col(
                        timestamp(Giveaway::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_giveaway_status_ends_at")
                    .table(Giveaway::Table)
                    .col(Giveaway::Status)
                    .col(Giveaway::EndsAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_giveaway_status_ends_at")
                    .table(Giveaway::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Giveaway::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Giveaway {
    Table,
    Id,
    GuildId,
    ChannelId,
    MessageId,
    HostId,
    Prize,
    WinnersCount,
    RequiredRoleId,
    EndsAt,
    Status,
    Participants,
    Winners,
    EndedAt,
    Revision,
    CreatedAt,
}

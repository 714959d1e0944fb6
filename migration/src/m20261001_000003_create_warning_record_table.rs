use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WarningRecord::Table)
                    .if_not_exists()
                    .col(pk_auto(WarningRecord::Id))
                    .col(string(WarningRecord::GuildId))
                    .col(string(WarningRecord::UserId))
                    .col(string(WarningRecord::ModeratorId))
                    .col(integer(WarningRecord::Sequence))
                    .col(text(WarningRecord::Reason))
                    .col(timestamp(WarningRecord::CreatedAt))
                    .col(boolean(WarningRecord::Acknowledged).default(false))
                    .col(timestamp_null(WarningRecord::AcknowledgedAt))
                    .col(string_null(WarningRecord::DmMessageId))
                    .col(boolean(WarningRecord::TimeoutApplied).default(false))
                    .col(boolean(WarningRecord::TimeoutAttempted).default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_warning_record_guild_user_sequence")
                    .table(WarningRecord::Table)
                    .col(WarningRecord::GuildId)
                    .col(WarningRecord::UserId)
                    .col(WarningRecord::Sequence)
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
                    .name("idx_warning_record_guild_user_sequence")
                    .table(WarningRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(WarningRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WarningRecord {
    Table,
    Id,
    GuildId,
    UserId,
    ModeratorId,
    Sequence,
    Reason,
    CreatedAt,
    Acknowledged,
    AcknowledgedAt,
    DmMessageId,
    TimeoutApplied,
    TimeoutAttempted,
}

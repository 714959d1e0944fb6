use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BanRecord::Table)
                    .if_not_exists()
                    .col(pk_auto(BanRecord::Id))
                    .col(string(BanRecord::GuildId))
                    .col(string(BanRecord::UserId))
                    .col(string(BanRecord::ModeratorId))
                    .col(text(BanRecord::Reason))
                    .col(timestamp(BanRecord::CreatedAt))
                    .col(timestamp_null(BanRecord::ExpiresAt))
                    .col(boolean(BanRecord::Active))
                    .col(timestamp_null(BanRecord::LiftedAt))
                    .col(string_null(BanRecord::LiftReason))
                    .to_owned(),
            )
            .await?;

        // Expiry sweep filters on active + expires_at
        manager
            .create_index(
                Index::create()
                    .name("idx_ban_record_active_expires_at")
                    .table(BanRecord::Table)
                    .col(BanRecord::Active)
                    .col(BanRecord::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ban_record_guild_user")
                    .table(BanRecord::Table)
                    .col(BanRecord::GuildId)
                    .col(BanRecord::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_ban_record_guild_user")
                    .table(BanRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_ban_record_active_expires_at")
                    .table(BanRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(BanRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BanRecord {
    Table,
    Id,
    GuildId,
    UserId,
    ModeratorId,
    Reason,
    CreatedAt,
    ExpiresAt,
    Active,
    LiftedAt,
    LiftReason,
}

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(XpProfile::Table)
                    .if_not_exists()
                    .col(pk_auto(XpProfile::Id))
                    .col(string(XpProfile::GuildId))
                    .col(string(XpProfile::UserId))
                    .col(big_integer(XpProfile::Xp).default(0))
                    .col(integer(XpProfile::Level).default(1))
                    .col(timestamp(XpProfile::LastGainAt))
                    .col(integer(XpProfile::Revision).default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_xp_profile_guild_user")
                    .table(XpProfile::Table)
                    .col(XpProfile::GuildId)
                    .col(XpProfile::UserId)
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
                    .name("idx_xp_profile_guild_user")
                    .table(XpProfile::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(XpProfile::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum XpProfile {
    Table,
    Id,
    GuildId,
    UserId,
    Xp,
    Level,
    LastGainAt,
    Revision,
}

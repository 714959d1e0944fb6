use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuildSettings::Table)
                    .if_not_exists()
                    .col(pk_auto(GuildSettings::Id))
                    .col(string_uniq(GuildSettings::GuildId))
                    .col(boolean(GuildSettings::BansEnabled).default(false))
                    .col(boolean(GuildSettings::WarningsEnabled).default(false))
                    .col(boolean(GuildSettings::XpEnabled).default(false))
                    .col(boolean(GuildSettings::ModeratorPointsEnabled).default(false))
                    .col(boolean(GuildSettings::RankRolesEnabled).default(false))
                    .col(boolean(GuildSettings::GiveawaysEnabled).default(false))
                    .col(boolean(GuildSettings::StreamAlertsEnabled).default(false))
                    .col(string_null(GuildSettings::ModeratorRoleId))
                    .col(text(GuildSettings::ModeratorVoiceChannelIds).default("[]"))
                    .col(string_null(GuildSettings::StreamChannelId))
                    .col(
                        timestamp(GuildSettings::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuildSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum GuildSettings {
    Table,
    Id,
    GuildId,
    BansEnabled,
    WarningsEnabled,
    XpEnabled,
    ModeratorPointsEnabled,
    RankRolesEnabled,
    GiveawaysEnabled,
    StreamAlertsEnabled,
    ModeratorRoleId,
    ModeratorVoiceChannelIds,
    StreamChannelId,
    UpdatedAt,
}

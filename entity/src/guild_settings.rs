use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guild_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub guild_id: String,
    pub bans_enabled: bool,
    pub warnings_enabled: bool,
    pub xp_enabled: bool,
    pub moderator_points_enabled: bool,
    pub rank_roles_enabled: bool,
    pub giveaways_enabled: bool,
    pub stream_alerts_enabled: bool,
    pub moderator_role_id: Option<String>,
    /// JSON array of channel ID strings that count toward moderator voice points.
    #[sea_orm(column_type = "Text")]
    pub moderator_voice_channel_ids: String,
    pub stream_channel_id: Option<String>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

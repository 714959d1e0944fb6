use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "giveaway")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: String,
    pub channel_id: String,
    #[sea_orm(unique)]
    pub message_id: String,
    pub host_id: String,
    pub prize: String,
    pub winners_count: i32,
    pub required_role_id: Option<String>,
    pub ends_at: DateTimeUtc,
    /// One of `active`, `ended` or `cancelled`.
    pub status: String,
    /// JSON array of user ID strings in entry order.
    #[sea_orm(column_type = "Text")]
    pub participants: String,
    /// JSON array of user ID strings from the latest draw.
    #[sea_orm(column_type = "Text")]
    pub winners: String,
    pub ended_at: Option<DateTimeUtc>,
    pub revision: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

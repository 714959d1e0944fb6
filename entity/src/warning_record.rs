use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "warning_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: String,
    pub user_id: String,
    pub moderator_id: String,
    pub sequence: i32,
    pub reason: String,
    pub created_at: DateTimeUtc,
    pub acknowledged: bool,
    pub acknowledged_at: Option<DateTimeUtc>,
    pub dm_message_id: Option<String>,
    pub timeout_applied: bool,
    pub timeout_attempted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

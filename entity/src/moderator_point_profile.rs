use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "moderator_point_profile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: String,
    pub user_id: String,
    pub points: f64,
    pub last_point_at: Option<DateTimeUtc>,
    pub last_penalty_at: Option<DateTimeUtc>,
    pub weekly_total: f64,
    pub previous_weekly_total: f64,
    /// ISO week (`2026-W42`) this profile was last rolled over in.
    pub last_rollover_week: Option<String>,
    pub revision: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

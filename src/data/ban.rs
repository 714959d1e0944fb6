use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Condition, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serenity::all::{GuildId, UserId};

use crate::{
    data::collect_valid,
    error::AppError,
    model::ban::{BanParams, BanRecord, LiftReason},
};

use entity::ban_record::Column;

pub struct BanRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> BanRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new active ban record
    ///
    /// # Arguments
    /// - `params`: Guild, member, moderator, reason and optional expiry
    /// - `now`: Creation time
    ///
    /// # Returns
    /// - `Ok(BanRecord)`: The created ban
    /// - `Err(AppError)`: Database error
    pub async fn create(
        &self,
        params: &BanParams,
        now: DateTime<Utc>,
    ) -> Result<BanRecord, AppError> {
        let ban = entity::ban_record::ActiveModel {
            guild_id: ActiveValue::Set(params.guild_id.to_string()),
            user_id: ActiveValue::Set(params.user_id.to_string()),
            moderator_id: ActiveValue::Set(params.moderator_id.to_string()),
            reason: ActiveValue::Set(params.reason.clone()),
            created_at: ActiveValue::Set(now),
            expires_at: ActiveValue::Set(params.expires_at),
            active: ActiveValue::Set(true),
            lifted_at: ActiveValue::Set(None),
            lift_reason: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        BanRecord::from_entity(ban)
    }

    /// Replaces the moderator, reason and expiry of an active ban
    ///
    /// Used when a member who is already banned is banned again, keeping at
    /// most one active ban per member.
    ///
    /// # Returns
    /// - `Ok(Some(BanRecord))`: The updated ban
    /// - `Ok(None)`: The ban was no longer active
    /// - `Err(AppError)`: Database error
    pub async fn update_active(
        &self,
        id: i32,
        params: &BanParams,
    ) -> Result<Option<BanRecord>, AppError> {
        let result = entity::prelude::BanRecord::update_many()
            .set(entity::ban_record::ActiveModel {
                moderator_id: ActiveValue::Set(params.moderator_id.to_string()),
                reason: ActiveValue::Set(params.reason.clone()),
                expires_at: ActiveValue::Set(params.expires_at),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Active.eq(true))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Gets a ban by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<BanRecord>, AppError> {
        entity::prelude::BanRecord::find_by_id(id)
            .one(self.db)
            .await?
            .map(BanRecord::from_entity)
            .transpose()
    }

    /// Gets the active ban for a member, if any
    pub async fn find_active(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<BanRecord>, AppError> {
        entity::prelude::BanRecord::find()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .filter(Column::UserId.eq(user_id.to_string()))
            .filter(Column::Active.eq(true))
            .order_by_desc(Column::Id)
            .one(self.db)
            .await?
            .map(BanRecord::from_entity)
            .transpose()
    }

    /// Checks whether a member has a ban in force at `now`
    ///
    /// A ban past its expiry that the sweep has not lifted yet no longer counts.
    pub async fn is_actively_banned(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let count = entity::prelude::BanRecord::find()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .filter(Column::UserId.eq(user_id.to_string()))
            .filter(Column::Active.eq(true))
            .filter(
                Condition::any()
                    .add(Column::ExpiresAt.is_null())
                    .add(Column::ExpiresAt.gt(now)),
            )
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Gets active bans whose expiry has passed, in id order
    ///
    /// # Arguments
    /// - `now`: Bans expiring at or before this time are returned
    ///
    /// # Returns
    /// - `Ok(Vec<BanRecord>)`: Expired bans still marked active
    /// - `Err(AppError)`: Database error
    pub async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<BanRecord>, AppError> {
        let rows = entity::prelude::BanRecord::find()
            .filter(Column::Active.eq(true))
            .filter(Column::ExpiresAt.is_not_null())
            .filter(Column::ExpiresAt.lte(now))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await?;

        Ok(collect_valid("ban_record", rows, BanRecord::from_entity, |row| row.id))
    }

    /// Marks a ban inactive if it is still active
    ///
    /// # Arguments
    /// - `id`: Ban record ID
    /// - `reason`: Why the ban was lifted
    /// - `now`: Lift time
    ///
    /// # Returns
    /// - `Ok(true)`: The ban was active and is now lifted
    /// - `Ok(false)`: The ban was already inactive
    /// - `Err(AppError)`: Database error
    pub async fn deactivate(
        &self,
        id: i32,
        reason: LiftReason,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = entity::prelude::BanRecord::update_many()
            .set(entity::ban_record::ActiveModel {
                active: ActiveValue::Set(false),
                lifted_at: ActiveValue::Set(Some(now)),
                lift_reason: ActiveValue::Set(Some(reason.as_str().to_string())),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Active.eq(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}

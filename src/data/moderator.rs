use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serenity::all::{GuildId, UserId};

use crate::{
    data::collect_valid,
    error::AppError,
    model::moderator::{ModeratorPointEvent, ModeratorProfile},
};

use entity::moderator_point_event::Column as EventColumn;
use entity::moderator_point_profile::Column;

pub struct ModeratorRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ModeratorRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a moderator's point profile
    pub async fn get(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<ModeratorProfile>, AppError> {
        entity::prelude::ModeratorPointProfile::find()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .filter(Column::UserId.eq(user_id.to_string()))
            .one(self.db)
            .await?
            .map(ModeratorProfile::from_entity)
            .transpose()
    }

    /// Gets a moderator's point profile, creating an empty one if missing
    pub async fn get_or_create(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<ModeratorProfile, AppError> {
        if let Some(profile) = self.get(guild_id, user_id).await? {
            return Ok(profile);
        }

        let inserted = entity::moderator_point_profile::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
            points: ActiveValue::Set(0.0),
            last_point_at: ActiveValue::Set(None),
            last_penalty_at: ActiveValue::Set(None),
            weekly_total: ActiveValue::Set(0.0),
            previous_weekly_total: ActiveValue::Set(0.0),
            last_rollover_week: ActiveValue::Set(None),
            revision: ActiveValue::Set(0),
            ..Default::default()
        }
        .insert(self.db)
        .await;

        match inserted {
            Ok(profile) => ModeratorProfile::from_entity(profile),
            Err(e) => match self.get(guild_id, user_id).await? {
                Some(profile) => Ok(profile),
                None => Err(e.into()),
            },
        }
    }

    /// Gets every point profile in a guild, in id order
    pub async fn get_by_guild(&self, guild_id: GuildId) -> Result<Vec<ModeratorProfile>, AppError> {
        let rows = entity::prelude::ModeratorPointProfile::find()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await?;

        Ok(collect_valid(
            "moderator_point_profile",
            rows,
            ModeratorProfile::from_entity,
            |row| row.id,
        ))
    }

    /// Writes every mutable field of `updated` if the stored revision still
    /// matches `updated.revision`
    ///
    /// # Returns
    /// - `Ok(true)`: Written; stored revision advanced by one
    /// - `Ok(false)`: Lost to a concurrent writer
    pub async fn update(&self, updated: &ModeratorProfile) -> Result<bool, AppError> {
        let result = entity::prelude::ModeratorPointProfile::update_many()
            .set(entity::moderator_point_profile::ActiveModel {
                points: ActiveValue::Set(updated.points),
                last_point_at: ActiveValue::Set(updated.last_point_at),
                last_penalty_at: ActiveValue::Set(updated.last_penalty_at),
                weekly_total: ActiveValue::Set(updated.weekly_total),
                previous_weekly_total: ActiveValue::Set(updated.previous_weekly_total),
                last_rollover_week: ActiveValue::Set(updated.last_rollover_week.clone()),
                revision: ActiveValue::Set(updated.revision + 1),
                ..Default::default()
            })
            .filter(Column::Id.eq(updated.id))
            .filter(Column::Revision.eq(updated.revision))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}

pub struct ModeratorEventRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ModeratorEventRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends one entry to a moderator's points log
    ///
    /// # Arguments
    /// - `guild_id`: Guild the points were earned in
    /// - `user_id`: Moderator
    /// - `points`: Signed amount requested
    /// - `reason`: What the points were for
    /// - `now`: Time of the event
    pub async fn record(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        points: f64,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<ModeratorPointEvent, AppError> {
        let event = entity::moderator_point_event::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
            points: ActiveValue::Set(points),
            reason: ActiveValue::Set(reason.to_string()),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        ModeratorPointEvent::from_entity(event)
    }

    /// Gets a moderator's events in `[from, to)`, oldest first
    pub async fn find_between(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ModeratorPointEvent>, AppError> {
        let rows = entity::prelude::ModeratorPointEvent::find()
            .filter(EventColumn::GuildId.eq(guild_id.to_string()))
            .filter(EventColumn::UserId.eq(user_id.to_string()))
            .filter(EventColumn::CreatedAt.gte(from))
            .filter(EventColumn::CreatedAt.lt(to))
            .order_by_asc(EventColumn::CreatedAt)
            .order_by_asc(EventColumn::Id)
            .all(self.db)
            .await?;

        Ok(collect_valid(
            "moderator_point_event",
            rows,
            ModeratorPointEvent::from_entity,
            |row| row.id,
        ))
    }

    /// Deletes a guild's events older than `cutoff`
    ///
    /// # Returns
    /// - `Ok(u64)`: Number of events removed
    pub async fn delete_before(
        &self,
        guild_id: GuildId,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = entity::prelude::ModeratorPointEvent::delete_many()
            .filter(EventColumn::GuildId.eq(guild_id.to_string()))
            .filter(EventColumn::CreatedAt.lt(cutoff))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

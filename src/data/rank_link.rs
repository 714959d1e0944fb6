use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serenity::all::{GuildId, UserId};

use crate::{
    data::collect_valid,
    error::AppError,
    model::rank::{RankLink, RankTier},
};

use entity::rank_link::Column;

pub struct RankLinkRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RankLinkRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Links a member to an in-game handle, replacing any previous handle
    ///
    /// Changing the handle clears the synced tier so the next sweep applies
    /// the new handle's tier.
    pub async fn upsert(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        handle: &str,
    ) -> Result<RankLink, AppError> {
        let existing = entity::prelude::RankLink::find()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .filter(Column::UserId.eq(user_id.to_string()))
            .one(self.db)
            .await?;

        let saved = match existing {
            Some(row) if row.handle == handle => row,
            Some(row) => {
                let mut active: entity::rank_link::ActiveModel = row.into();
                active.handle = ActiveValue::Set(handle.to_string());
                active.last_synced_rank = ActiveValue::Set(None);
                active.last_synced_at = ActiveValue::Set(None);
                active.update(self.db).await?
            }
            None => {
                entity::rank_link::ActiveModel {
                    guild_id: ActiveValue::Set(guild_id.to_string()),
                    user_id: ActiveValue::Set(user_id.to_string()),
                    handle: ActiveValue::Set(handle.to_string()),
                    last_synced_rank: ActiveValue::Set(None),
                    last_synced_at: ActiveValue::Set(None),
                    ..Default::default()
                }
                .insert(self.db)
                .await?
            }
        };

        RankLink::from_entity(saved)
    }

    /// Gets every rank link in a guild, in id order
    pub async fn get_by_guild(&self, guild_id: GuildId) -> Result<Vec<RankLink>, AppError> {
        let rows = entity::prelude::RankLink::find()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await?;

        Ok(collect_valid("rank_link", rows, RankLink::from_entity, |row| row.id))
    }

    /// Gets a rank link by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<RankLink>, AppError> {
        entity::prelude::RankLink::find_by_id(id)
            .one(self.db)
            .await?
            .map(RankLink::from_entity)
            .transpose()
    }

    /// Stores the tier whose role was just applied
    pub async fn record_sync(
        &self,
        id: i32,
        tier: RankTier,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        entity::prelude::RankLink::update_many()
            .set(entity::rank_link::ActiveModel {
                last_synced_rank: ActiveValue::Set(Some(tier.name().to_string())),
                last_synced_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Refreshes the sync time after a fetch that found the tier unchanged
    pub async fn touch_synced(&self, id: i32, now: DateTime<Utc>) -> Result<(), AppError> {
        entity::prelude::RankLink::update_many()
            .set(entity::rank_link::ActiveModel {
                last_synced_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Removes a member's link
    ///
    /// # Returns
    /// - `Ok(true)`: A link was removed
    /// - `Ok(false)`: The member had no link
    pub async fn delete(&self, guild_id: GuildId, user_id: UserId) -> Result<bool, AppError> {
        let result = entity::prelude::RankLink::delete_many()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .filter(Column::UserId.eq(user_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

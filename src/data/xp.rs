use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serenity::all::{GuildId, UserId};

use crate::{data::collect_valid, error::AppError, model::xp::XpProfile};

use entity::xp_profile::Column;

pub struct XpRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> XpRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a member's XP profile
    pub async fn get(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<XpProfile>, AppError> {
        entity::prelude::XpProfile::find()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .filter(Column::UserId.eq(user_id.to_string()))
            .one(self.db)
            .await?
            .map(XpProfile::from_entity)
            .transpose()
    }

    /// Gets a member's XP profile, creating an empty level 1 profile if missing
    ///
    /// A new profile's `last_gain_at` is `now` minus one day so the first
    /// message is never inside the cooldown.
    ///
    /// # Arguments
    /// - `guild_id`: Guild the member belongs to
    /// - `user_id`: The member
    /// - `now`: Current time
    ///
    /// # Returns
    /// - `Ok(XpProfile)`: Existing or newly created profile
    /// - `Err(AppError)`: Database error
    pub async fn get_or_create(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<XpProfile, AppError> {
        if let Some(profile) = self.get(guild_id, user_id).await? {
            return Ok(profile);
        }

        let inserted = entity::xp_profile::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
            xp: ActiveValue::Set(0),
            level: ActiveValue::Set(1),
            last_gain_at: ActiveValue::Set(now - chrono::Duration::days(1)),
            revision: ActiveValue::Set(0),
            ..Default::default()
        }
        .insert(self.db)
        .await;

        match inserted {
            Ok(profile) => XpProfile::from_entity(profile),
            // Another writer created it between the read and the insert
            Err(e) => match self.get(guild_id, user_id).await? {
                Some(profile) => Ok(profile),
                None => Err(e.into()),
            },
        }
    }

    /// Writes new XP and level if the profile has not changed since it was read
    ///
    /// # Arguments
    /// - `profile`: Profile as read; its `revision` guards the write
    /// - `xp`: New XP total
    /// - `level`: Level derived from `xp`
    /// - `last_gain_at`: New last gain time
    ///
    /// # Returns
    /// - `Ok(true)`: Written; revision advanced
    /// - `Ok(false)`: Lost to a concurrent writer
    pub async fn update(
        &self,
        profile: &XpProfile,
        xp: i64,
        level: i32,
        last_gain_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = entity::prelude::XpProfile::update_many()
            .set(entity::xp_profile::ActiveModel {
                xp: ActiveValue::Set(xp),
                level: ActiveValue::Set(level),
                last_gain_at: ActiveValue::Set(last_gain_at),
                revision: ActiveValue::Set(profile.revision + 1),
                ..Default::default()
            })
            .filter(Column::Id.eq(profile.id))
            .filter(Column::Revision.eq(profile.revision))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Gets profiles with XP left that have not gained any since `cutoff`, in id order
    pub async fn find_inactive(&self, cutoff: DateTime<Utc>) -> Result<Vec<XpProfile>, AppError> {
        let rows = entity::prelude::XpProfile::find()
            .filter(Column::LastGainAt.lt(cutoff))
            .filter(Column::Xp.gt(0))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await?;

        Ok(collect_valid("xp_profile", rows, XpProfile::from_entity, |row| row.id))
    }
}

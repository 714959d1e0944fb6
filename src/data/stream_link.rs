use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serenity::all::{GuildId, UserId};

use crate::{data::collect_valid, error::AppError, model::stream::StreamLink};

use entity::stream_link::Column;

pub struct StreamLinkRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StreamLinkRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Links a member to a Twitch channel, replacing any previous channel
    ///
    /// Handles are stored lowercase since Twitch logins are case-insensitive.
    pub async fn upsert(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        twitch_handle: &str,
        now: DateTime<Utc>,
    ) -> Result<StreamLink, AppError> {
        let handle = twitch_handle.trim().to_lowercase();
        let existing = entity::prelude::StreamLink::find()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .filter(Column::UserId.eq(user_id.to_string()))
            .one(self.db)
            .await?;

        let saved = match existing {
            Some(row) => {
                let mut active: entity::stream_link::ActiveModel = row.into();
                active.twitch_handle = ActiveValue::Set(handle);
                active.updated_at = ActiveValue::Set(now);
                active.update(self.db).await?
            }
            None => {
                entity::stream_link::ActiveModel {
                    guild_id: ActiveValue::Set(guild_id.to_string()),
                    user_id: ActiveValue::Set(user_id.to_string()),
                    twitch_handle: ActiveValue::Set(handle),
                    live: ActiveValue::Set(false),
                    role_applied: ActiveValue::Set(false),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(self.db)
                .await?
            }
        };

        StreamLink::from_entity(saved)
    }

    /// Gets every stream link in a guild, in id order
    pub async fn get_by_guild(&self, guild_id: GuildId) -> Result<Vec<StreamLink>, AppError> {
        let rows = entity::prelude::StreamLink::find()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await?;

        Ok(collect_valid("stream_link", rows, StreamLink::from_entity, |row| row.id))
    }

    /// Gets a stream link by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<StreamLink>, AppError> {
        entity::prelude::StreamLink::find_by_id(id)
            .one(self.db)
            .await?
            .map(StreamLink::from_entity)
            .transpose()
    }

    /// Stores the live state of a link
    ///
    /// # Arguments
    /// - `id`: Stream link ID
    /// - `live`: Whether the channel is on air
    /// - `role_applied`: Whether the live role is held; only true while live
    /// - `now`: Update time
    pub async fn set_state(
        &self,
        id: i32,
        live: bool,
        role_applied: bool,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        entity::prelude::StreamLink::update_many()
            .set(entity::stream_link::ActiveModel {
                live: ActiveValue::Set(live),
                role_applied: ActiveValue::Set(live && role_applied),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Removes a member's link
    pub async fn delete(&self, guild_id: GuildId, user_id: UserId) -> Result<bool, AppError> {
        let result = entity::prelude::StreamLink::delete_many()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .filter(Column::UserId.eq(user_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

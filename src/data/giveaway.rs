use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serenity::all::{MessageId, UserId};

use crate::{
    data::collect_valid,
    error::AppError,
    model::giveaway::{Giveaway, GiveawayStatus, StartGiveawayParams},
    util::parse::encode_snowflake_list,
};

use entity::giveaway::Column;

pub struct GiveawayRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GiveawayRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an active giveaway tracked by its posted message
    ///
    /// # Arguments
    /// - `params`: Giveaway configuration
    /// - `message_id`: The posted giveaway message entrants react to
    /// - `now`: Creation time
    ///
    /// # Returns
    /// - `Ok(Giveaway)`: The created giveaway
    /// - `Err(AppError)`: Database error
    pub async fn create(
        &self,
        params: &StartGiveawayParams,
        message_id: MessageId,
        now: DateTime<Utc>,
    ) -> Result<Giveaway, AppError> {
        let giveaway = entity::giveaway::ActiveModel {
            guild_id: ActiveValue::Set(params.guild_id.to_string()),
            channel_id: ActiveValue::Set(params.channel_id.to_string()),
            message_id: ActiveValue::Set(message_id.to_string()),
            host_id: ActiveValue::Set(params.host_id.to_string()),
            prize: ActiveValue::Set(params.prize.clone()),
            winners_count: ActiveValue::Set(params.winners_count as i32),
            required_role_id: ActiveValue::Set(params.required_role_id.map(|id| id.to_string())),
            ends_at: ActiveValue::Set(params.ends_at),
            status: ActiveValue::Set(GiveawayStatus::Active.as_str().to_string()),
            participants: ActiveValue::Set("[]".to_string()),
            winners: ActiveValue::Set("[]".to_string()),
            ended_at: ActiveValue::Set(None),
            revision: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Giveaway::from_entity(giveaway)
    }

    /// Gets a giveaway by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<Giveaway>, AppError> {
        entity::prelude::Giveaway::find_by_id(id)
            .one(self.db)
            .await?
            .map(Giveaway::from_entity)
            .transpose()
    }

    /// Gets the giveaway posted as the given message
    pub async fn get_by_message(
        &self,
        message_id: MessageId,
    ) -> Result<Option<Giveaway>, AppError> {
        entity::prelude::Giveaway::find()
            .filter(Column::MessageId.eq(message_id.to_string()))
            .one(self.db)
            .await?
            .map(Giveaway::from_entity)
            .transpose()
    }

    /// Gets active giveaways whose end time has passed, in id order
    pub async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Giveaway>, AppError> {
        let rows = entity::prelude::Giveaway::find()
            .filter(Column::Status.eq(GiveawayStatus::Active.as_str()))
            .filter(Column::EndsAt.lte(now))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await?;

        Ok(collect_valid("giveaway", rows, Giveaway::from_entity, |row| row.id))
    }

    /// Gets active giveaways still counting down, in id order
    pub async fn find_running(&self, now: DateTime<Utc>) -> Result<Vec<Giveaway>, AppError> {
        let rows = entity::prelude::Giveaway::find()
            .filter(Column::Status.eq(GiveawayStatus::Active.as_str()))
            .filter(Column::EndsAt.gt(now))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await?;

        Ok(collect_valid("giveaway", rows, Giveaway::from_entity, |row| row.id))
    }

    /// Writes a new participant list if nobody else has written since `giveaway` was read
    ///
    /// # Arguments
    /// - `giveaway`: The giveaway as read, whose `revision` guards the write
    /// - `participants`: Full participant list to store
    ///
    /// # Returns
    /// - `Ok(true)`: Written; revision advanced
    /// - `Ok(false)`: Lost to a concurrent writer or the giveaway ended
    pub async fn update_participants(
        &self,
        giveaway: &Giveaway,
        participants: &[UserId],
    ) -> Result<bool, AppError> {
        let result = entity::prelude::Giveaway::update_many()
            .set(entity::giveaway::ActiveModel {
                participants: ActiveValue::Set(encode_snowflake_list(participants)?),
                revision: ActiveValue::Set(giveaway.revision + 1),
                ..Default::default()
            })
            .filter(Column::Id.eq(giveaway.id))
            .filter(Column::Revision.eq(giveaway.revision))
            .filter(Column::Status.eq(GiveawayStatus::Active.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Ends a giveaway with its winners if it is still active
    ///
    /// # Returns
    /// - `Ok(true)`: This call ended the giveaway
    /// - `Ok(false)`: It had already ended
    pub async fn mark_ended(
        &self,
        id: i32,
        winners: &[UserId],
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = entity::prelude::Giveaway::update_many()
            .set(entity::giveaway::ActiveModel {
                status: ActiveValue::Set(GiveawayStatus::Ended.as_str().to_string()),
                winners: ActiveValue::Set(encode_snowflake_list(winners)?),
                ended_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(GiveawayStatus::Active.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Cancels a giveaway if it is still active, clearing any winners
    ///
    /// # Returns
    /// - `Ok(true)`: The giveaway was active and is now cancelled
    /// - `Ok(false)`: It had already ended or been cancelled
    pub async fn mark_cancelled(&self, id: i32, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = entity::prelude::Giveaway::update_many()
            .set(entity::giveaway::ActiveModel {
                status: ActiveValue::Set(GiveawayStatus::Cancelled.as_str().to_string()),
                winners: ActiveValue::Set(encode_snowflake_list::<UserId>(&[])?),
                ended_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(GiveawayStatus::Active.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Replaces the winners of an ended giveaway after a reroll
    pub async fn set_winners(&self, id: i32, winners: &[UserId]) -> Result<bool, AppError> {
        let result = entity::prelude::Giveaway::update_many()
            .set(entity::giveaway::ActiveModel {
                winners: ActiveValue::Set(encode_snowflake_list(winners)?),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(GiveawayStatus::Ended.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}

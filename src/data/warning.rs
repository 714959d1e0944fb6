use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serenity::all::{GuildId, MessageId, UserId};

use crate::{
    data::collect_valid,
    error::AppError,
    model::warning::{WarnParams, WarningRecord},
};

use entity::warning_record::Column;

pub struct WarningRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WarningRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a warning with the next sequence number for the member
    ///
    /// The sequence is one more than the highest existing sequence for the
    /// member in the guild, starting at 1.
    ///
    /// # Arguments
    /// - `params`: Guild, member, moderator and reason
    /// - `now`: Creation time
    ///
    /// # Returns
    /// - `Ok(WarningRecord)`: The created warning
    /// - `Err(AppError)`: Database error
    pub async fn create(
        &self,
        params: &WarnParams,
        now: DateTime<Utc>,
    ) -> Result<WarningRecord, AppError> {
        let latest = entity::prelude::WarningRecord::find()
            .filter(Column::GuildId.eq(params.guild_id.to_string()))
            .filter(Column::UserId.eq(params.user_id.to_string()))
            .order_by_desc(Column::Sequence)
            .one(self.db)
            .await?;
        let sequence = latest.map(|w| w.sequence).unwrap_or(0) + 1;

        let warning = entity::warning_record::ActiveModel {
            guild_id: ActiveValue::Set(params.guild_id.to_string()),
            user_id: ActiveValue::Set(params.user_id.to_string()),
            moderator_id: ActiveValue::Set(params.moderator_id.to_string()),
            sequence: ActiveValue::Set(sequence),
            reason: ActiveValue::Set(params.reason.clone()),
            created_at: ActiveValue::Set(now),
            acknowledged: ActiveValue::Set(false),
            acknowledged_at: ActiveValue::Set(None),
            dm_message_id: ActiveValue::Set(None),
            timeout_applied: ActiveValue::Set(false),
            timeout_attempted: ActiveValue::Set(false),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        WarningRecord::from_entity(warning)
    }

    /// Gets a warning by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<WarningRecord>, AppError> {
        entity::prelude::WarningRecord::find_by_id(id)
            .one(self.db)
            .await?
            .map(WarningRecord::from_entity)
            .transpose()
    }

    /// Gets every warning for a member in sequence order
    pub async fn get_by_user(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Vec<WarningRecord>, AppError> {
        let rows = entity::prelude::WarningRecord::find()
            .filter(Column::GuildId.eq(guild_id.to_string()))
            .filter(Column::UserId.eq(user_id.to_string()))
            .order_by_asc(Column::Sequence)
            .all(self.db)
            .await?;

        Ok(collect_valid("warning_record", rows, WarningRecord::from_entity, |row| row.id))
    }

    /// Finds the warning whose acknowledgment DM is the given message
    ///
    /// # Arguments
    /// - `user_id`: Member the DM was sent to
    /// - `message_id`: The DM message
    ///
    /// # Returns
    /// - `Ok(Some(WarningRecord))`: Warning tracked by that DM
    /// - `Ok(None)`: Message is not a warning DM for this member
    pub async fn find_by_dm_message(
        &self,
        user_id: UserId,
        message_id: MessageId,
    ) -> Result<Option<WarningRecord>, AppError> {
        entity::prelude::WarningRecord::find()
            .filter(Column::UserId.eq(user_id.to_string()))
            .filter(Column::DmMessageId.eq(message_id.to_string()))
            .one(self.db)
            .await?
            .map(WarningRecord::from_entity)
            .transpose()
    }

    /// Records the DM the member must react to
    pub async fn set_dm_message(&self, id: i32, message_id: MessageId) -> Result<(), AppError> {
        entity::prelude::WarningRecord::update_many()
            .set(entity::warning_record::ActiveModel {
                dm_message_id: ActiveValue::Set(Some(message_id.to_string())),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Marks a warning acknowledged if it was not already
    ///
    /// # Returns
    /// - `Ok(true)`: This call acknowledged the warning
    /// - `Ok(false)`: Already acknowledged
    pub async fn acknowledge(&self, id: i32, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = entity::prelude::WarningRecord::update_many()
            .set(entity::warning_record::ActiveModel {
                acknowledged: ActiveValue::Set(true),
                acknowledged_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Acknowledged.eq(false))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Gets unacknowledged warnings created at or before `cutoff` that have no
    /// timeout applied or attempted, in id order
    pub async fn find_due_for_timeout(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<WarningRecord>, AppError> {
        let rows = entity::prelude::WarningRecord::find()
            .filter(Column::Acknowledged.eq(false))
            .filter(Column::TimeoutApplied.eq(false))
            .filter(Column::TimeoutAttempted.eq(false))
            .filter(Column::CreatedAt.lte(cutoff))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await?;

        Ok(collect_valid("warning_record", rows, WarningRecord::from_entity, |row| row.id))
    }

    /// Records that the member was timed out for this warning
    ///
    /// Conditional on the warning still being unacknowledged so a reaction
    /// that lands during the sweep wins.
    ///
    /// # Returns
    /// - `Ok(true)`: Flag set
    /// - `Ok(false)`: Warning was acknowledged in the meantime
    pub async fn mark_timeout_applied(&self, id: i32) -> Result<bool, AppError> {
        let result = entity::prelude::WarningRecord::update_many()
            .set(entity::warning_record::ActiveModel {
                timeout_applied: ActiveValue::Set(true),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Acknowledged.eq(false))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Records that Discord refused the timeout, so the sweep stops retrying
    pub async fn mark_timeout_attempted(&self, id: i32) -> Result<(), AppError> {
        entity::prelude::WarningRecord::update_many()
            .set(entity::warning_record::ActiveModel {
                timeout_attempted: ActiveValue::Set(true),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use crate::error::AppError;

/// Persisted progress markers for scheduled tasks.
///
/// A marker is a `(name, scope)` keyed string, typically a timestamp or ISO
/// week, that lets a sweep pick up where it left off after a restart.
pub struct TaskMarkerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TaskMarkerRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the value of a marker
    ///
    /// # Arguments
    /// - `name`: Marker name, usually the task name
    /// - `scope`: What the marker is for, usually a guild ID
    ///
    /// # Returns
    /// - `Ok(Some(value))`: Marker exists
    /// - `Ok(None)`: Marker was never set
    /// - `Err(AppError)`: Database error
    pub async fn get(&self, name: &str, scope: &str) -> Result<Option<String>, AppError> {
        Ok(self.find(name, scope).await?.map(|row| row.value))
    }

    /// Sets a marker, creating it if needed
    pub async fn set(
        &self,
        name: &str,
        scope: &str,
        value: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        match self.find(name, scope).await? {
            Some(row) => {
                let mut active: entity::task_marker::ActiveModel = row.into();
                active.value = ActiveValue::Set(value.to_string());
                active.updated_at = ActiveValue::Set(now);
                active.update(self.db).await?;
            }
            None => {
                entity::task_marker::ActiveModel {
                    name: ActiveValue::Set(name.to_string()),
                    scope: ActiveValue::Set(scope.to_string()),
                    value: ActiveValue::Set(value.to_string()),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(self.db)
                .await?;
            }
        }

        Ok(())
    }

    /// Gets a marker holding an RFC 3339 timestamp
    ///
    /// A value that does not parse is treated as unset.
    pub async fn get_timestamp(
        &self,
        name: &str,
        scope: &str,
    ) -> Result<Option<DateTime<Utc>>, AppError> {
        Ok(self.get(name, scope).await?.and_then(|value| {
            DateTime::parse_from_rfc3339(&value)
                .ok()
                .map(|at| at.with_timezone(&Utc))
        }))
    }

    /// Sets a marker to an RFC 3339 timestamp
    pub async fn set_timestamp(
        &self,
        name: &str,
        scope: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.set(name, scope, &at.to_rfc3339(), at).await
    }

    async fn find(
        &self,
        name: &str,
        scope: &str,
    ) -> Result<Option<entity::task_marker::Model>, AppError> {
        Ok(entity::prelude::TaskMarker::find()
            .filter(entity::task_marker::Column::Name.eq(name))
            .filter(entity::task_marker::Column::Scope.eq(scope))
            .one(self.db)
            .await?)
    }
}

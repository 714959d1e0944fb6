use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TaskMarker::Table)
                    .if_not_exists()
                    .col(pk_auto(TaskMarker::Id))
                    .col(string(TaskMarker::Name))
                    .col(string(TaskMarker::Scope))
                    .col(string(TaskMarker::Value))
                    .col(timestamp(TaskMarker::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_task_marker_name_scope")
                    .table(TaskMarker::Table)
                    .col(TaskMarker::Name)
                    .col(TaskMarker::Scope)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_task_marker_name_scope")
                    .table(TaskMarker::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(TaskMarker::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TaskMarker {
    Table,
    Id,
    Name,
    Scope,
    Value,
    UpdatedAt,
}

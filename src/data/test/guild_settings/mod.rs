use crate::{
    data::{guild_settings::GuildSettingsRepository, test::id},
    error::AppError,
    model::guild_settings::Feature,
};
use serenity::all::GuildId;
use test_utils::{builder::TestBuilder, factory::guild_settings::GuildSettingsFactory};

/// Tests filtering guilds by a feature switch.
///
/// Expected: only guilds with the feature enabled
#[tokio::test]
async fn returns_guilds_with_feature_enabled() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let on = GuildSettingsFactory::new(db).build().await?;
    GuildSettingsFactory::new(db).xp_enabled(false).build().await?;

    let enabled = GuildSettingsRepository::new(db)
        .get_enabled(Feature::Xp)
        .await?;

    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].guild_id, id::<GuildId>(&on.guild_id));

    Ok(())
}

/// Tests the default for a guild without a settings row.
///
/// Expected: every feature disabled
#[tokio::test]
async fn missing_guild_has_everything_disabled() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let settings = GuildSettingsRepository::new(db)
        .get_or_disabled(GuildId::new(77))
        .await?;

    assert_eq!(settings.guild_id, GuildId::new(77));
    assert!(!settings.is_enabled(Feature::Bans));
    assert!(!settings.is_enabled(Feature::Giveaways));

    Ok(())
}

/// Tests updating an existing row through upsert.
///
/// Expected: the stored row reflects the change
#[tokio::test]
async fn upsert_updates_existing_row() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let created = GuildSettingsFactory::new(db).build().await?;
    let repo = GuildSettingsRepository::new(db);
    let mut settings = repo.get(id(&created.guild_id)).await?.unwrap();
    settings.stream_alerts_enabled = false;

    repo.upsert(&settings).await?;

    let stored = repo.get(settings.guild_id).await?.unwrap();
    assert!(!stored.is_enabled(Feature::StreamAlerts));
    assert!(stored.is_enabled(Feature::Xp));

    Ok(())
}

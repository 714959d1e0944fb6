use super::*;

/// Tests timing out a member who ignored a warning past the deadline.
///
/// Expected: one timeout for the configured duration, reminder DM sent,
/// and nothing more on the next run
#[tokio::test]
async fn times_out_unacknowledged_warning_once() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarningRecord)
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = WarningConfig::default();
    let guild_id = enabled_guild(db).await?;

    let now = Utc::now();
    let warning = WarningRecordFactory::new(db, guild_id.to_string())
        .created_at(now - Duration::hours(25))
        .dm_message_id(Some("900".to_string()))
        .build()
        .await?;

    let service = WarningService::new(db, &discord, &config);
    service.enforce_deadlines(now, &Shutdown::never()).await?;
    service.enforce_deadlines(now, &Shutdown::never()).await?;

    assert_eq!(
        discord.calls_of(Action::Timeout),
        vec![Call::Timeout {
            guild_id,
            user_id: snowflake(&warning.user_id),
            until: Some(now + config.timeout_duration),
        }]
    );
    assert_eq!(discord.count(Action::DirectMessage), 1);

    let stored = WarningRepository::new(db).get_by_id(warning.id).await?.unwrap();
    assert!(stored.timeout_applied);

    Ok(())
}

/// Tests that warnings inside the deadline or in disabled guilds are left alone.
///
/// Expected: no timeout calls
#[tokio::test]
async fn skips_recent_and_disabled() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarningRecord)
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = WarningConfig::default();
    let guild_id = enabled_guild(db).await?;
    let disabled = factory::guild_settings::GuildSettingsFactory::new(db)
        .warnings_enabled(false)
        .build()
        .await?;

    let now = Utc::now();
    WarningRecordFactory::new(db, guild_id.to_string())
        .created_at(now - Duration::hours(23))
        .build()
        .await?;
    WarningRecordFactory::new(db, disabled.guild_id)
        .created_at(now - Duration::hours(30))
        .build()
        .await?;

    WarningService::new(db, &discord, &config)
        .enforce_deadlines(now, &Shutdown::never())
        .await?;

    assert_eq!(discord.count(Action::Timeout), 0);

    Ok(())
}

/// Tests a timeout Discord will never allow.
///
/// Expected: warning marked attempted and not retried
#[tokio::test]
async fn forbidden_timeout_is_not_retried() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarningRecord)
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    discord.fail(Action::Timeout, ActuatorError::Forbidden("owner".to_string()));
    let config = WarningConfig::default();
    let guild_id = enabled_guild(db).await?;

    let now = Utc::now();
    let warning = WarningRecordFactory::new(db, guild_id.to_string())
        .created_at(now - Duration::days(2))
        .build()
        .await?;

    let service = WarningService::new(db, &discord, &config);
    service.enforce_deadlines(now, &Shutdown::never()).await?;
    service.enforce_deadlines(now, &Shutdown::never()).await?;

    assert_eq!(discord.count(Action::Timeout), 1);
    let stored = WarningRepository::new(db).get_by_id(warning.id).await?.unwrap();
    assert!(stored.timeout_attempted);
    assert!(!stored.timeout_applied);

    Ok(())
}

/// Tests that a transient timeout failure is retried on the next run.
///
/// Expected: two timeout attempts, applied after the second
#[tokio::test]
async fn transient_timeout_failure_is_retried() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarningRecord)
        .with_table(entity::prelude::GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    discord.fail_once(Action::Timeout, ActuatorError::RateLimited("slow down".to_string()));
    let config = WarningConfig::default();
    let guild_id = enabled_guild(db).await?;

    let now = Utc::now();
    let warning = WarningRecordFactory::new(db, guild_id.to_string())
        .created_at(now - Duration::days(2))
        .build()
        .await?;

    let service = WarningService::new(db, &discord, &config);
    service.enforce_deadlines(now, &Shutdown::never()).await?;
    let repo = WarningRepository::new(db);
    assert!(!repo.get_by_id(warning.id).await?.unwrap().timeout_applied);

    service.enforce_deadlines(now, &Shutdown::never()).await?;
    assert!(repo.get_by_id(warning.id).await?.unwrap().timeout_applied);
    assert_eq!(discord.count(Action::Timeout), 2);

    Ok(())
}

use super::*;

/// Tests issuing a warning to a member who accepts DMs.
///
/// Expected: warning numbered 1 with the DM message stored
#[tokio::test]
async fn stores_delivered_dm() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarningRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = WarningConfig::default();

    let params = WarnParams {
        guild_id: GuildId::new(1),
        user_id: UserId::new(2),
        moderator_id: UserId::new(3),
        reason: "Rule 4".to_string(),
    };
    let warning = WarningService::new(db, &discord, &config)
        .warn(&params, Utc::now())
        .await?;

    assert_eq!(warning.sequence, 1);
    assert!(warning.dm_message_id.is_some());
    assert!(!warning.timeout_attempted);

    let stored = WarningRepository::new(db).get_by_id(warning.id).await?.unwrap();
    assert_eq!(stored.dm_message_id, warning.dm_message_id);

    Ok(())
}

/// Tests issuing a warning to a member with closed DMs.
///
/// Expected: warning kept and exempt from the timeout sweep
#[tokio::test]
async fn undeliverable_warning_is_not_enforced() -> Result<(), AppError> {
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
    discord.close_dms(UserId::new(2));

    let issued_at = Utc::now() - Duration::days(2);
    let params = WarnParams {
        guild_id,
        user_id: UserId::new(2),
        moderator_id: UserId::new(3),
        reason: "Rule 4".to_string(),
    };
    let service = WarningService::new(db, &discord, &config);
    let warning = service.warn(&params, issued_at).await?;

    assert!(warning.dm_message_id.is_none());
    assert!(warning.timeout_attempted);

    service
        .enforce_deadlines(Utc::now(), &Shutdown::never())
        .await?;
    assert_eq!(discord.count(Action::Timeout), 0);

    Ok(())
}

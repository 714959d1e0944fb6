use super::*;

/// Tests lifting a ban whose expiry has passed.
///
/// Expected: Discord unban issued and the record deactivated as expired
#[tokio::test]
async fn lifts_expired_ban() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();

    let now = Utc::now();
    let ban = factory::ban_record::BanRecordFactory::new(db, "1")
        .expires_at(Some(now - Duration::minutes(1)))
        .build()
        .await?;

    BanService::new(db, &discord)
        .expire_bans(now, &Shutdown::never())
        .await?;

    assert_eq!(
        discord.calls_of(Action::Unban),
        vec![Call::Unban {
            guild_id: GuildId::new(1),
            user_id: snowflake(&ban.user_id),
        }]
    );
    let stored = BanRepository::new(db).get_by_id(ban.id).await?.unwrap();
    assert!(!stored.active);
    assert_eq!(stored.lift_reason, Some(LiftReason::Expired));

    Ok(())
}

/// Tests a ban that was already removed on Discord.
///
/// Expected: record deactivated as missing
#[tokio::test]
async fn records_ban_missing_on_discord() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    discord.fail(Action::Unban, ActuatorError::NotFound("ban".to_string()));

    let now = Utc::now();
    let ban = factory::ban_record::BanRecordFactory::new(db, "1")
        .expires_at(Some(now - Duration::hours(2)))
        .build()
        .await?;

    BanService::new(db, &discord)
        .expire_bans(now, &Shutdown::never())
        .await?;

    let stored = BanRepository::new(db).get_by_id(ban.id).await?.unwrap();
    assert!(!stored.active);
    assert_eq!(stored.lift_reason, Some(LiftReason::Missing));

    Ok(())
}

/// Tests that a transient unban failure leaves the ban for the next sweep
/// and does not stop the sweep.
///
/// Expected: first ban still active, second ban lifted
#[tokio::test]
async fn transient_failure_keeps_ban_active() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    discord.fail_once(Action::Unban, ActuatorError::Transient("gateway".to_string()));

    let now = Utc::now();
    let first = factory::ban_record::BanRecordFactory::new(db, "1")
        .expires_at(Some(now - Duration::minutes(5)))
        .build()
        .await?;
    let second = factory::ban_record::BanRecordFactory::new(db, "1")
        .expires_at(Some(now - Duration::minutes(5)))
        .build()
        .await?;

    let service = BanService::new(db, &discord);
    service.expire_bans(now, &Shutdown::never()).await?;

    let repo = BanRepository::new(db);
    assert!(repo.get_by_id(first.id).await?.unwrap().active);
    assert!(!repo.get_by_id(second.id).await?.unwrap().active);

    // Retried on the next run
    service.expire_bans(now, &Shutdown::never()).await?;
    assert!(!repo.get_by_id(first.id).await?.unwrap().active);
    assert_eq!(discord.count(Action::Unban), 3);

    Ok(())
}

/// Tests that permanent and future bans are left alone.
///
/// Expected: no unban calls
#[tokio::test]
async fn ignores_unexpired_bans() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();

    let now = Utc::now();
    factory::ban_record::BanRecordFactory::new(db, "1")
        .expires_at(None)
        .build()
        .await?;
    factory::ban_record::BanRecordFactory::new(db, "1")
        .expires_at(Some(now + Duration::days(1)))
        .build()
        .await?;

    BanService::new(db, &discord)
        .expire_bans(now, &Shutdown::never())
        .await?;

    assert_eq!(discord.count(Action::Unban), 0);

    Ok(())
}

/// Tests an unban Discord refuses outright.
///
/// Expected: record closed as failed after one attempt, never retried
#[tokio::test]
async fn forbidden_unban_closes_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    discord.fail(Action::Unban, ActuatorError::Forbidden("missing permissions".to_string()));

    let now = Utc::now();
    let ban = factory::ban_record::BanRecordFactory::new(db, "1")
        .expires_at(Some(now - Duration::minutes(1)))
        .build()
        .await?;

    let service = BanService::new(db, &discord);
    for _ in 0..3 {
        service.expire_bans(now, &Shutdown::never()).await?;
    }

    assert_eq!(discord.count(Action::Unban), 1);
    let stored = BanRepository::new(db).get_by_id(ban.id).await?.unwrap();
    assert!(!stored.active);
    assert_eq!(stored.lift_reason, Some(LiftReason::Failed));

    Ok(())
}

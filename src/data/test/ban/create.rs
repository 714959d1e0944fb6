use super::*;

/// Tests creating a temporary ban.
///
/// Expected: Ok with an active record carrying the expiry
#[tokio::test]
async fn creates_active_ban() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let params = BanParams {
        guild_id: GuildId::new(1),
        user_id: UserId::new(2),
        moderator_id: UserId::new(3),
        reason: "Spam".to_string(),
        expires_at: Some(now + Duration::days(1)),
    };

    let ban = BanRepository::new(db).create(&params, now).await?;

    assert!(ban.active);
    assert_eq!(ban.user_id, UserId::new(2));
    assert_eq!(ban.expires_at, params.expires_at);
    assert!(ban.lift_reason.is_none());

    Ok(())
}

/// Tests replacing the details of an existing active ban.
///
/// Expected: same record ID with the new reason and expiry
#[tokio::test]
async fn update_active_keeps_single_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let existing = factory::create_ban_record(db, "1").await?;
    let params = BanParams {
        guild_id: id(&existing.guild_id),
        user_id: id(&existing.user_id),
        moderator_id: UserId::new(99),
        reason: "Repeat offence".to_string(),
        expires_at: None,
    };

    let repo = BanRepository::new(db);
    let updated = repo.update_active(existing.id, &params).await?.unwrap();

    assert_eq!(updated.id, existing.id);
    assert_eq!(updated.reason, "Repeat offence");
    assert_eq!(updated.moderator_id, UserId::new(99));
    assert!(updated.expires_at.is_none());

    Ok(())
}

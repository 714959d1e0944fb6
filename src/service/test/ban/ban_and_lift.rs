use super::*;

/// Tests banning and lifting by hand.
///
/// Expected: one active record while banned; lifted as manual
#[tokio::test]
async fn manual_ban_and_lift() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();

    let now = Utc::now();
    let params = BanParams {
        guild_id: GuildId::new(1),
        user_id: UserId::new(2),
        moderator_id: UserId::new(3),
        reason: "Spam".to_string(),
        expires_at: Some(now + Duration::days(7)),
    };

    let service = BanService::new(db, &discord);
    let ban = service.ban(&params, now).await?;
    assert!(service.is_actively_banned(params.guild_id, params.user_id, now).await?);

    assert!(service.lift(params.guild_id, params.user_id, now).await?);
    assert!(!service.is_actively_banned(params.guild_id, params.user_id, now).await?);

    let stored = BanRepository::new(db).get_by_id(ban.id).await?.unwrap();
    assert_eq!(stored.lift_reason, Some(LiftReason::Manual));
    assert!(!service.lift(params.guild_id, params.user_id, now).await?);

    Ok(())
}

/// Tests that a refused ban records nothing.
///
/// Expected: Err and no active ban
#[tokio::test]
async fn refused_ban_is_not_recorded() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    discord.fail(Action::Ban, ActuatorError::Forbidden("hierarchy".to_string()));

    let now = Utc::now();
    let params = BanParams {
        guild_id: GuildId::new(1),
        user_id: UserId::new(2),
        moderator_id: UserId::new(3),
        reason: "Spam".to_string(),
        expires_at: None,
    };

    let service = BanService::new(db, &discord);
    assert!(service.ban(&params, now).await.is_err());
    assert!(!service.is_actively_banned(params.guild_id, params.user_id, now).await?);

    Ok(())
}

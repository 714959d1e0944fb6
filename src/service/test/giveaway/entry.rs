use super::*;

/// Tests entering by reaction.
///
/// Expected: first reaction enters, a repeat, a bot and a wrong emoji do not
#[tokio::test]
async fn enters_each_user_once() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();

    let giveaway = GiveawayFactory::new(db, "1").build().await?;
    let message_id: MessageId = snowflake(&giveaway.message_id);

    let service = GiveawayService::new(db, &discord, &discord, &config);
    assert!(service.on_reaction(message_id, UserId::new(10), false, "🎉").await?);
    assert!(!service.on_reaction(message_id, UserId::new(10), false, "🎉").await?);
    assert!(!service.on_reaction(message_id, UserId::new(11), true, "🎉").await?);
    assert!(!service.on_reaction(message_id, UserId::new(12), false, "👍").await?);
    assert!(service.on_reaction(message_id, UserId::new(13), false, "🎉").await?);

    let stored = GiveawayRepository::new(db).get_by_id(giveaway.id).await?.unwrap();
    assert_eq!(stored.participants, users(&[10, 13]));

    Ok(())
}

/// Tests reactions on ended giveaways and unrelated messages.
///
/// Expected: Ok(false) for both
#[tokio::test]
async fn ignores_ended_and_unknown_messages() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();

    let ended = GiveawayFactory::new(db, "1").ended(vec![]).build().await?;

    let service = GiveawayService::new(db, &discord, &discord, &config);
    assert!(!service
        .on_reaction(snowflake(&ended.message_id), UserId::new(10), false, "🎉")
        .await?);
    assert!(!service
        .on_reaction(MessageId::new(424242), UserId::new(10), false, "🎉")
        .await?);

    Ok(())
}

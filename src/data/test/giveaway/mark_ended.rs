use super::*;

/// Tests that a giveaway can only be ended once and keeps its participants.
///
/// Expected: Ok(true) then Ok(false); winners from the first call stored
#[tokio::test]
async fn ends_exactly_once() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Giveaway)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let created = GiveawayFactory::new(db, "1")
        .participants(vec!["10".to_string(), "11".to_string()])
        .build()
        .await?;
    let repo = GiveawayRepository::new(db);
    let now = Utc::now();

    assert!(repo.mark_ended(created.id, &[UserId::new(11)], now).await?);
    assert!(!repo.mark_ended(created.id, &[UserId::new(10)], now).await?);

    let stored = repo.get_by_id(created.id).await?.unwrap();
    assert_eq!(stored.status, GiveawayStatus::Ended);
    assert_eq!(stored.winners, vec![UserId::new(11)]);
    assert_eq!(stored.participants, vec![UserId::new(10), UserId::new(11)]);
    assert!(stored.ended_at.is_some());

    Ok(())
}

/// Tests that rerolled winners can only be written to an ended giveaway.
///
/// Expected: Ok(false) while active, Ok(true) once ended
#[tokio::test]
async fn set_winners_requires_ended() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Giveaway)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let active = GiveawayFactory::new(db, "1").build().await?;
    let ended = GiveawayFactory::new(db, "1").ended(vec!["10".to_string()]).build().await?;
    let repo = GiveawayRepository::new(db);

    assert!(!repo.set_winners(active.id, &[UserId::new(12)]).await?);
    assert!(repo.set_winners(ended.id, &[UserId::new(12)]).await?);
    assert_eq!(
        repo.get_by_id(ended.id).await?.unwrap().winners,
        vec![UserId::new(12)]
    );

    Ok(())
}

/// Tests cancelling against ending.
///
/// Expected: only an active giveaway can be cancelled, and a cancelled one
/// can neither be ended nor given winners
#[tokio::test]
async fn cancels_only_active() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Giveaway)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let active = GiveawayFactory::new(db, "1")
        .participants(vec!["10".to_string()])
        .build()
        .await?;
    let ended = GiveawayFactory::new(db, "1").ended(vec!["10".to_string()]).build().await?;
    let repo = GiveawayRepository::new(db);
    let now = Utc::now();

    assert!(repo.mark_cancelled(active.id, now).await?);
    assert!(!repo.mark_cancelled(ended.id, now).await?);
    assert!(!repo.mark_ended(active.id, &[UserId::new(10)], now).await?);
    assert!(!repo.set_winners(active.id, &[UserId::new(10)]).await?);

    let stored = repo.get_by_id(active.id).await?.unwrap();
    assert_eq!(stored.status, GiveawayStatus::Cancelled);
    assert!(stored.winners.is_empty());
    assert_eq!(stored.participants, vec![UserId::new(10)]);

    Ok(())
}

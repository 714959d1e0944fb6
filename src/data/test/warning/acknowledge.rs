use super::*;

/// Tests acknowledging a warning found through its DM.
///
/// Expected: found by DM message, acknowledged once, second call is Ok(false)
#[tokio::test]
async fn acknowledges_once() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarningRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let warning = WarningRecordFactory::new(db, "1")
        .dm_message_id(Some("4242".to_string()))
        .build()
        .await?;

    let repo = WarningRepository::new(db);
    let found = repo
        .find_by_dm_message(id(&warning.user_id), MessageId::new(4242))
        .await?
        .unwrap();
    assert_eq!(found.id, warning.id);

    let now = Utc::now();
    assert!(repo.acknowledge(warning.id, now).await?);
    assert!(!repo.acknowledge(warning.id, now).await?);

    let stored = repo.get_by_id(warning.id).await?.unwrap();
    assert!(stored.acknowledged);
    assert_eq!(stored.acknowledged_at, Some(now));

    Ok(())
}

/// Tests that another member reacting to the same message ID does not match.
///
/// Expected: Ok(None)
#[tokio::test]
async fn dm_lookup_is_scoped_to_member() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarningRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    WarningRecordFactory::new(db, "1")
        .dm_message_id(Some("4242".to_string()))
        .build()
        .await?;

    let found = WarningRepository::new(db)
        .find_by_dm_message(UserId::new(1), MessageId::new(4242))
        .await?;

    assert!(found.is_none());

    Ok(())
}

/// Tests that a timeout cannot be marked applied after acknowledgment.
///
/// Expected: Ok(false) and timeout_applied stays false
#[tokio::test]
async fn timeout_not_applied_after_acknowledgment() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarningRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let warning = WarningRecordFactory::new(db, "1")
        .acknowledged(true)
        .build()
        .await?;

    let repo = WarningRepository::new(db);
    assert!(!repo.mark_timeout_applied(warning.id).await?);
    assert!(!repo.get_by_id(warning.id).await?.unwrap().timeout_applied);

    Ok(())
}

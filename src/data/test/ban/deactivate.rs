use super::*;

/// Tests deactivating an active ban.
///
/// Expected: Ok(true) and the record keeps its audit fields
#[tokio::test]
async fn deactivates_active_ban() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let ban = factory::create_ban_record(db, "1").await?;
    let now = Utc::now();

    let repo = BanRepository::new(db);
    assert!(repo.deactivate(ban.id, LiftReason::Expired, now).await?);

    let lifted = repo.get_by_id(ban.id).await?.unwrap();
    assert!(!lifted.active);
    assert_eq!(lifted.lift_reason, Some(LiftReason::Expired));
    assert_eq!(lifted.lifted_at, Some(now));
    assert_eq!(lifted.reason, ban.reason);

    Ok(())
}

/// Tests that a second deactivation does nothing.
///
/// Expected: Ok(false) and the first lift reason is kept
#[tokio::test]
async fn second_deactivation_is_a_no_op() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let ban = factory::create_ban_record(db, "1").await?;
    let repo = BanRepository::new(db);

    assert!(repo.deactivate(ban.id, LiftReason::Manual, Utc::now()).await?);
    assert!(!repo.deactivate(ban.id, LiftReason::Expired, Utc::now()).await?);

    let lifted = repo.get_by_id(ban.id).await?.unwrap();
    assert_eq!(lifted.lift_reason, Some(LiftReason::Manual));

    Ok(())
}

use super::*;
use test_utils::factory::ban_record::BanRecordFactory;

/// Tests that only active, expired, temporary bans are returned in id order.
///
/// Expected: the two expired bans, oldest id first
#[tokio::test]
async fn returns_expired_active_bans_in_id_order() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let first = BanRecordFactory::new(db, "1")
        .expires_at(Some(now - Duration::hours(2)))
        .build()
        .await?;
    let second = BanRecordFactory::new(db, "1")
        .expires_at(Some(now - Duration::minutes(1)))
        .build()
        .await?;
    // Still running
    BanRecordFactory::new(db, "1")
        .expires_at(Some(now + Duration::hours(1)))
        .build()
        .await?;
    // Permanent
    BanRecordFactory::new(db, "1").build().await?;
    // Already lifted
    BanRecordFactory::new(db, "1")
        .expires_at(Some(now - Duration::hours(1)))
        .active(false)
        .build()
        .await?;

    let expired = BanRepository::new(db).find_expired(now).await?;

    let ids: Vec<i32> = expired.iter().map(|ban| ban.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    Ok(())
}

/// Tests that a row with a malformed user ID is skipped instead of failing the query.
///
/// Expected: only the valid expired ban is returned
#[tokio::test]
async fn skips_malformed_rows() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::BanRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    BanRecordFactory::new(db, "1")
        .user_id("not-a-snowflake")
        .expires_at(Some(now - Duration::minutes(5)))
        .build()
        .await?;
    let valid = BanRecordFactory::new(db, "1")
        .expires_at(Some(now - Duration::minutes(5)))
        .build()
        .await?;

    let expired = BanRepository::new(db).find_expired(now).await?;

    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].id, valid.id);

    Ok(())
}

use super::*;

/// Tests that warnings for the same member are numbered per guild.
///
/// Expected: sequences 1 and 2 in the first guild, 1 in the second
#[tokio::test]
async fn numbers_warnings_per_member_and_guild() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::WarningRecord)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WarningRepository::new(db);
    let params = |guild: u64| WarnParams {
        guild_id: GuildId::new(guild),
        user_id: UserId::new(7),
        moderator_id: UserId::new(8),
        reason: "Off-topic".to_string(),
    };

    let first = repo.create(&params(1), Utc::now()).await?;
    let second = repo.create(&params(1), Utc::now()).await?;
    let elsewhere = repo.create(&params(2), Utc::now()).await?;

    assert_eq!(first.sequence, 1);
    assert_eq!(second.sequence, 2);
    assert_eq!(elsewhere.sequence, 1);
    assert!(!second.acknowledged);
    assert!(second.dm_message_id.is_none());

    Ok(())
}

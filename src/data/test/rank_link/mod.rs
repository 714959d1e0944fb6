use crate::{data::rank_link::RankLinkRepository, error::AppError, model::rank::RankTier};
use chrono::Utc;
use serenity::all::{GuildId, UserId};
use test_utils::builder::TestBuilder;

/// Tests relinking a member to a new handle.
///
/// Expected: one link with the new handle and its sync state cleared
#[tokio::test]
async fn upsert_replaces_handle() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RankLink)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RankLinkRepository::new(db);
    let first = repo
        .upsert(GuildId::new(1), UserId::new(2), "Old#0001")
        .await?;
    repo.record_sync(first.id, RankTier::Gold, Utc::now()).await?;

    let relinked = repo
        .upsert(GuildId::new(1), UserId::new(2), "New#0002")
        .await?;

    assert_eq!(relinked.id, first.id);
    assert_eq!(relinked.handle, "New#0002");
    assert!(relinked.last_synced_rank.is_none());
    assert_eq!(repo.get_by_guild(GuildId::new(1)).await?.len(), 1);

    Ok(())
}

/// Tests recording a sync result.
///
/// Expected: tier and timestamp stored
#[tokio::test]
async fn records_synced_tier() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::RankLink)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RankLinkRepository::new(db);
    let link = repo
        .upsert(GuildId::new(1), UserId::new(2), "Player#1234")
        .await?;
    let now = Utc::now();

    repo.record_sync(link.id, RankTier::Diamond, now).await?;

    let stored = repo.get_by_id(link.id).await?.unwrap();
    assert_eq!(stored.last_synced_rank, Some(RankTier::Diamond));
    assert!(stored.last_synced_at.is_some());

    Ok(())
}

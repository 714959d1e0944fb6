use crate::{data::stream_link::StreamLinkRepository, error::AppError};
use chrono::Utc;
use serenity::all::{GuildId, UserId};
use test_utils::builder::TestBuilder;

/// Tests that handles are normalised and state transitions are stored.
///
/// Expected: lowercase handle; live flags written by set_state
#[tokio::test]
async fn stores_lowercase_handle_and_state() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::StreamLink)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = StreamLinkRepository::new(db);
    let link = repo
        .upsert(GuildId::new(1), UserId::new(2), "  ShroudTV ", Utc::now())
        .await?;
    assert_eq!(link.twitch_handle, "shroudtv");
    assert!(!link.live);

    repo.set_state(link.id, true, true, Utc::now()).await?;

    let stored = repo.get_by_id(link.id).await?.unwrap();
    assert!(stored.live);
    assert!(stored.role_applied);

    assert!(repo.delete(GuildId::new(1), UserId::new(2)).await?);
    assert!(repo.get_by_id(link.id).await?.is_none());

    Ok(())
}

use super::*;

/// Tests creating a giveaway and finding it by its message.
///
/// Expected: active giveaway with no participants, found by message ID
#[tokio::test]
async fn creates_active_giveaway() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Giveaway)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let params = StartGiveawayParams {
        guild_id: GuildId::new(1),
        channel_id: ChannelId::new(2),
        host_id: UserId::new(3),
        prize: "Nitro".to_string(),
        winners_count: 2,
        required_role_id: Some(RoleId::new(4)),
        ends_at: now + Duration::hours(2),
    };

    let repo = GiveawayRepository::new(db);
    let giveaway = repo.create(&params, MessageId::new(500), now).await?;

    assert_eq!(giveaway.status, GiveawayStatus::Active);
    assert!(giveaway.participants.is_empty());
    assert_eq!(giveaway.winners_count, 2);

    let found = repo.get_by_message(MessageId::new(500)).await?.unwrap();
    assert_eq!(found.id, giveaway.id);
    assert_eq!(found.required_role_id, params.required_role_id);

    Ok(())
}

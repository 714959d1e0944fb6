use super::*;

fn params(winners_count: u32, ends_in: Duration) -> StartGiveawayParams {
    StartGiveawayParams {
        guild_id: GuildId::new(1),
        channel_id: ChannelId::new(2),
        host_id: UserId::new(3),
        prize: "Steam key".to_string(),
        winners_count,
        required_role_id: None,
        ends_at: Utc::now() + ends_in,
    }
}

/// Tests starting a giveaway.
///
/// Expected: running notice posted and the giveaway stored against that message
#[tokio::test]
async fn posts_and_records_giveaway() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();

    let giveaway = GiveawayService::new(db, &discord, &discord, &config)
        .start_giveaway(&params(1, Duration::hours(1)), Utc::now())
        .await?;

    let posted = discord.calls_of(Action::SendMessage);
    assert_eq!(posted.len(), 1);
    let Call::SendMessage { notice, .. } = &posted[0] else {
        panic!("expected a message");
    };
    assert!(notice.description.contains("Steam key"));

    let stored = GiveawayRepository::new(db)
        .get_by_message(giveaway.message_id)
        .await?
        .unwrap();
    assert_eq!(stored.status, GiveawayStatus::Active);

    Ok(())
}

/// Tests rejected parameters.
///
/// Expected: BadRequest and nothing posted
#[tokio::test]
async fn rejects_invalid_parameters() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();
    let service = GiveawayService::new(db, &discord, &discord, &config);

    let no_winners = service
        .start_giveaway(&params(0, Duration::hours(1)), Utc::now())
        .await;
    let already_over = service
        .start_giveaway(&params(1, Duration::minutes(-1)), Utc::now())
        .await;

    assert!(matches!(no_winners, Err(AppError::BadRequest(_))));
    assert!(matches!(already_over, Err(AppError::BadRequest(_))));
    assert!(discord.calls().is_empty());

    Ok(())
}

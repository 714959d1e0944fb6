use super::*;

/// Tests ending a due giveaway with more entrants than winners.
///
/// Expected: two distinct winners drawn from the entrants, notice edited,
/// one announcement, and a second sweep does nothing
#[tokio::test]
async fn ends_due_giveaway_once() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();
    let mut rng = StdRng::seed_from_u64(11);

    let now = Utc::now();
    let giveaway = GiveawayFactory::new(db, "1")
        .winners_count(2)
        .participants(entrants(&[10, 11, 12]))
        .ends_at(now - Duration::seconds(1))
        .build()
        .await?;

    let service = GiveawayService::new(db, &discord, &discord, &config);
    service.end_due(now, &Shutdown::never(), &mut rng).await?;
    service.end_due(now, &Shutdown::never(), &mut rng).await?;

    let stored = GiveawayRepository::new(db).get_by_id(giveaway.id).await?.unwrap();
    assert_eq!(stored.status, GiveawayStatus::Ended);
    assert_eq!(stored.winners.len(), 2);
    assert_ne!(stored.winners[0], stored.winners[1]);
    assert!(stored.winners.iter().all(|w| users(&[10, 11, 12]).contains(w)));
    assert_eq!(stored.participants, users(&[10, 11, 12]));

    assert_eq!(discord.count(Action::EditMessage), 1);
    assert_eq!(discord.count(Action::SendMessage), 1);

    Ok(())
}

/// Tests a giveaway with fewer entrants than winners.
///
/// Expected: every entrant wins
#[tokio::test]
async fn everyone_wins_when_entrants_are_scarce() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();
    let mut rng = StdRng::seed_from_u64(3);

    let giveaway = GiveawayFactory::new(db, "1")
        .winners_count(5)
        .participants(entrants(&[10, 11, 12]))
        .build()
        .await?;

    let mut winners = GiveawayService::new(db, &discord, &discord, &config)
        .end_early(giveaway.id, Utc::now(), &mut rng)
        .await?
        .unwrap();
    winners.sort();

    assert_eq!(winners, users(&[10, 11, 12]));

    Ok(())
}

/// Tests the required role.
///
/// Expected: only the entrant who holds the role and is still in the guild wins
#[tokio::test]
async fn draws_only_eligible_entrants() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();
    let mut rng = StdRng::seed_from_u64(5);
    let guild_id = GuildId::new(1);
    let required = RoleId::new(60);
    discord.add_member(guild_id, UserId::new(10), vec![required]);
    discord.add_member(guild_id, UserId::new(11), vec![]);

    let giveaway = GiveawayFactory::new(db, guild_id.to_string())
        .winners_count(3)
        .required_role_id(Some(required.to_string()))
        .participants(entrants(&[10, 11, 12]))
        .build()
        .await?;

    let winners = GiveawayService::new(db, &discord, &discord, &config)
        .end_early(giveaway.id, Utc::now(), &mut rng)
        .await?;

    assert_eq!(winners, Some(users(&[10])));

    Ok(())
}

/// Tests ending a giveaway nobody entered.
///
/// Expected: ended with no winners and a no-winner announcement
#[tokio::test]
async fn ends_without_entrants() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();
    let mut rng = StdRng::seed_from_u64(1);

    let giveaway = GiveawayFactory::new(db, "1")
        .ends_at(Utc::now() - Duration::minutes(1))
        .build()
        .await?;

    GiveawayService::new(db, &discord, &discord, &config)
        .end_due(Utc::now(), &Shutdown::never(), &mut rng)
        .await?;

    let stored = GiveawayRepository::new(db).get_by_id(giveaway.id).await?.unwrap();
    assert_eq!(stored.status, GiveawayStatus::Ended);
    assert!(stored.winners.is_empty());
    assert_eq!(discord.count(Action::SendMessage), 1);

    Ok(())
}

/// Tests a giveaway whose message was deleted.
///
/// Expected: ended with winners stored but nothing announced
#[tokio::test]
async fn deleted_message_ends_silently() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    discord.fail(Action::EditMessage, ActuatorError::NotFound("message".to_string()));
    let config = GiveawayConfig::default();
    let mut rng = StdRng::seed_from_u64(2);

    let giveaway = GiveawayFactory::new(db, "1")
        .participants(entrants(&[10]))
        .ends_at(Utc::now() - Duration::minutes(1))
        .build()
        .await?;

    GiveawayService::new(db, &discord, &discord, &config)
        .end_due(Utc::now(), &Shutdown::never(), &mut rng)
        .await?;

    let stored = GiveawayRepository::new(db).get_by_id(giveaway.id).await?.unwrap();
    assert_eq!(stored.status, GiveawayStatus::Ended);
    assert_eq!(stored.winners, users(&[10]));
    assert_eq!(discord.count(Action::SendMessage), 0);

    Ok(())
}

/// Tests a transient failure editing the notice.
///
/// Expected: giveaway stays active and ends on the next sweep
#[tokio::test]
async fn transient_edit_failure_retries_next_sweep() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    discord.fail_once(Action::EditMessage, ActuatorError::Transient("gateway".to_string()));
    let config = GiveawayConfig::default();
    let mut rng = StdRng::seed_from_u64(4);

    let giveaway = GiveawayFactory::new(db, "1")
        .participants(entrants(&[10]))
        .ends_at(Utc::now() - Duration::minutes(1))
        .build()
        .await?;

    let service = GiveawayService::new(db, &discord, &discord, &config);
    let repo = GiveawayRepository::new(db);

    service.end_due(Utc::now(), &Shutdown::never(), &mut rng).await?;
    assert!(repo.get_by_id(giveaway.id).await?.unwrap().is_active());
    assert_eq!(discord.count(Action::SendMessage), 0);

    service.end_due(Utc::now(), &Shutdown::never(), &mut rng).await?;
    assert!(!repo.get_by_id(giveaway.id).await?.unwrap().is_active());
    assert_eq!(discord.count(Action::SendMessage), 1);

    Ok(())
}

/// Tests ending early twice.
///
/// Expected: Some on the first call, None on the second, NotFound for an unknown ID
#[tokio::test]
async fn end_early_is_idempotent() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();
    let mut rng = StdRng::seed_from_u64(6);

    let giveaway = GiveawayFactory::new(db, "1")
        .participants(entrants(&[10]))
        .build()
        .await?;

    let service = GiveawayService::new(db, &discord, &discord, &config);
    let now = Utc::now();
    assert!(service.end_early(giveaway.id, now, &mut rng).await?.is_some());
    assert!(service.end_early(giveaway.id, now, &mut rng).await?.is_none());
    assert!(matches!(
        service.end_early(giveaway.id + 100, now, &mut rng).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(discord.count(Action::SendMessage), 1);

    Ok(())
}

/// Tests cancelling a running giveaway.
///
/// Expected: cancelled without winners, no announcement, second cancel is a no-op
#[tokio::test]
async fn cancel_ends_without_winners() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();

    let giveaway = GiveawayFactory::new(db, "1")
        .participants(entrants(&[10, 11]))
        .build()
        .await?;

    let service = GiveawayService::new(db, &discord, &discord, &config);
    assert!(service.cancel(giveaway.id, Utc::now()).await?);
    assert!(!service.cancel(giveaway.id, Utc::now()).await?);

    let stored = GiveawayRepository::new(db).get_by_id(giveaway.id).await?.unwrap();
    assert_eq!(stored.status, GiveawayStatus::Cancelled);
    assert!(stored.winners.is_empty());
    assert_eq!(stored.participants, users(&[10, 11]));
    assert_eq!(discord.count(Action::EditMessage), 1);
    assert_eq!(discord.count(Action::SendMessage), 0);

    Ok(())
}

/// Tests the countdown refresh.
///
/// Expected: running giveaways are edited and nothing in the store changes
#[tokio::test]
async fn countdown_edits_without_writing() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();

    let running = GiveawayFactory::new(db, "1")
        .participants(entrants(&[10, 11]))
        .ends_at(Utc::now() + Duration::hours(2))
        .build()
        .await?;
    GiveawayFactory::new(db, "1").ended(vec![]).build().await?;

    let repo = GiveawayRepository::new(db);
    let before = repo.get_by_id(running.id).await?.unwrap();

    GiveawayService::new(db, &discord, &discord, &config)
        .countdown(Utc::now(), &Shutdown::never())
        .await?;

    assert_eq!(discord.count(Action::EditMessage), 1);
    assert_eq!(repo.get_by_id(running.id).await?.unwrap(), before);

    Ok(())
}

/// Tests a giveaway whose message Discord refuses to let the bot edit.
///
/// Expected: ended on the first sweep without an announcement, never redrawn
#[tokio::test]
async fn forbidden_edit_ends_silently() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    discord.fail(Action::EditMessage, ActuatorError::Forbidden("missing access".to_string()));
    let config = GiveawayConfig::default();
    let mut rng = StdRng::seed_from_u64(8);

    let giveaway = GiveawayFactory::new(db, "1")
        .participants(entrants(&[10, 11]))
        .ends_at(Utc::now() - Duration::minutes(1))
        .build()
        .await?;

    let service = GiveawayService::new(db, &discord, &discord, &config);
    for _ in 0..3 {
        service.end_due(Utc::now(), &Shutdown::never(), &mut rng).await?;
    }

    let stored = GiveawayRepository::new(db).get_by_id(giveaway.id).await?.unwrap();
    assert_eq!(stored.status, GiveawayStatus::Ended);
    assert_eq!(stored.winners.len(), 1);
    assert_eq!(discord.count(Action::EditMessage), 1);
    assert_eq!(discord.count(Action::SendMessage), 0);

    Ok(())
}

/// Tests the sweep and an early end closing the same giveaway at once.
///
/// Expected: one announcement, and the message finally shows the winners
/// that were stored and announced
#[tokio::test]
async fn concurrent_end_keeps_message_consistent() -> Result<(), AppError> {
    let test = giveaway_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = GiveawayConfig::default();
    let mut sweep_rng = StdRng::seed_from_u64(1);
    let mut command_rng = StdRng::seed_from_u64(2);

    let ids: Vec<u64> = (10..60).collect();
    let giveaway = GiveawayFactory::new(db, "1")
        .winners_count(1)
        .participants(entrants(&ids))
        .ends_at(Utc::now() - Duration::seconds(1))
        .build()
        .await?;

    let service = GiveawayService::new(db, &discord, &discord, &config);
    let now = Utc::now();
    let never = Shutdown::never();
    let (swept, ended_early) = tokio::join!(
        service.end_due(now, &never, &mut sweep_rng),
        service.end_early(giveaway.id, now, &mut command_rng),
    );
    swept?;
    ended_early?;

    let stored = GiveawayRepository::new(db).get_by_id(giveaway.id).await?.unwrap();
    assert_eq!(stored.status, GiveawayStatus::Ended);
    assert_eq!(stored.winners.len(), 1);

    let announcements = discord.calls_of(Action::SendMessage);
    assert_eq!(announcements.len(), 1);
    assert!(matches!(
        &announcements[0],
        Call::SendMessage { notice, .. }
            if *notice == render::announcement(&stored.prize, &stored.winners)
    ));

    let edits = discord.calls_of(Action::EditMessage);
    let Some(Call::EditMessage { notice, .. }) = edits.last() else {
        panic!("expected the giveaway message to be edited");
    };
    assert_eq!(*notice, render::ended(&Listing::from(&stored), &stored.winners));

    Ok(())
}

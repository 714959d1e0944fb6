use super::*;

/// Tests that the first rollover for a guild only records the week.
///
/// Expected: marker set, profiles untouched, no reports
#[tokio::test]
async fn first_run_records_week_only() -> Result<(), AppError> {
    let test = moderator_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = ModeratorConfig::default();
    let settings = moderated_guild(db).await?;

    let profile = ModeratorPointProfileFactory::new(db, settings.guild_id.to_string())
        .weekly_total(30.0)
        .build()
        .await?;

    let now = Utc::now();
    ModeratorService::new(db, &discord, &discord, &config)
        .weekly_rollover(now, &Shutdown::never())
        .await?;

    let marker = TaskMarkerRepository::new(db)
        .get(ROLLOVER_MARKER, &settings.guild_id.to_string())
        .await?;
    assert_eq!(marker, Some(crate::model::moderator::iso_week(now)));
    let stored = ModeratorRepository::new(db)
        .get(settings.guild_id, snowflake(&profile.user_id))
        .await?
        .unwrap();
    assert_eq!(stored.weekly_total, 30.0);
    assert_eq!(discord.count(Action::DirectMessage), 0);

    Ok(())
}

/// Tests closing a week.
///
/// Expected: improvers get the bonus, totals shift to the previous week,
/// every moderator gets a report, and a second run changes nothing
#[tokio::test]
async fn closes_week_once() -> Result<(), AppError> {
    let test = moderator_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = ModeratorConfig::default();
    let settings = moderated_guild(db).await?;
    let guild_id = settings.guild_id;

    let improved = ModeratorPointProfileFactory::new(db, guild_id.to_string())
        .points(50.0)
        .weekly_total(30.0)
        .previous_weekly_total(20.0)
        .build()
        .await?;
    let declined = ModeratorPointProfileFactory::new(db, guild_id.to_string())
        .points(50.0)
        .weekly_total(10.0)
        .previous_weekly_total(20.0)
        .build()
        .await?;

    let now = Utc::now();
    TaskMarkerRepository::new(db)
        .set(ROLLOVER_MARKER, &guild_id.to_string(), "2000-W01", now)
        .await?;

    let service = ModeratorService::new(db, &discord, &discord, &config);
    service.weekly_rollover(now, &Shutdown::never()).await?;
    service.weekly_rollover(now, &Shutdown::never()).await?;

    let repo = ModeratorRepository::new(db);
    let improved = repo.get(guild_id, snowflake(&improved.user_id)).await?.unwrap();
    assert_eq!(improved.points, 50.0 + config.improvement_bonus);
    assert_eq!(improved.previous_weekly_total, 30.0);
    assert_eq!(improved.weekly_total, 0.0);

    let declined = repo.get(guild_id, snowflake(&declined.user_id)).await?.unwrap();
    assert_eq!(declined.points, 50.0);
    assert_eq!(declined.previous_weekly_total, 10.0);

    assert_eq!(discord.count(Action::DirectMessage), 2);
    assert_eq!(
        TaskMarkerRepository::new(db)
            .get(ROLLOVER_MARKER, &guild_id.to_string())
            .await?,
        Some(crate::model::moderator::iso_week(now))
    );

    Ok(())
}

/// Tests that a closed DM does not block the rollover.
///
/// Expected: profile rolled over and the guild marker advanced
#[tokio::test]
async fn undeliverable_report_still_rolls_over() -> Result<(), AppError> {
    let test = moderator_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = ModeratorConfig::default();
    let settings = moderated_guild(db).await?;
    let guild_id = settings.guild_id;

    let profile = ModeratorPointProfileFactory::new(db, guild_id.to_string())
        .weekly_total(5.0)
        .build()
        .await?;
    discord.close_dms(snowflake(&profile.user_id));

    let now = Utc::now();
    TaskMarkerRepository::new(db)
        .set(ROLLOVER_MARKER, &guild_id.to_string(), "2000-W01", now)
        .await?;

    ModeratorService::new(db, &discord, &discord, &config)
        .weekly_rollover(now, &Shutdown::never())
        .await?;

    let stored = ModeratorRepository::new(db)
        .get(guild_id, snowflake(&profile.user_id))
        .await?
        .unwrap();
    assert_eq!(stored.previous_weekly_total, 5.0);
    assert_eq!(
        TaskMarkerRepository::new(db)
            .get(ROLLOVER_MARKER, &guild_id.to_string())
            .await?,
        Some(crate::model::moderator::iso_week(now))
    );

    Ok(())
}

/// Tests the per-reason breakdown in the weekly report and log pruning.
///
/// Expected: report lists last week's reasons by points; events past the
/// retention window are deleted once the week closes
#[tokio::test]
async fn report_breaks_down_closed_week() -> Result<(), AppError> {
    let test = moderator_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = ModeratorConfig::default();
    let settings = moderated_guild(db).await?;
    let guild_id = settings.guild_id;

    let profile = ModeratorPointProfileFactory::new(db, guild_id.to_string())
        .weekly_total(16.0)
        .build()
        .await?;
    let user_id: UserId = snowflake(&profile.user_id);

    let now = Utc::now();
    let last_week = crate::model::moderator::week_start(now) - Duration::days(3);
    let events = ModeratorEventRepository::new(db);
    events.record(guild_id, user_id, 0.5, "Message", last_week).await?;
    events.record(guild_id, user_id, 0.5, "Message", last_week).await?;
    events.record(guild_id, user_id, 15.0, "Poll created", last_week).await?;
    let ancient = now - config.event_retention - Duration::days(1);
    events.record(guild_id, user_id, 10.0, "Voice activity", ancient).await?;

    TaskMarkerRepository::new(db)
        .set(ROLLOVER_MARKER, &guild_id.to_string(), "2000-W01", now)
        .await?;

    ModeratorService::new(db, &discord, &discord, &config)
        .weekly_rollover(now, &Shutdown::never())
        .await?;

    let reports = discord.calls_of(Action::DirectMessage);
    assert_eq!(reports.len(), 1);
    let Call::DirectMessage { notice, .. } = &reports[0] else {
        panic!("expected a direct message");
    };
    let breakdown = notice
        .fields
        .iter()
        .find(|(name, _)| name == "Breakdown")
        .map(|(_, value)| value.as_str());
    assert_eq!(
        breakdown,
        Some("**Poll created:** 15.0 points (1 times)\n**Message:** 1.0 points (2 times)")
    );

    let kept = events
        .find_between(guild_id, user_id, ancient - Duration::days(1), now)
        .await?;
    assert_eq!(kept.len(), 3);
    assert!(kept.iter().all(|event| event.reason != "Voice activity"));

    Ok(())
}

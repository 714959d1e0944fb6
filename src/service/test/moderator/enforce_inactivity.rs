use super::*;

/// Tests the inactivity penalty.
///
/// Expected: idle moderators penalised once per window, active moderators
/// and former moderators untouched, new moderators get a profile
#[tokio::test]
async fn penalises_idle_moderators_once() -> Result<(), AppError> {
    let test = moderator_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = ModeratorConfig::default();
    let settings = moderated_guild(db).await?;
    let guild_id = settings.guild_id;
    let role = RoleId::new(MODERATOR_ROLE);

    let now = Utc::now();
    let idle = ModeratorPointProfileFactory::new(db, guild_id.to_string())
        .points(100.0)
        .last_point_at(Some(now - Duration::hours(30)))
        .build()
        .await?;
    let active = ModeratorPointProfileFactory::new(db, guild_id.to_string())
        .points(100.0)
        .last_point_at(Some(now - Duration::hours(2)))
        .build()
        .await?;
    let former = ModeratorPointProfileFactory::new(db, guild_id.to_string())
        .points(100.0)
        .build()
        .await?;
    let newcomer = UserId::new(555);
    discord.add_member(guild_id, snowflake(&idle.user_id), vec![role]);
    discord.add_member(guild_id, snowflake(&active.user_id), vec![role]);
    discord.add_member(guild_id, snowflake(&former.user_id), vec![]);
    discord.add_member(guild_id, newcomer, vec![role]);

    let service = ModeratorService::new(db, &discord, &discord, &config);
    service.enforce_inactivity(now, &Shutdown::never()).await?;
    service
        .enforce_inactivity(now + Duration::hours(1), &Shutdown::never())
        .await?;

    let repo = ModeratorRepository::new(db);
    let points = |profile: Option<crate::model::moderator::ModeratorProfile>| {
        profile.map(|p| p.points).unwrap_or(-1.0)
    };
    assert_eq!(
        points(repo.get(guild_id, snowflake(&idle.user_id)).await?),
        100.0 - config.inactivity_penalty
    );
    assert_eq!(points(repo.get(guild_id, snowflake(&active.user_id)).await?), 100.0);
    assert_eq!(points(repo.get(guild_id, snowflake(&former.user_id)).await?), 100.0);

    let created = repo.get(guild_id, newcomer).await?.unwrap();
    assert_eq!(created.points, 0.0);
    assert!(created.last_penalty_at.is_some());

    Ok(())
}

/// Tests that the penalty applies again once the window has passed.
///
/// Expected: a second penalty a full window later
#[tokio::test]
async fn penalises_again_next_window() -> Result<(), AppError> {
    let test = moderator_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = ModeratorConfig::default();
    let settings = moderated_guild(db).await?;
    let guild_id = settings.guild_id;

    let now = Utc::now();
    let idle = ModeratorPointProfileFactory::new(db, guild_id.to_string())
        .points(100.0)
        .build()
        .await?;
    discord.add_member(guild_id, snowflake(&idle.user_id), vec![RoleId::new(MODERATOR_ROLE)]);

    let service = ModeratorService::new(db, &discord, &discord, &config);
    service.enforce_inactivity(now, &Shutdown::never()).await?;
    service
        .enforce_inactivity(
            now + config.inactivity_window + Duration::minutes(1),
            &Shutdown::never(),
        )
        .await?;

    let profile = ModeratorRepository::new(db)
        .get(guild_id, snowflake(&idle.user_id))
        .await?
        .unwrap();
    assert_eq!(profile.points, 100.0 - 2.0 * config.inactivity_penalty);

    Ok(())
}

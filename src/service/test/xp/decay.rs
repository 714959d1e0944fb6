use super::*;

/// Tests decaying idle profiles.
///
/// Expected: idle profile loses the decay amount, active one is untouched,
/// and the idle profile's last gain does not move
#[tokio::test]
async fn decays_only_idle_profiles() -> Result<(), AppError> {
    let test = xp_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = XpConfig::default();
    let guild_id = enabled_guild(db).await?;

    let now = Utc::now();
    let idle = XpProfileFactory::new(db, guild_id.to_string())
        .xp(60)
        .last_gain_at(now - Duration::hours(6))
        .build()
        .await?;
    let active = XpProfileFactory::new(db, guild_id.to_string())
        .xp(60)
        .last_gain_at(now - Duration::minutes(10))
        .build()
        .await?;

    let repo = XpRepository::new(db);
    let before = repo.get(guild_id, snowflake(&idle.user_id)).await?.unwrap();

    XpService::new(db, &discord, &discord, &config)
        .decay(now, &Shutdown::never())
        .await?;

    let after = repo.get(guild_id, snowflake(&idle.user_id)).await?.unwrap();
    assert_eq!(after.xp, 60 - config.decay_amount);
    assert_eq!(after.last_gain_at, before.last_gain_at);
    assert_eq!(
        repo.get(guild_id, snowflake(&active.user_id)).await?.unwrap().xp,
        60
    );

    Ok(())
}

/// Tests that decay stops at zero and then leaves the profile alone.
///
/// Expected: XP floored at 0; second run does not write
#[tokio::test]
async fn floors_at_zero() -> Result<(), AppError> {
    let test = xp_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = XpConfig::default();
    let guild_id = enabled_guild(db).await?;

    let now = Utc::now();
    let idle = XpProfileFactory::new(db, guild_id.to_string())
        .xp(10)
        .last_gain_at(now - Duration::days(1))
        .build()
        .await?;

    let service = XpService::new(db, &discord, &discord, &config);
    service.decay(now, &Shutdown::never()).await?;
    service.decay(now, &Shutdown::never()).await?;

    let profile = XpRepository::new(db)
        .get(guild_id, snowflake(&idle.user_id))
        .await?
        .unwrap();
    assert_eq!(profile.xp, 0);
    assert_eq!(profile.revision, 1);

    Ok(())
}

/// Tests decay across a level threshold.
///
/// Expected: level drops to 1 and the level roles follow
#[tokio::test]
async fn level_down_swaps_level_role() -> Result<(), AppError> {
    let test = xp_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = XpConfig::default();
    let guild_id = enabled_guild(db).await?;

    let now = Utc::now();
    let idle = XpProfileFactory::new(db, guild_id.to_string())
        .xp(110)
        .level(2)
        .last_gain_at(now - Duration::hours(8))
        .build()
        .await?;
    let user_id: UserId = snowflake(&idle.user_id);
    let level_one = discord.add_role(guild_id, "Level 1");
    let level_two = discord.add_role(guild_id, "Level 2");
    discord.add_member(guild_id, user_id, vec![level_two]);

    XpService::new(db, &discord, &discord, &config)
        .decay(now, &Shutdown::never())
        .await?;

    let profile = XpRepository::new(db).get(guild_id, user_id).await?.unwrap();
    assert_eq!(profile.level, 1);
    assert_eq!(discord.roles_of(guild_id, user_id), vec![level_one]);

    Ok(())
}

/// Tests that guilds with XP disabled do not decay.
///
/// Expected: XP unchanged
#[tokio::test]
async fn skips_disabled_guilds() -> Result<(), AppError> {
    let test = xp_test().await;
    let db = test.db.as_ref().unwrap();
    let discord = MockDiscord::new();
    let config = XpConfig::default();
    let settings = factory::guild_settings::GuildSettingsFactory::new(db)
        .xp_enabled(false)
        .build()
        .await?;

    let now = Utc::now();
    let idle = XpProfileFactory::new(db, settings.guild_id.clone())
        .xp(60)
        .last_gain_at(now - Duration::days(1))
        .build()
        .await?;

    XpService::new(db, &discord, &discord, &config)
        .decay(now, &Shutdown::never())
        .await?;

    let profile = XpRepository::new(db)
        .get(snowflake(&settings.guild_id), snowflake(&idle.user_id))
        .await?
        .unwrap();
    assert_eq!(profile.xp, 60);

    Ok(())
}

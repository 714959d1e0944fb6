//! Live-stream status polling: the live role and go-live announcements.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::{
    actuator::{
        stream::{StreamProvider, MAX_HANDLES_PER_REQUEST},
        ChatActuator, GuildDirectory,
    },
    data::{guild_settings::GuildSettingsRepository, stream_link::StreamLinkRepository},
    error::AppError,
    model::{
        guild_settings::{Feature, GuildSettings},
        notice::Notice,
        stream::{LiveStream, StreamLink},
    },
    scheduler::shutdown::Shutdown,
    service::{isolate, role_catalog::RoleCatalog},
};

const TWITCH_PURPLE: u32 = 0x9146FF;

pub struct StreamService<'a> {
    db: &'a DatabaseConnection,
    actuator: &'a dyn ChatActuator,
    directory: &'a dyn GuildDirectory,
    provider: &'a dyn StreamProvider,
}

impl<'a> StreamService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        actuator: &'a dyn ChatActuator,
        directory: &'a dyn GuildDirectory,
        provider: &'a dyn StreamProvider,
    ) -> Self {
        Self {
            db,
            actuator,
            directory,
            provider,
        }
    }

    /// Polls live status for every linked channel and applies transitions.
    ///
    /// Handles are queried in batches; a failed batch skips only its own
    /// links until the next poll.
    pub async fn poll(&self, now: DateTime<Utc>, shutdown: &Shutdown) -> Result<(), AppError> {
        let guilds = GuildSettingsRepository::new(self.db)
            .get_enabled(Feature::StreamAlerts)
            .await?;

        for settings in guilds {
            let links = StreamLinkRepository::new(self.db)
                .get_by_guild(settings.guild_id)
                .await?;

            for batch in links.chunks(MAX_HANDLES_PER_REQUEST) {
                if shutdown.is_requested() {
                    return Ok(());
                }

                let handles: Vec<String> =
                    batch.iter().map(|link| link.twitch_handle.clone()).collect();
                let live = match self.provider.fetch_live_status(&handles).await {
                    Ok(live) => live,
                    Err(e) => {
                        tracing::warn!(
                            "Stream status for {} links in guild {} unavailable: {}",
                            batch.len(),
                            settings.guild_id,
                            e
                        );
                        continue;
                    }
                };

                self.apply_batch(&settings, batch, &live, now, shutdown)
                    .await?;
            }
        }

        Ok(())
    }

    pub(crate) async fn apply_batch(
        &self,
        settings: &GuildSettings,
        batch: &[StreamLink],
        live: &HashMap<String, LiveStream>,
        now: DateTime<Utc>,
        shutdown: &Shutdown,
    ) -> Result<(), AppError> {
        for link in batch {
            if shutdown.is_requested() {
                break;
            }

            // The link may have been removed or relinked while the batch was
            // being fetched.
            let Some(current) = StreamLinkRepository::new(self.db)
                .get_by_id(link.id)
                .await?
            else {
                continue;
            };
            if current.twitch_handle != link.twitch_handle {
                continue;
            }

            let result = self
                .reconcile(settings, &current, live.get(&current.twitch_handle), now)
                .await;
            isolate("stream_poll", format_args!("stream link {}", link.id), result)?;
        }

        Ok(())
    }

    /// Moves one link towards the observed state.
    ///
    /// | observed | live | role_applied | action |
    /// |---|---|---|---|
    /// | live | false | - | grant role, announce, mark live |
    /// | live | true | - | nothing |
    /// | offline | true | - | revoke role if applied, clear both |
    ///
    /// A link that is live without the role is one whose grant Discord
    /// refused for good; it waits for the stream to end.
    pub async fn reconcile(
        &self,
        settings: &GuildSettings,
        link: &StreamLink,
        stream: Option<&LiveStream>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        match stream {
            Some(_) if link.live => Ok(()),
            Some(stream) => self.go_live(settings, link, stream, now).await,
            None if link.live || link.role_applied => self.go_offline(link, now).await,
            None => Ok(()),
        }
    }

    async fn go_live(
        &self,
        settings: &GuildSettings,
        link: &StreamLink,
        stream: &LiveStream,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let catalog = RoleCatalog::new(self.actuator, self.directory);
        let role_id = catalog.ensure_live(link.guild_id).await?;
        let repo = StreamLinkRepository::new(self.db);

        match self
            .actuator
            .assign_role(link.guild_id, link.user_id, role_id, "Live on Twitch")
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_permanent() => {
                tracing::warn!(
                    "Live role for {} refused ({}); waiting for the stream to end",
                    link.twitch_handle,
                    e
                );
                return repo.set_state(link.id, true, false, now).await;
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(channel_id) = settings.stream_channel_id {
            if let Err(e) = self
                .actuator
                .send_message(channel_id, &live_notice(link, stream))
                .await
            {
                tracing::warn!(
                    "Go-live announcement for {} failed: {}",
                    link.twitch_handle,
                    e
                );
            }
        }
        tracing::info!(
            "{} went live for user {} in guild {}",
            link.twitch_handle,
            link.user_id,
            link.guild_id
        );

        repo.set_state(link.id, true, true, now).await
    }

    async fn go_offline(&self, link: &StreamLink, now: DateTime<Utc>) -> Result<(), AppError> {
        let catalog = RoleCatalog::new(self.actuator, self.directory);
        if let Some(role_id) = catalog.live_role(link.guild_id).filter(|_| link.role_applied) {
            match self
                .actuator
                .remove_role(link.guild_id, link.user_id, role_id, "Stream ended")
                .await
            {
                Ok(()) => {}
                Err(e) if e.is_permanent() => {
                    tracing::warn!(
                        "Could not remove live role for {}: {}",
                        link.twitch_handle,
                        e
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!("{} went offline", link.twitch_handle);

        StreamLinkRepository::new(self.db)
            .set_state(link.id, false, false, now)
            .await
    }
}

fn live_notice(link: &StreamLink, stream: &LiveStream) -> Notice {
    let mut notice = Notice::new(format!(
        "<@{}> is now live on Twitch!\n\n**{}**",
        link.user_id, stream.title
    ))
    .title(format!("🔴 {} is live", stream.user_login))
    .url(stream.url())
    .colour(TWITCH_PURPLE);

    if let Some(game) = &stream.game_name {
        notice = notice.field("Playing", game.clone());
    }
    if let Some(thumbnail) = &stream.thumbnail_url {
        notice = notice.image(thumbnail.clone());
    }

    notice
}

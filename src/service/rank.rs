//! Mirrors each linked player's in-game rank tier onto a Discord role.

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::{
    actuator::{rank::RankProvider, ChatActuator, GuildDirectory},
    data::{guild_settings::GuildSettingsRepository, rank_link::RankLinkRepository},
    error::{provider::ProviderError, AppError},
    model::{
        guild_settings::Feature,
        rank::{RankLink, RankTier},
    },
    scheduler::shutdown::Shutdown,
    service::{isolate, role_catalog::RoleCatalog, role_sync::RoleDiff},
};

pub struct RankService<'a> {
    db: &'a DatabaseConnection,
    actuator: &'a dyn ChatActuator,
    directory: &'a dyn GuildDirectory,
    provider: &'a dyn RankProvider,
}

impl<'a> RankService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        actuator: &'a dyn ChatActuator,
        directory: &'a dyn GuildDirectory,
        provider: &'a dyn RankProvider,
    ) -> Self {
        Self {
            db,
            actuator,
            directory,
            provider,
        }
    }

    /// Fetches every linked player's rank and updates tier roles that changed.
    pub async fn sync_ranks(&self, now: DateTime<Utc>, shutdown: &Shutdown) -> Result<(), AppError> {
        let guilds = GuildSettingsRepository::new(self.db)
            .get_enabled(Feature::RankRoles)
            .await?;
        let repo = RankLinkRepository::new(self.db);

        for settings in guilds {
            for link in repo.get_by_guild(settings.guild_id).await? {
                if shutdown.is_requested() {
                    return Ok(());
                }

                let result = self.sync_one(&link, now).await;
                isolate("rank_sync", format_args!("rank link {}", link.id), result)?;
            }
        }

        Ok(())
    }

    /// Syncs one link.
    ///
    /// Nothing is persisted unless the fetch succeeded. The tier is only
    /// recorded after the role change went through, so a failed role update
    /// is retried on the next run.
    pub async fn sync_one(&self, link: &RankLink, now: DateTime<Utc>) -> Result<(), AppError> {
        let snapshot = match self.provider.fetch_rank(&link.handle).await {
            Ok(snapshot) => snapshot,
            Err(ProviderError::NotFound(handle)) => {
                tracing::debug!("No rank found for '{}' (link {})", handle, link.id);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let repo = RankLinkRepository::new(self.db);
        let tier = RankTier::from_snapshot(&snapshot);
        if link.last_synced_rank == Some(tier) {
            repo.touch_synced(link.id, now).await?;
            return Ok(());
        }

        let Some(current) = self
            .directory
            .member_roles(link.guild_id, link.user_id)
            .await?
        else {
            tracing::debug!("User {} left guild {}; skipping rank roles", link.user_id, link.guild_id);
            return Ok(());
        };

        let catalog = RoleCatalog::new(self.actuator, self.directory);
        let desired = catalog.ensure_tier(link.guild_id, tier).await?;
        let mut managed = catalog.tier_roles(link.guild_id);
        if !managed.contains(&desired) {
            managed.push(desired);
        }

        RoleDiff::between(&current, &managed, &[desired])
            .apply(
                self.actuator,
                link.guild_id,
                link.user_id,
                &format!("Rank tier {}", tier.name()),
            )
            .await?;
        repo.record_sync(link.id, tier, now).await?;

        tracing::info!(
            "Synced rank tier {} for user {} in guild {}",
            tier.name(),
            link.user_id,
            link.guild_id
        );

        Ok(())
    }
}

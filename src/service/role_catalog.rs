//! Lookup and creation of the role families the bot manages.
//!
//! Managed roles are identified by name so that server admins can recolour or
//! reorder them freely. Missing roles are created on first use.

use serenity::all::{GuildId, RoleId};

use crate::{
    actuator::{ChatActuator, GuildDirectory},
    error::AppError,
    model::{
        rank::RankTier,
        role::{level_role_name, RoleSpec, LIVE_ROLE_NAME},
    },
};

pub struct RoleCatalog<'a> {
    actuator: &'a dyn ChatActuator,
    directory: &'a dyn GuildDirectory,
}

impl<'a> RoleCatalog<'a> {
    pub fn new(actuator: &'a dyn ChatActuator, directory: &'a dyn GuildDirectory) -> Self {
        Self {
            actuator,
            directory,
        }
    }

    /// Returns the role matching `spec.name`, creating it if the guild lacks one.
    pub async fn ensure(&self, guild_id: GuildId, spec: &RoleSpec) -> Result<RoleId, AppError> {
        if let Some(role_id) = self.directory.role_by_name(guild_id, &spec.name) {
            return Ok(role_id);
        }

        let role_id = self.actuator.create_role(guild_id, spec).await?;
        tracing::info!("Created role '{}' ({}) in guild {}", spec.name, role_id, guild_id);

        Ok(role_id)
    }

    /// Existing level roles for levels `1..=max_level`. Levels without a role are skipped.
    pub fn level_roles(&self, guild_id: GuildId, max_level: i32) -> Vec<RoleId> {
        (1..=max_level)
            .filter_map(|level| self.directory.role_by_name(guild_id, &level_role_name(level)))
            .collect()
    }

    /// Existing tier roles.
    pub fn tier_roles(&self, guild_id: GuildId) -> Vec<RoleId> {
        RankTier::ALL
            .iter()
            .filter_map(|tier| self.directory.role_by_name(guild_id, tier.name()))
            .collect()
    }

    pub async fn ensure_level(&self, guild_id: GuildId, level: i32) -> Result<RoleId, AppError> {
        self.ensure(guild_id, &RoleSpec::level(level)).await
    }

    pub async fn ensure_tier(&self, guild_id: GuildId, tier: RankTier) -> Result<RoleId, AppError> {
        self.ensure(guild_id, &RoleSpec::tier(tier)).await
    }

    pub async fn ensure_live(&self, guild_id: GuildId) -> Result<RoleId, AppError> {
        self.ensure(guild_id, &RoleSpec::live()).await
    }

    pub fn live_role(&self, guild_id: GuildId) -> Option<RoleId> {
        self.directory.role_by_name(guild_id, LIVE_ROLE_NAME)
    }
}

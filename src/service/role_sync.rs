//! Diffing a member's roles against the roles a policy wants them to hold.

use serenity::all::{GuildId, RoleId, UserId};

use crate::{actuator::ChatActuator, error::actuator::ActuatorError};

/// Role changes needed to reach a desired state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDiff {
    pub grant: Vec<RoleId>,
    pub revoke: Vec<RoleId>,
}

impl RoleDiff {
    /// Computes the changes for one managed role family.
    ///
    /// Only roles in `managed` are ever revoked, so roles the policy does not
    /// own are left alone.
    pub fn between(current: &[RoleId], managed: &[RoleId], desired: &[RoleId]) -> Self {
        let grant = desired
            .iter()
            .filter(|role| !current.contains(role))
            .copied()
            .collect();
        let revoke = current
            .iter()
            .filter(|role| managed.contains(role) && !desired.contains(role))
            .copied()
            .collect();

        Self { grant, revoke }
    }

    pub fn is_empty(&self) -> bool {
        self.grant.is_empty() && self.revoke.is_empty()
    }

    /// Grants then revokes, stopping at the first failure.
    ///
    /// A partial application is safe to repeat because the next diff is
    /// computed from the member's roles at that time.
    pub async fn apply(
        &self,
        actuator: &dyn ChatActuator,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), ActuatorError> {
        for role_id in &self.grant {
            actuator
                .assign_role(guild_id, user_id, *role_id, reason)
                .await?;
        }
        for role_id in &self.revoke {
            actuator
                .remove_role(guild_id, user_id, *role_id, reason)
                .await?;
        }

        Ok(())
    }
}

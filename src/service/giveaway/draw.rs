//! Winner selection.

use rand::{seq::IndexedRandom, Rng};
use serenity::all::UserId;

use crate::{actuator::GuildDirectory, error::AppError, model::giveaway::Giveaway};

/// Participants allowed to win.
///
/// With a required role, only participants who are still members and hold
/// the role qualify. Without one, every participant does.
pub async fn eligible_participants(
    directory: &dyn GuildDirectory,
    giveaway: &Giveaway,
) -> Result<Vec<UserId>, AppError> {
    let Some(required) = giveaway.required_role_id else {
        return Ok(giveaway.participants.clone());
    };

    let mut eligible = Vec::with_capacity(giveaway.participants.len());
    for user_id in &giveaway.participants {
        let holds_role = directory
            .member_roles(giveaway.guild_id, *user_id)
            .await?
            .is_some_and(|roles| roles.contains(&required));
        if holds_role {
            eligible.push(*user_id);
        }
    }

    Ok(eligible)
}

/// Picks up to `count` distinct winners uniformly at random without
/// replacement. Fewer eligible users than `count` means all of them win.
pub fn pick_winners<R: Rng + ?Sized>(eligible: &[UserId], count: u32, rng: &mut R) -> Vec<UserId> {
    let mut pool = eligible.to_vec();
    pool.sort();
    pool.dedup();

    pool.choose_multiple(rng, count as usize).copied().collect()
}

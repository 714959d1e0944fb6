//! Managed role definitions.

use crate::model::rank::RankTier;

/// Name of the role held by members who are currently streaming.
pub const LIVE_ROLE_NAME: &str = "Live on Twitch";

/// Colours for level roles 1 through 10, light to dark.
const LEVEL_COLOURS: [u32; 10] = [
    0xADD8E6, 0x90EE90, 0xFFA500, 0xFFD700, 0xDA70D6, 0x20B2AA, 0x8A2BE2, 0xDC143C, 0x4169E1,
    0x800080,
];

/// Everything needed to create a missing managed role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSpec {
    pub name: String,
    pub colour: u32,
    pub hoist: bool,
    pub mentionable: bool,
}

impl RoleSpec {
    /// Role for a level, e.g. `Level 3`.
    pub fn level(level: i32) -> Self {
        let index = (level.max(1) as usize - 1).min(LEVEL_COLOURS.len() - 1);
        Self {
            name: level_role_name(level),
            colour: LEVEL_COLOURS[index],
            hoist: false,
            mentionable: false,
        }
    }

    /// Role for a rank tier, named after the tier.
    pub fn tier(tier: RankTier) -> Self {
        Self {
            name: tier.name().to_string(),
            colour: tier.colour(),
            hoist: true,
            mentionable: false,
        }
    }

    pub fn live() -> Self {
        Self {
            name: LIVE_ROLE_NAME.to_string(),
            colour: 0x9B59B6,
            hoist: true,
            mentionable: true,
        }
    }
}

pub fn level_role_name(level: i32) -> String {
    format!("Level {}", level)
}

//! Level derivation from experience.

/// Level for an XP total given ascending thresholds, where `thresholds[n]` is
/// the XP needed for level `n + 1`.
///
/// Levels start at 1 and never exceed `thresholds.len()`.
pub fn level_for(xp: i64, thresholds: &[i64]) -> i32 {
    let reached = thresholds.iter().take_while(|&&needed| xp >= needed).count();
    reached.max(1) as i32
}

/// Highest level the thresholds define.
pub fn max_level(thresholds: &[i64]) -> i32 {
    thresholds.len().max(1) as i32
}

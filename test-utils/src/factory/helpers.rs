//! Shared helper utilities for factory methods.

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Gets a unique, non-zero Discord-style snowflake as a string.
///
/// Records store Discord IDs as strings and the bot parses them back into
/// `u64` IDs, so factory defaults must be valid numeric snowflakes.
///
/// # Returns
/// - `String` - Unique numeric ID string
pub fn next_snowflake() -> String {
    (100_000_000_000_000_000u64 + next_id()).to_string()
}

//! Database repository layer for every persisted record kind.
//!
//! Repositories use SeaORM entity models internally and return domain models.
//! Guarded writes (compare-and-swap on `revision`, conditional status or
//! `active` updates) report whether they won with a `bool` instead of an error,
//! so callers decide whether to re-read and retry.

pub mod ban;
pub mod giveaway;
pub mod guild_settings;
pub mod moderator;
pub mod rank_link;
pub mod stream_link;
pub mod task_marker;
pub mod warning;
pub mod xp;


use crate::error::AppError;

/// Converts sweep query rows into domain models, dropping malformed rows.
///
/// A row that cannot be converted is logged and skipped so one bad record
/// does not stop a sweep over every other record.
pub(crate) fn collect_valid<E, T>(
    kind: &'static str,
    rows: Vec<E>,
    convert: impl Fn(E) -> Result<T, AppError>,
    row_id: impl Fn(&E) -> i32,
) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row_id(&row);
            match convert(row) {
                Ok(model) => Some(model),
                Err(e) => {
                    tracing::error!("Skipping malformed {} row {}: {}", kind, id, e);
                    None
                }
            }
        })
        .collect()
}

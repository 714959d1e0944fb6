//! Reconciliation policies and the event-driven operations they share
//! records with.
//!
//! Every service borrows the database connection and the actuators it needs
//! for the duration of one call. Sweeps take `now` explicitly and walk their
//! records in id order, isolating per-record failures with [`isolate`].

pub mod ban;
pub mod giveaway;
pub mod level;
pub mod moderator;
pub mod rank;
pub mod role_catalog;
pub mod role_sync;
pub mod stream;
pub mod warning;
pub mod xp;

#[cfg(test)]
mod test;

use std::fmt::Display;

use crate::error::{AppError, ErrorClass};

/// Handles the outcome of one record inside a sweep.
///
/// Store failures are returned so the caller aborts the sweep. Everything else
/// is logged according to its class and swallowed so the sweep moves on.
pub(crate) fn isolate(
    task: &str,
    record: impl Display,
    result: Result<(), AppError>,
) -> Result<(), AppError> {
    let Err(err) = result else {
        return Ok(());
    };

    if err.aborts_sweep() {
        return Err(err);
    }

    match err.class() {
        ErrorClass::Transient => {
            tracing::warn!("{}: {} failed, retrying next run: {}", task, record, err)
        }
        ErrorClass::Delivery => {
            tracing::info!("{}: {} notification not delivered: {}", task, record, err)
        }
        ErrorClass::Permanent | ErrorClass::Store => {
            tracing::error!("{}: {} failed permanently: {}", task, record, err)
        }
    }

    Ok(())
}

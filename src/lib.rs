//! Reconciliation core of a community Discord bot.
//!
//! Persisted, time-bound records (bans, warnings, giveaways, XP, moderator
//! points, rank links and stream links) are kept in sync with Discord and the
//! external rank and stream APIs. Periodic sweeps run under [`scheduler`];
//! gateway events arrive through [`bot`]. Both go through the policies in
//! [`service`], which only touch the outside world via [`actuator`] traits.

pub mod actuator;
pub mod bot;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;

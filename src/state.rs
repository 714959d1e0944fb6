//! Shared resources handed to scheduled tasks.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    actuator::{discord::DiscordGateway, rank::RankProvider, stream::StreamProvider},
    config::PolicyConfig,
};

/// Everything a sweep needs, built once at startup and shared behind an `Arc`.
///
/// `DatabaseConnection` is a pool and `DiscordGateway` holds reference-counted
/// clients, so cloning either shares the underlying connection.
pub struct AppState {
    pub db: DatabaseConnection,
    pub discord: DiscordGateway,
    pub rank: Arc<dyn RankProvider>,
    /// `None` when no stream provider credentials are configured.
    pub stream: Option<Arc<dyn StreamProvider>>,
    pub policy: PolicyConfig,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        discord: DiscordGateway,
        rank: Arc<dyn RankProvider>,
        stream: Option<Arc<dyn StreamProvider>>,
        policy: PolicyConfig,
    ) -> Self {
        Self {
            db,
            discord,
            rank,
            stream,
            policy,
        }
    }
}

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::{error::provider::ProviderError, model::rank::RankSnapshot};

/// Source of players' current rank.
#[async_trait]
pub trait RankProvider: Send + Sync {
    /// Fetches a player's current standing.
    ///
    /// # Returns
    /// - `Ok(RankSnapshot)` - Player is on the leaderboard
    /// - `Err(ProviderError::NotFound)` - Unknown handle or no placement this season
    /// - `Err(_)` - Network, throttling or upstream failure
    async fn fetch_rank(&self, handle: &str) -> Result<RankSnapshot, ProviderError>;
}

/// Leaderboard API client.
///
/// Requests `{base}/leaderboard/name/{season}/{handle}` and reads the current
/// placement from the response.
pub struct HttpRankProvider {
    client: reqwest::Client,
    base_url: String,
    season: String,
}

#[derive(Deserialize)]
struct PlayerResponse {
    #[serde(rename = "CurrentPlacement")]
    current_placement: Option<CurrentPlacement>,
}

#[derive(Deserialize)]
struct CurrentPlacement {
    #[serde(rename = "Score", alias = "score", default)]
    score: i64,
    #[serde(rename = "Placement", alias = "placement", default)]
    placement: u32,
}

impl HttpRankProvider {
    pub fn new(client: reqwest::Client, base_url: String, season: String) -> Self {
        Self {
            client,
            base_url,
            season,
        }
    }

    /// Builds the lookup URL, percent-encoding the handle as one path segment.
    fn player_url(&self, handle: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Malformed(format!("rank API base URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::Malformed("rank API base URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["leaderboard", "name", self.season.as_str(), handle]);

        Ok(url)
    }
}

#[async_trait]
impl RankProvider for HttpRankProvider {
    async fn fetch_rank(&self, handle: &str) -> Result<RankSnapshot, ProviderError> {
        let url = self.player_url(handle)?;

        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(ProviderError::NotFound(handle.to_string())),
            StatusCode::TOO_MANY_REQUESTS => return Err(ProviderError::RateLimited),
            status => return Err(ProviderError::Status(status.as_u16())),
        }

        let body: PlayerResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let current = body
            .current_placement
            .ok_or_else(|| ProviderError::NotFound(handle.to_string()))?;

        Ok(RankSnapshot {
            score: current.score,
            placement: (current.placement > 0).then_some(current.placement),
        })
    }
}

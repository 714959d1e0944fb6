use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{config::TwitchCredentials, error::provider::ProviderError, model::stream::LiveStream};

/// Most handles the stream provider accepts in one request.
pub const MAX_HANDLES_PER_REQUEST: usize = 100;

const TWITCH_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
const TWITCH_STREAMS_URL: &str = "https://api.twitch.tv/helix/streams";

/// Source of live-stream status.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Looks up which of `handles` are live.
    ///
    /// At most `MAX_HANDLES_PER_REQUEST` handles are passed per call. Handles
    /// missing from the returned map are offline.
    async fn fetch_live_status(
        &self,
        handles: &[String],
    ) -> Result<HashMap<String, LiveStream>, ProviderError>;
}

#[derive(Clone)]
struct AppToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Deserialize)]
struct StreamsResponse {
    data: Vec<StreamData>,
}

#[derive(Deserialize)]
struct StreamData {
    user_login: String,
    title: String,
    #[serde(default)]
    game_name: String,
    #[serde(default)]
    thumbnail_url: String,
    #[serde(rename = "type", default)]
    kind: String,
}

/// Twitch Helix client using an app access token.
///
/// The token is fetched with the client-credentials grant, cached, and
/// refreshed shortly before expiry or when Twitch answers 401.
#[derive(Clone)]
pub struct TwitchStreamProvider {
    client: reqwest::Client,
    credentials: TwitchCredentials,
    token: Arc<RwLock<Option<AppToken>>>,
}

impl TwitchStreamProvider {
    pub fn new(client: reqwest::Client, credentials: TwitchCredentials) -> Self {
        Self {
            client,
            credentials,
            token: Arc::new(RwLock::new(None)),
        }
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.access_token.clone());
            }
        }

        let mut cached = self.token.write().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.access_token.clone());
            }
        }

        let response = self
            .client
            .post(TWITCH_TOKEN_URL)
            .query(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST => {
                return Err(ProviderError::Unauthorized)
            }
            status => return Err(ProviderError::Status(status.as_u16())),
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        // Refresh a minute early so in-flight requests never carry a dead token
        let expires_at = Utc::now() + Duration::seconds(body.expires_in - 60);
        *cached = Some(AppToken {
            access_token: body.access_token.clone(),
            expires_at,
        });

        tracing::debug!("Refreshed Twitch app access token");

        Ok(body.access_token)
    }

    async fn invalidate_token(&self) {
        *self.token.write().await = None;
    }

    async fn request_streams(
        &self,
        handles: &[String],
        token: &str,
    ) -> Result<reqwest::Response, ProviderError> {
        let query: Vec<(&str, &str)> = handles
            .iter()
            .map(|handle| ("user_login", handle.as_str()))
            .collect();

        Ok(self
            .client
            .get(TWITCH_STREAMS_URL)
            .query(&query)
            .header("Client-Id", &self.credentials.client_id)
            .bearer_auth(token)
            .send()
            .await?)
    }
}

#[async_trait]
impl StreamProvider for TwitchStreamProvider {
    async fn fetch_live_status(
        &self,
        handles: &[String],
    ) -> Result<HashMap<String, LiveStream>, ProviderError> {
        if handles.is_empty() {
            return Ok(HashMap::new());
        }

        let token = self.access_token().await?;
        let mut response = self.request_streams(handles, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.invalidate_token().await;
            let token = self.access_token().await?;
            response = self.request_streams(handles, &token).await?;
        }

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => return Err(ProviderError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => return Err(ProviderError::RateLimited),
            status => return Err(ProviderError::Status(status.as_u16())),
        }

        let body: StreamsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(body
            .data
            .into_iter()
            .filter(|stream| stream.kind == "live")
            .map(|stream| {
                let login = stream.user_login.to_lowercase();
                let live = LiveStream {
                    user_login: login.clone(),
                    title: stream.title,
                    game_name: (!stream.game_name.is_empty()).then_some(stream.game_name),
                    thumbnail_url: (!stream.thumbnail_url.is_empty()).then(|| {
                        stream
                            .thumbnail_url
                            .replace("{width}", "440")
                            .replace("{height}", "248")
                    }),
                };
                (login, live)
            })
            .collect())
    }
}

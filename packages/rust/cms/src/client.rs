//! HTTP client for the CMS CDN API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use storefront_shared::{CmsSettings, Result, StorefrontError, read_token};

use crate::blocks::Story;
use crate::context::CmsContext;
use crate::{StoryApi, StoryResponse};

/// User-Agent string for CMS requests.
const USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

/// CDN API client. Holds no per-request state; see [`CmsContext`].
#[derive(Debug, Clone)]
pub struct CmsClient {
    client: Client,
    api_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct RawStoryResponse {
    story: Story,
    #[serde(default)]
    cv: Option<u64>,
}

impl CmsClient {
    /// Build a client with an explicit access token.
    pub fn new(settings: &CmsSettings, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| StorefrontError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Build a client reading the token from the env var named in settings.
    pub fn from_settings(settings: &CmsSettings) -> Result<Self> {
        let token = read_token(&settings.token_env)?;
        Self::new(settings, token)
    }

    /// The public token, as embedded in the editor script URL.
    pub fn token(&self) -> &str {
        &self.token
    }
}

#[async_trait]
impl StoryApi for CmsClient {
    #[instrument(skip_all, fields(slug = %slug, version = ctx.version().as_str()))]
    async fn fetch_story(&self, ctx: &CmsContext, slug: &str) -> Result<StoryResponse> {
        let url = format!("{}/cdn/stories/{}", self.api_url, slug.trim_start_matches('/'));

        let mut query: Vec<(&str, String)> = vec![
            ("token", self.token.clone()),
            ("version", ctx.version().as_str().to_string()),
        ];
        if let Some(cv) = ctx.cache_version() {
            query.push(("cv", cv.to_string()));
        }

        debug!(%url, "fetching story");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| StorefrontError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorefrontError::Api {
                service: "cms",
                status: status.as_u16(),
                message,
            });
        }

        let raw: RawStoryResponse = response
            .json()
            .await
            .map_err(|e| StorefrontError::decode(format!("{url}: {e}")))?;

        debug!(
            story_id = raw.story.id,
            blocks = raw.story.content.body.len(),
            cv = ?raw.cv,
            "story fetched"
        );

        Ok(StoryResponse {
            story: raw.story,
            cache_version: raw.cv,
        })
    }
}

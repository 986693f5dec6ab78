//! Headless CMS access and content model.
//!
//! This crate provides:
//! - [`CmsContext`]: request-scoped query state (draft mode, cache version)
//! - [`Story`] / [`ContentBlock`]: the story model with a tagged block union
//! - [`LiveStory`]: the live-preview bridge for editor events
//! - [`CmsClient`]: the CDN API client behind [`StoryApi`]

pub mod blocks;
pub mod bridge;
mod client;
pub mod context;

use async_trait::async_trait;
use storefront_shared::Result;

pub use blocks::{Block, ContentBlock, Feature, Grid, Hero, Story, StoryContent, Teaser};
pub use bridge::{BridgeEvent, BridgeOutcome, LiveStory, Subscription};
pub use client::CmsClient;
pub use context::{CmsContext, ContentVersion, EDITOR_QUERY_PARAM};

/// A fetched story plus the cache version the CDN reported alongside it.
#[derive(Debug, Clone)]
pub struct StoryResponse {
    pub story: Story,
    pub cache_version: Option<u64>,
}

/// Story lookup by slug.
#[async_trait]
pub trait StoryApi: Send + Sync {
    /// Fetch `cdn/stories/{slug}` using the draft/version settings of `ctx`.
    async fn fetch_story(&self, ctx: &CmsContext, slug: &str) -> Result<StoryResponse>;
}

//! Request-scoped CMS query context.
//!
//! One [`CmsContext`] is built per generation pass and passed by reference to
//! every CMS call, so overlapping generations never see each other's draft
//! flag, route params or cache version.

use std::collections::BTreeMap;

/// Query parameter the visual editor appends when it opens a page.
pub const EDITOR_QUERY_PARAM: &str = "_storyblok";

/// Content version requested from the CDN API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentVersion {
    Published,
    Draft,
}

impl ContentVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
        }
    }
}

/// Per-request CMS state: route params, draft mode, cache version.
#[derive(Debug, Clone, Default)]
pub struct CmsContext {
    params: BTreeMap<String, String>,
    draft: bool,
    cache_version: Option<u64>,
}

impl CmsContext {
    /// Context for one generation pass. `preview` switches to draft content.
    pub fn new(params: BTreeMap<String, String>, preview: bool) -> Self {
        Self {
            params,
            draft: preview,
            cache_version: None,
        }
    }

    /// Draft content is served in preview, and whenever the editor opened the page.
    pub fn is_draft(&self) -> bool {
        self.draft || self.params.contains_key(EDITOR_QUERY_PARAM)
    }

    pub fn version(&self) -> ContentVersion {
        if self.is_draft() {
            ContentVersion::Draft
        } else {
            ContentVersion::Published
        }
    }

    /// Cache version token last reported by the CDN, if any.
    pub fn cache_version(&self) -> Option<u64> {
        self.cache_version
    }

    /// Remember the cache version the CDN reported.
    pub fn record_cache_version(&mut self, cache_version: Option<u64>) {
        if cache_version.is_some() {
            self.cache_version = cache_version;
        }
    }
}

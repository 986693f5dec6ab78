//! Commerce backend access: product slices, site info and content pages.
//!
//! The pipeline talks to the backend only through [`CommerceApi`], so tests
//! and alternative backends can stand in for [`HttpCommerceClient`].

mod client;
mod queries;

use async_trait::async_trait;
use storefront_shared::{Page, ProductList, Result, SiteInfo};

pub use client::HttpCommerceClient;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Per-request settings resolved from the caller's locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommerceConfig {
    /// Locale sent as `Accept-Language`.
    pub locale: String,
}

/// Named product collections exposed by the storefront API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Featured,
    BestSelling,
    Newest,
}

impl ProductField {
    /// The GraphQL field name under `site`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featuredProducts",
            Self::BestSelling => "bestSellingProducts",
            Self::Newest => "newestProducts",
        }
    }
}

impl std::fmt::Display for ProductField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A slice of one product collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductQuery {
    pub field: ProductField,
    /// Maximum number of products to return.
    pub first: u32,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Operations the home page needs from the commerce backend.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Resolve per-request settings; `None` falls back to the default locale.
    fn resolve_config(&self, locale: Option<&str>) -> CommerceConfig;

    /// Fetch the first `query.first` products of a named collection.
    async fn fetch_products(
        &self,
        query: ProductQuery,
        config: &CommerceConfig,
        preview: bool,
    ) -> Result<ProductList>;

    /// Fetch the category tree and brands.
    async fn fetch_site_info(&self, config: &CommerceConfig, preview: bool) -> Result<SiteInfo>;

    /// Fetch the content pages list.
    async fn fetch_pages(&self, config: &CommerceConfig, preview: bool) -> Result<Vec<Page>>;
}

//! Home page content fetcher.
//!
//! One generation pass resolves the commerce settings, runs every backend
//! query concurrently, curates the product selections and returns the page
//! props together with the revalidation interval. Any failing query fails
//! the whole pass.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument};

use storefront_cms::{CmsContext, Story, StoryApi};
use storefront_commerce::{CommerceApi, ProductField, ProductQuery};
use storefront_shared::{Brand, Category, Page, PageSettings, ProductEdge, Result};

use crate::selection::curate;

/// Default interval after which a generated page goes stale.
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(14_400);

/// Inputs of one generation pass.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Route/query parameters (may carry the editor marker).
    pub params: BTreeMap<String, String>,
    /// Serve draft content and enable the editor bridge.
    pub preview: bool,
    /// Requested locale; `None` uses the backend default.
    pub locale: Option<String>,
}

impl GenerationRequest {
    /// Fresh CMS context for this request.
    pub fn cms_context(&self) -> CmsContext {
        CmsContext::new(self.params.clone(), self.preview)
    }

    /// Whether this pass serves draft content: preview, or the editor marker is present.
    pub fn is_draft(&self) -> bool {
        self.cms_context().is_draft()
    }
}

/// Backends a generation pass reads from.
#[derive(Clone, Copy)]
pub struct HomeSources<'a> {
    pub commerce: &'a dyn CommerceApi,
    pub cms: &'a dyn StoryApi,
}

/// Query sizes and the staleness bound for the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    pub home_slug: String,
    pub featured_count: u32,
    pub best_selling_count: u32,
    pub newest_count: u32,
    pub revalidate: Duration,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::from(&PageSettings::default())
    }
}

impl From<&PageSettings> for PageConfig {
    fn from(settings: &PageSettings) -> Self {
        Self {
            home_slug: settings.home_slug.clone(),
            featured_count: settings.featured_count,
            best_selling_count: settings.best_selling_count,
            newest_count: settings.newest_count,
            revalidate: Duration::from_secs(settings.revalidate_secs),
        }
    }
}

/// Everything the home page renders. Built once per pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProps {
    pub featured: Vec<ProductEdge>,
    pub best_selling: Vec<ProductEdge>,
    pub newest_products: Vec<ProductEdge>,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
    pub pages: Vec<Page>,
    pub story: Story,
}

/// Result of a generation pass.
#[derive(Debug, Clone)]
pub struct GeneratedHome {
    pub props: PageProps,
    /// Regenerate after this long.
    pub revalidate: Duration,
    /// Locale the commerce queries ran with.
    pub locale: String,
    /// CMS state of this pass, including the reported cache version.
    pub cms: CmsContext,
}

/// Fetch and assemble the home page props.
#[instrument(skip_all, fields(preview = request.preview, slug = %config.home_slug))]
pub async fn generate_home(
    request: &GenerationRequest,
    sources: &HomeSources<'_>,
    config: &PageConfig,
) -> Result<GeneratedHome> {
    let mut cms = request.cms_context();
    let commerce_config = sources.commerce.resolve_config(request.locale.as_deref());
    let preview = request.preview;

    info!(
        locale = %commerce_config.locale,
        version = cms.version().as_str(),
        "fetching home page content"
    );

    let query = |field, first| ProductQuery { field, first };
    let commerce = sources.commerce;

    let (featured, best_selling, newest, site_info, pages, story) = tokio::try_join!(
        commerce.fetch_products(
            query(ProductField::Featured, config.featured_count),
            &commerce_config,
            preview,
        ),
        commerce.fetch_products(
            query(ProductField::BestSelling, config.best_selling_count),
            &commerce_config,
            preview,
        ),
        commerce.fetch_products(
            query(ProductField::Newest, config.newest_count),
            &commerce_config,
            preview,
        ),
        commerce.fetch_site_info(&commerce_config, preview),
        commerce.fetch_pages(&commerce_config, preview),
        sources.cms.fetch_story(&cms, &config.home_slug),
    )?;

    debug!(
        featured = featured.len(),
        best_selling = best_selling.len(),
        newest = newest.len(),
        categories = site_info.categories.len(),
        brands = site_info.brands.len(),
        pages = pages.len(),
        blocks = story.story.content.body.len(),
        "home page content fetched"
    );

    cms.record_cache_version(story.cache_version);
    let curated = curate(&featured, &best_selling, &newest);

    let props = PageProps {
        featured: curated.featured,
        best_selling: curated.best_selling,
        newest_products: newest,
        categories: site_info.categories,
        brands: site_info.brands,
        pages,
        story: story.story,
    };

    info!(
        featured = props.featured.len(),
        best_selling = props.best_selling.len(),
        revalidate_secs = config.revalidate.as_secs(),
        "home page props assembled"
    );

    Ok(GeneratedHome {
        props,
        revalidate: config.revalidate,
        locale: commerce_config.locale,
        cms,
    })
}

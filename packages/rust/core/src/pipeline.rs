//! End-to-end `generate` pipeline: fetch → curate → mount → render → publish.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, instrument};

use storefront_render::CmsHead;
use storefront_shared::{AppConfig, Result, SeoConfig, UnknownBlocks};

use crate::fetcher::{GenerationRequest, HomeSources, PageConfig, generate_home};
use crate::page::{HomePage, PageView};
use crate::publish::{self, PublishManifest, PublishMeta};

/// Configuration for one `generate` run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub request: GenerationRequest,
    pub page: PageConfig,
    pub seo: SeoConfig,
    pub unknown_blocks: UnknownBlocks,
    /// Editor script injected into draft pages.
    pub editor_script_url: String,
    /// Public CMS token appended to the editor script URL.
    pub cms_token: String,
    /// Directory the page is published into.
    pub out_dir: PathBuf,
    /// Regenerate even if the published output is still fresh.
    pub force: bool,
}

impl GenerateConfig {
    /// Build from the loaded app config; `out_dir` defaults to `[page] output_dir`.
    pub fn from_app_config(
        app: &AppConfig,
        request: GenerationRequest,
        cms_token: impl Into<String>,
        out_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            request,
            page: PageConfig::from(&app.page),
            seo: app.seo.clone(),
            unknown_blocks: app.page.unknown_blocks,
            editor_script_url: app.cms.editor_script_url.clone(),
            cms_token: cms_token.into(),
            out_dir: out_dir.unwrap_or_else(|| PathBuf::from(&app.page.output_dir)),
            force: false,
        }
    }
}

/// Result of a run that published a new page.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub out_dir: PathBuf,
    pub manifest: PublishManifest,
    pub featured_count: usize,
    pub best_selling_count: usize,
    pub elapsed: Duration,
}

/// What a `generate` run did.
#[derive(Debug, Clone)]
pub enum GenerateOutcome {
    /// A new page was generated and published.
    Published(GenerateResult),
    /// The published page is still fresh; nothing was fetched.
    Fresh(PublishManifest),
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a page has been published.
    fn done(&self, result: &GenerateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _result: &GenerateResult) {}
}

/// Run the full `generate` pipeline.
///
/// 1. Freshness: skip when the published page is within its interval
/// 2. Fetch and curate the page props
/// 3. Mount and render the page
/// 4. Publish the output directory
#[instrument(skip_all, fields(out_dir = %config.out_dir.display(), draft = config.request.is_draft()))]
pub async fn generate_and_publish(
    config: &GenerateConfig,
    sources: &HomeSources<'_>,
    progress: &dyn ProgressReporter,
) -> Result<GenerateOutcome> {
    let start = Instant::now();
    // Preview or the editor marker.
    let draft = config.request.is_draft();

    // --- Phase 1: Freshness ---
    // Draft output is always regenerated.
    if !config.force && !draft {
        progress.phase("Checking published page");
        let locale = sources
            .commerce
            .resolve_config(config.request.locale.as_deref())
            .locale;
        let fresh = publish::fresh_manifest(&config.out_dir, &locale, draft, Utc::now())?;
        if let Some(manifest) = fresh {
            info!(
                expires_at = %manifest.expires_at().to_rfc3339(),
                "published page still fresh, skipping generation"
            );
            return Ok(GenerateOutcome::Fresh(manifest));
        }
    }

    // --- Phase 2: Fetch ---
    progress.phase("Fetching commerce and CMS content");
    let home = generate_home(&config.request, sources, &config.page).await?;

    // --- Phase 3: Render ---
    progress.phase("Rendering home page");
    let page = HomePage::mount(home.props, draft);
    let view = PageView {
        seo: &config.seo,
        locale: &home.locale,
        cms: CmsHead {
            editor_script_url: Some(config.editor_script_url.as_str()),
            token: &config.cms_token,
            cache_version: home.cms.cache_version(),
        },
        unknown_blocks: config.unknown_blocks,
    };
    let html = page.render(&view);

    // --- Phase 4: Publish ---
    progress.phase("Publishing");
    let published = publish::publish(
        &config.out_dir,
        &html,
        page.props(),
        &PublishMeta {
            locale: &home.locale,
            preview: draft,
            revalidate: home.revalidate,
            generated_at: Utc::now(),
        },
    )?;

    let result = GenerateResult {
        out_dir: published.out_dir,
        manifest: published.manifest,
        featured_count: page.props().featured.len(),
        best_selling_count: page.props().best_selling.len(),
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        featured = result.featured_count,
        best_selling = result.best_selling_count,
        elapsed_ms = result.elapsed.as_millis(),
        "generate pipeline complete"
    );

    Ok(GenerateOutcome::Published(result))
}

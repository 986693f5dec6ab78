//! Document head: SEO tags, manifest, and the CMS editor hooks.

use maud::{Markup, PreEscaped, html};
use storefront_shared::SeoConfig;

/// Global the editor script reads the cache version from.
pub const CACHE_VERSION_GLOBAL: &str = "StoryblokCacheVersion";

/// CMS values injected into the head.
#[derive(Debug, Clone, Default)]
pub struct CmsHead<'a> {
    /// Editor script URL; only emitted when set (preview pages).
    pub editor_script_url: Option<&'a str>,
    /// Public CMS token appended to the editor script URL.
    pub token: &'a str,
    /// Cache version reported by the CDN for this generation.
    pub cache_version: Option<u64>,
}

/// Resolve the `<title>`: the page title through the template, or the site title.
pub fn page_title(seo: &SeoConfig, title: Option<&str>) -> String {
    match (title, seo.title_template.as_deref()) {
        (Some(title), Some(template)) => template.replace("%s", title),
        (Some(title), None) => title.to_string(),
        (None, _) => seo.title.clone(),
    }
}

/// Render the `<head>` element.
pub fn head(seo: &SeoConfig, title: Option<&str>, cms: &CmsHead<'_>) -> Markup {
    let og = &seo.open_graph;
    let twitter = &seo.twitter;
    let og_title = og.title.clone().unwrap_or_else(|| page_title(seo, title));
    let og_description = og.description.as_deref().unwrap_or(&seo.description);
    // Digits only, so the value needs no escaping inside the script.
    let cache_version = cms.cache_version.map(|cv| cv.to_string()).unwrap_or_default();

    html! {
        head {
            meta charset="utf-8";
            title { (page_title(seo, title)) }
            meta name="description" content=(seo.description);
            meta property="og:title" content=(og_title);
            meta property="og:description" content=(og_description);
            meta property="og:type" content=(og.kind);
            @if let Some(locale) = &og.locale {
                meta property="og:locale" content=(locale);
            }
            @if let Some(url) = &og.url {
                meta property="og:url" content=(url);
            }
            @if let Some(site_name) = &og.site_name {
                meta property="og:site_name" content=(site_name);
            }
            @for image in &og.images {
                meta property="og:image" content=(image.url);
                @if let Some(alt) = &image.alt {
                    meta property="og:image:alt" content=(alt);
                }
                @if let Some(width) = image.width {
                    meta property="og:image:width" content=(width);
                }
                @if let Some(height) = image.height {
                    meta property="og:image:height" content=(height);
                }
            }
            @if let Some(card) = &twitter.card_type {
                meta name="twitter:card" content=(card);
            }
            @if let Some(site) = &twitter.site {
                meta name="twitter:site" content=(site);
            }
            @if let Some(handle) = &twitter.handle {
                meta name="twitter:creator" content=(handle);
            }
            meta name="viewport" content="width=device-width, initial-scale=1";
            link rel="manifest" href="/site.webmanifest";
            @if let Some(src) = cms.editor_script_url {
                script defer src=(format!("{src}?t={}", cms.token)) type="text/javascript" {}
            }
            script type="text/javascript" {
                (PreEscaped(format!("var {CACHE_VERSION_GLOBAL} = \"{cache_version}\";")))
            }
        }
    }
}

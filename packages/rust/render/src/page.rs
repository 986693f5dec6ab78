//! Full home page document.

use maud::{DOCTYPE, Markup, html};
use storefront_cms::ContentBlock;
use storefront_shared::{Brand, Category, Page, ProductEdge, SeoConfig};

use crate::blocks::{BlockOptions, render_blocks};
use crate::head::{CmsHead, head};
use crate::products::{all_products_grid, featured_grid};

/// Everything the home page view consumes.
#[derive(Debug, Clone)]
pub struct HomeDocument<'a> {
    pub seo: &'a SeoConfig,
    pub cms: CmsHead<'a>,
    /// BCP 47 tag for `<html lang>`.
    pub locale: &'a str,
    pub blocks: &'a [ContentBlock],
    pub block_options: BlockOptions,
    pub featured: &'a [ProductEdge],
    pub categories: &'a [Category],
    pub brands: &'a [Brand],
    pub newest: &'a [ProductEdge],
    pub pages: &'a [Page],
}

/// Render the home page to an HTML string.
pub fn render_home(doc: &HomeDocument<'_>) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang=(doc.locale) {
            (head(doc.seo, None, &doc.cms))
            body {
                main {
                    (render_blocks(doc.blocks, doc.block_options))
                    (banner(&doc.seo.title))
                    (featured_grid(doc.featured))
                    (hero(&doc.seo.description))
                    (all_products_grid(doc.categories, doc.brands, doc.newest))
                }
                (footer(doc.pages))
            }
        }
    };
    markup.into_string()
}

fn banner(title: &str) -> Markup {
    html! {
        div.banner {
            h2 { (title) }
        }
    }
}

fn hero(description: &str) -> Markup {
    html! {
        section.hero.site-hero {
            p { (description) }
        }
    }
}

/// Footer links to visible content pages, in backend sort order.
fn footer(pages: &[Page]) -> Markup {
    let mut visible: Vec<&Page> = pages
        .iter()
        .filter(|p| p.is_visible && !p.url.is_empty())
        .collect();
    visible.sort_by_key(|p| p.sort_order);

    html! {
        footer {
            ul.pages {
                li { a href="/" { "Home" } }
                @for page in visible {
                    li { a href=(page.url) { (page.name) } }
                }
            }
        }
    }
}

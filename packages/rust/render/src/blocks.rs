//! Views for CMS story blocks.

use maud::{Markup, html};
use storefront_cms::{Block, ContentBlock, Feature, Grid, Hero, Teaser};
use tracing::warn;

/// What to render for a block whose component has no view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownBlockPolicy {
    /// A visible notice naming the missing component.
    Placeholder,
    /// Nothing.
    Skip,
}

/// Options shared by every block view.
#[derive(Debug, Clone, Copy)]
pub struct BlockOptions {
    pub unknown: UnknownBlockPolicy,
    /// Tag blocks with their uid so the editor can map clicks to content.
    pub editable: bool,
}

/// Render a story body in order.
pub fn render_blocks(blocks: &[ContentBlock], opts: BlockOptions) -> Markup {
    html! {
        @for block in blocks {
            (render_block(block, opts))
        }
    }
}

/// Render one block by its component tag.
pub fn render_block(block: &ContentBlock, opts: BlockOptions) -> Markup {
    let uid = opts.editable.then_some(block.uid.as_str());

    match &block.block {
        Block::Teaser(teaser) => teaser_view(teaser, uid),
        Block::Feature(feature) => feature_view(feature, uid),
        Block::Grid(grid) => grid_view(grid, uid, opts),
        Block::Hero(hero) => hero_view(hero, uid),
        Block::Unknown { component, .. } => match opts.unknown {
            UnknownBlockPolicy::Placeholder => placeholder_view(component, uid),
            UnknownBlockPolicy::Skip => {
                warn!(component = %component, uid = %block.uid, "skipping unregistered block");
                html! {}
            }
        },
    }
}

fn teaser_view(teaser: &Teaser, uid: Option<&str>) -> Markup {
    html! {
        div.teaser data-blok-uid=[uid] {
            h2 { (teaser.headline) }
        }
    }
}

fn feature_view(feature: &Feature, uid: Option<&str>) -> Markup {
    html! {
        div.feature data-blok-uid=[uid] {
            h2 { (feature.name) }
        }
    }
}

fn grid_view(grid: &Grid, uid: Option<&str>, opts: BlockOptions) -> Markup {
    html! {
        div.grid data-blok-uid=[uid] {
            @for column in &grid.columns {
                (render_block(column, opts))
            }
        }
    }
}

fn hero_view(hero: &Hero, uid: Option<&str>) -> Markup {
    html! {
        section.hero data-blok-uid=[uid] {
            h2 { (hero.headline) }
            @if !hero.description.is_empty() {
                p { (hero.description) }
            }
        }
    }
}

fn placeholder_view(component: &str, uid: Option<&str>) -> Markup {
    html! {
        div.placeholder data-blok-uid=[uid] {
            "The component " strong { (component) } " has not been created yet."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};
    use serde_json::json;

    fn body() -> Vec<ContentBlock> {
        serde_json::from_value(json!([
            {"_uid": "t1", "component": "teaser", "headline": "Winter <Sale>"},
            {"_uid": "g1", "component": "grid", "columns": [
                {"_uid": "f1", "component": "feature", "name": "Fast shipping"},
                {"_uid": "u1", "component": "newsletter", "list": "weekly"}
            ]},
            {"_uid": "h1", "component": "hero", "headline": "Just landed", "description": ""}
        ]))
        .expect("decode blocks")
    }

    fn opts(unknown: UnknownBlockPolicy, editable: bool) -> BlockOptions {
        BlockOptions { unknown, editable }
    }

    fn count(html: &str, selector: &str) -> usize {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse(selector).unwrap();
        doc.select(&sel).count()
    }

    #[test]
    fn blocks_render_in_order_with_nesting() {
        let html = render_blocks(&body(), opts(UnknownBlockPolicy::Skip, false)).into_string();

        let teaser = html.find("Winter").unwrap();
        let feature = html.find("Fast shipping").unwrap();
        let hero = html.find("Just landed").unwrap();
        assert!(teaser < feature && feature < hero);
        assert_eq!(count(&html, "div.grid > div.feature"), 1);
        // Interpolation is escaped.
        assert!(html.contains("Winter &lt;Sale&gt;"));
    }

    #[test]
    fn unknown_blocks_follow_policy() {
        let skipped = render_blocks(&body(), opts(UnknownBlockPolicy::Skip, false)).into_string();
        assert_eq!(count(&skipped, "div.placeholder"), 0);

        let shown =
            render_blocks(&body(), opts(UnknownBlockPolicy::Placeholder, false)).into_string();
        assert_eq!(count(&shown, "div.placeholder"), 1);
        assert!(shown.contains("<strong>newsletter</strong>"));
    }

    #[test]
    fn editable_blocks_carry_uids() {
        let plain = render_blocks(&body(), opts(UnknownBlockPolicy::Skip, false)).into_string();
        assert_eq!(count(&plain, "[data-blok-uid]"), 0);

        let editable = render_blocks(&body(), opts(UnknownBlockPolicy::Skip, true)).into_string();
        assert_eq!(count(&editable, r#"[data-blok-uid="f1"]"#), 1);
        assert_eq!(count(&editable, "[data-blok-uid]"), 4);
    }
}

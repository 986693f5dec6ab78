//! The mounted home page view.
//!
//! A [`HomePage`] owns the generated props. In preview it also owns a
//! [`LiveStory`] and a listener on it; dropping the page unregisters the
//! listener.
//!
//! Re-rendering is pull-based. Editor input is applied to the live story and
//! the listener only bumps [`HomePage::revision`]. The caller watches the
//! revision and calls [`HomePage::render`] again, which reads the live copy.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use storefront_cms::{LiveStory, Story, Subscription};
use storefront_render::{BlockOptions, CmsHead, HomeDocument, UnknownBlockPolicy, render_home};
use storefront_shared::{SeoConfig, UnknownBlocks};

use crate::fetcher::PageProps;

/// Site-level inputs for rendering, independent of the fetched props.
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub seo: &'a SeoConfig,
    pub locale: &'a str,
    pub cms: CmsHead<'a>,
    pub unknown_blocks: UnknownBlocks,
}

struct LiveBinding {
    story: LiveStory,
    revision: Arc<AtomicU64>,
    _subscription: Subscription,
}

/// Home page bound to its props, with the editor bridge in preview.
pub struct HomePage {
    props: PageProps,
    preview: bool,
    live: Option<LiveBinding>,
}

impl HomePage {
    /// Mount the page. The editor bridge only exists in preview.
    pub fn mount(props: PageProps, preview: bool) -> Self {
        let live = preview.then(|| {
            let story = LiveStory::new(props.story.clone());
            let revision = Arc::new(AtomicU64::new(0));
            let counter = Arc::clone(&revision);
            let subscription = story.subscribe(move |story: &Story| {
                let rev = counter.fetch_add(1, Ordering::SeqCst) + 1;
                debug!(revision = rev, story = %story.slug, "applied editor input");
            });
            LiveBinding {
                story,
                revision,
                _subscription: subscription,
            }
        });

        Self {
            props,
            preview,
            live,
        }
    }

    pub fn props(&self) -> &PageProps {
        &self.props
    }

    /// The editor bridge, present only in preview.
    pub fn bridge(&self) -> Option<&LiveStory> {
        self.live.as_ref().map(|live| &live.story)
    }

    /// Number of editor edits applied since mounting. A change means the
    /// last `render` output is stale.
    pub fn revision(&self) -> u64 {
        self.live
            .as_ref()
            .map_or(0, |live| live.revision.load(Ordering::SeqCst))
    }

    /// The story to show: the live copy in preview, the fetched one otherwise.
    pub fn story(&self) -> Story {
        match &self.live {
            Some(live) => live.story.snapshot(),
            None => self.props.story.clone(),
        }
    }

    /// Render the full HTML document.
    pub fn render(&self, view: &PageView<'_>) -> String {
        let story = self.story();
        let unknown = match view.unknown_blocks {
            UnknownBlocks::Placeholder => UnknownBlockPolicy::Placeholder,
            UnknownBlocks::Skip => UnknownBlockPolicy::Skip,
            UnknownBlocks::Auto if self.preview => UnknownBlockPolicy::Placeholder,
            UnknownBlocks::Auto => UnknownBlockPolicy::Skip,
        };
        let cms = CmsHead {
            editor_script_url: view.cms.editor_script_url.filter(|_| self.preview),
            ..view.cms.clone()
        };

        render_home(&HomeDocument {
            seo: view.seo,
            cms,
            locale: view.locale,
            blocks: &story.content.body,
            block_options: BlockOptions {
                unknown,
                editable: self.preview,
            },
            featured: &self.props.featured,
            categories: &self.props.categories,
            brands: &self.props.brands,
            newest: &self.props.newest_products,
            pages: &self.props.pages,
        })
    }
}

impl std::fmt::Debug for HomePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomePage")
            .field("story", &self.props.story.slug)
            .field("preview", &self.preview)
            .field("revision", &self.revision())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{pages, product, site_info, story};
    use storefront_cms::{BridgeEvent, BridgeOutcome};

    fn props() -> PageProps {
        let site = site_info();
        PageProps {
            featured: vec![product(1, 20.0), product(2, 10.0)],
            best_selling: vec![],
            newest_products: vec![product(3, 5.0)],
            categories: site.categories,
            brands: site.brands,
            pages: pages(),
            story: story("root", "Original headline"),
        }
    }

    fn view(seo: &SeoConfig) -> PageView<'_> {
        PageView {
            seo,
            locale: "en-US",
            cms: CmsHead {
                editor_script_url: Some("https://app.storyblok.com/f/storyblok-latest.js"),
                token: "public-token",
                cache_version: Some(42),
            },
            unknown_blocks: UnknownBlocks::Auto,
        }
    }

    #[test]
    fn published_page_has_no_bridge_or_editor_hooks() {
        let seo = SeoConfig::default();
        let page = HomePage::mount(props(), false);

        assert!(page.bridge().is_none());
        let html = page.render(&view(&seo));
        assert!(!html.contains("storyblok-latest.js"));
        assert!(!html.contains("data-blok-uid"));
        assert!(!html.contains("has not been created yet"));
        assert!(html.contains(r#"var StoryblokCacheVersion = "42";"#));
        assert!(html.contains("/product/product-1/"));
    }

    #[test]
    fn preview_page_shows_placeholders_and_editor_script() {
        let seo = SeoConfig::default();
        let page = HomePage::mount(props(), true);

        let html = page.render(&view(&seo));
        assert!(html.contains("storyblok-latest.js?t=public-token"));
        assert!(html.contains("<strong>newsletter</strong>"));
        assert!(html.contains(r#"data-blok-uid="t1""#));
    }

    #[test]
    fn editor_input_rerenders_with_edited_story() {
        let seo = SeoConfig::default();
        let page = HomePage::mount(props(), true);
        let bridge = page.bridge().unwrap().clone();

        let outcome = bridge.dispatch(BridgeEvent::Input(story("root", "Edited headline")));

        assert_eq!(outcome, BridgeOutcome::Applied);
        assert_eq!(page.revision(), 1);
        let html = page.render(&view(&seo));
        assert!(html.contains("Edited headline"));
        assert!(!html.contains("Original headline"));
        // The fetched props are left alone.
        assert_eq!(page.props().story, story("root", "Original headline"));
    }

    #[test]
    fn earlier_render_is_stale_until_rendered_again() {
        let seo = SeoConfig::default();
        let page = HomePage::mount(props(), true);
        let bridge = page.bridge().unwrap().clone();

        let before = page.render(&view(&seo));
        let rev = page.revision();
        bridge.dispatch(BridgeEvent::Input(story("root", "First edit")));
        bridge.dispatch(BridgeEvent::Input(story("root", "Second edit")));

        assert_eq!(page.revision(), rev + 2);
        assert!(before.contains("Original headline"));
        let after = page.render(&view(&seo));
        assert!(after.contains("Second edit"));
        assert!(!after.contains("First edit"));
    }

    #[test]
    fn foreign_story_input_is_ignored() {
        let page = HomePage::mount(props(), true);
        let bridge = page.bridge().unwrap();

        let outcome = bridge.dispatch(BridgeEvent::Input(story("other-root", "Intruder")));

        assert_eq!(outcome, BridgeOutcome::Ignored);
        assert_eq!(page.revision(), 0);
        assert_eq!(page.story(), story("root", "Original headline"));
    }

    #[test]
    fn unmounting_unsubscribes() {
        let page = HomePage::mount(props(), true);
        let bridge = page.bridge().unwrap().clone();
        assert_eq!(bridge.listener_count(), 1);

        drop(page);

        assert_eq!(bridge.listener_count(), 0);
        assert_eq!(
            bridge.dispatch(BridgeEvent::Input(story("root", "After unmount"))),
            BridgeOutcome::Applied
        );
    }

    #[test]
    fn explicit_policy_overrides_auto() {
        let seo = SeoConfig::default();
        let page = HomePage::mount(props(), false);
        let mut view = view(&seo);
        view.unknown_blocks = UnknownBlocks::Placeholder;

        assert!(page.render(&view).contains("<strong>newsletter</strong>"));
    }
}

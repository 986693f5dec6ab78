//! In-memory backends and sample data for core tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Barrier;

use storefront_cms::{CmsContext, Story, StoryApi, StoryResponse};
use storefront_commerce::{CommerceApi, CommerceConfig, ProductField, ProductQuery};
use storefront_shared::{
    Brand, Category, Money, Page, Product, ProductEdge, ProductImage, ProductList, ProductPrices,
    Result, SiteInfo, StorefrontError,
};

pub fn product(id: u64, price: f64) -> ProductEdge {
    ProductEdge {
        node: Product {
            entity_id: id,
            name: format!("Product {id}"),
            path: format!("/product-{id}/"),
            description: None,
            images: vec![ProductImage {
                url: format!("https://cdn.example.com/{id}.jpg"),
                alt_text: String::new(),
            }],
            prices: ProductPrices {
                price: Money {
                    value: price,
                    currency_code: "USD".into(),
                },
                sale_price: None,
                retail_price: None,
            },
        },
    }
}

pub fn story(root_uid: &str, headline: &str) -> Story {
    serde_json::from_value(json!({
        "id": 1,
        "uuid": "0d6a0ef4-home",
        "name": "Home",
        "slug": "home",
        "full_slug": "home",
        "content": {
            "_uid": root_uid,
            "component": "page",
            "body": [
                {"_uid": "t1", "component": "teaser", "headline": headline},
                {"_uid": "n1", "component": "newsletter", "list": "weekly"}
            ]
        }
    }))
    .unwrap()
}

pub fn site_info() -> SiteInfo {
    SiteInfo {
        categories: vec![Category {
            entity_id: 10,
            name: "Kitchen".into(),
            path: "/kitchen/".into(),
            children: vec![],
        }],
        brands: vec![Brand {
            entity_id: 20,
            name: "Common Good".into(),
            path: "/common-good/".into(),
        }],
    }
}

pub fn pages() -> Vec<Page> {
    vec![Page {
        id: 1,
        name: "About".into(),
        url: "/about/".into(),
        is_visible: true,
        sort_order: 0,
    }]
}

/// Commerce backend serving fixed product slices.
#[derive(Default)]
pub struct FakeCommerce {
    pub products: HashMap<&'static str, ProductList>,
    pub fail_on: Option<ProductField>,
    pub fail_pages: bool,
    pub barrier: Option<Arc<Barrier>>,
    pub requests: Mutex<Vec<(ProductQuery, String, bool)>>,
}

impl FakeCommerce {
    pub fn with_products(
        featured: ProductList,
        best_selling: ProductList,
        newest: ProductList,
    ) -> Self {
        let mut products = HashMap::new();
        products.insert(ProductField::Featured.as_str(), featured);
        products.insert(ProductField::BestSelling.as_str(), best_selling);
        products.insert(ProductField::Newest.as_str(), newest);
        Self {
            products,
            ..Self::default()
        }
    }

    async fn rendezvous(&self) {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
    }
}

#[async_trait]
impl CommerceApi for FakeCommerce {
    fn resolve_config(&self, locale: Option<&str>) -> CommerceConfig {
        CommerceConfig {
            locale: locale.unwrap_or("en-US").to_string(),
        }
    }

    async fn fetch_products(
        &self,
        query: ProductQuery,
        config: &CommerceConfig,
        preview: bool,
    ) -> Result<ProductList> {
        self.requests
            .lock()
            .unwrap()
            .push((query, config.locale.clone(), preview));
        self.rendezvous().await;

        if self.fail_on == Some(query.field) {
            return Err(StorefrontError::Api {
                service: "commerce",
                status: 500,
                message: format!("{} unavailable", query.field),
            });
        }
        Ok(self
            .products
            .get(query.field.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_site_info(&self, _config: &CommerceConfig, _preview: bool) -> Result<SiteInfo> {
        self.rendezvous().await;
        Ok(site_info())
    }

    async fn fetch_pages(&self, _config: &CommerceConfig, _preview: bool) -> Result<Vec<Page>> {
        self.rendezvous().await;
        if self.fail_pages {
            return Err(StorefrontError::Network("connection reset".into()));
        }
        Ok(pages())
    }
}

/// CMS serving one story and recording the draft flag of each request.
pub struct FakeStories {
    pub story: Story,
    pub cache_version: Option<u64>,
    pub barrier: Option<Arc<Barrier>>,
    pub seen: Mutex<Vec<(String, bool)>>,
}

impl FakeStories {
    pub fn new(story: Story) -> Self {
        Self {
            story,
            cache_version: Some(1_700_000_000),
            barrier: None,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StoryApi for FakeStories {
    async fn fetch_story(&self, ctx: &CmsContext, slug: &str) -> Result<StoryResponse> {
        self.seen
            .lock()
            .unwrap()
            .push((slug.to_string(), ctx.is_draft()));
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        Ok(StoryResponse {
            story: self.story.clone(),
            cache_version: self.cache_version,
        })
    }
}

//! GraphQL documents and raw response shapes for the storefront API.

use serde::Deserialize;
use storefront_shared::{
    Brand, Category, Money, Page, Product, ProductEdge, ProductImage, ProductList, ProductPrices,
    SiteInfo,
};

use crate::ProductField;

const PRODUCT_FIELDS: &str = r#"
fragment productInfo on Product {
  entityId
  name
  path
  description
  images {
    edges {
      node {
        urlOriginal
        altText
      }
    }
  }
  prices {
    price { value currencyCode }
    salePrice { value currencyCode }
    retailPrice { value currencyCode }
  }
}"#;

/// Build the query for one product collection.
pub(crate) fn products_query(field: ProductField) -> String {
    format!(
        r#"query homeProducts($first: Int!) {{
  site {{
    {field}(first: $first) {{
      edges {{
        node {{ ...productInfo }}
      }}
    }}
  }}
}}
{PRODUCT_FIELDS}"#,
        field = field.as_str()
    )
}

pub(crate) const SITE_INFO_QUERY: &str = r#"query getSiteInfo {
  site {
    categoryTree {
      entityId
      name
      path
      children {
        entityId
        name
        path
        children { entityId name path }
      }
    }
    brands {
      edges {
        node { entityId name path }
      }
    }
  }
}"#;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SiteData<T> {
    pub site: T,
}

/// Relay-style connection. Edges may be null in the backend's schema.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Connection<T> {
    #[serde(default)]
    pub edges: Vec<Option<Edge<T>>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().flatten().map(|edge| edge.node)
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// `site` payload of a product query; the collection name varies per query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductsSite {
    featured_products: Option<Connection<RawProduct>>,
    best_selling_products: Option<Connection<RawProduct>>,
    newest_products: Option<Connection<RawProduct>>,
}

impl ProductsSite {
    pub(crate) fn into_products(self, field: ProductField) -> Option<ProductList> {
        let connection = match field {
            ProductField::Featured => self.featured_products,
            ProductField::BestSelling => self.best_selling_products,
            ProductField::Newest => self.newest_products,
        }?;

        Some(
            connection
                .into_nodes()
                .map(|raw| ProductEdge { node: raw.into() })
                .collect(),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    entity_id: u64,
    name: String,
    path: String,
    description: Option<String>,
    images: Option<Connection<RawImage>>,
    prices: RawPrices,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawImage {
    url_original: String,
    #[serde(default)]
    alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPrices {
    price: Money,
    sale_price: Option<Money>,
    retail_price: Option<Money>,
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        let images = raw
            .images
            .map(|conn| {
                conn.into_nodes()
                    .map(|img| ProductImage {
                        url: img.url_original,
                        alt_text: img.alt_text.unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            entity_id: raw.entity_id,
            name: raw.name,
            path: raw.path,
            description: raw.description.filter(|d| !d.is_empty()),
            images,
            prices: ProductPrices {
                price: raw.prices.price,
                sale_price: raw.prices.sale_price,
                retail_price: raw.prices.retail_price,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Site info
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SiteInfoSite {
    #[serde(default)]
    category_tree: Vec<Category>,
    brands: Option<Connection<Brand>>,
}

impl From<SiteInfoSite> for SiteInfo {
    fn from(site: SiteInfoSite) -> Self {
        Self {
            categories: site.category_tree,
            brands: site
                .brands
                .map(|conn| conn.into_nodes().collect())
                .unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pages (REST)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct PagesResponse {
    #[serde(default)]
    pub data: Vec<RawPage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPage {
    id: u64,
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default = "default_true")]
    is_visible: bool,
    #[serde(default)]
    sort_order: i64,
}

fn default_true() -> bool {
    true
}

impl From<RawPage> for Page {
    fn from(raw: RawPage) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            url: raw.url.unwrap_or_default(),
            is_visible: raw.is_visible,
            sort_order: raw.sort_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_query_selects_requested_field() {
        let query = products_query(ProductField::BestSelling);
        assert!(query.contains("bestSellingProducts(first: $first)"));
        assert!(query.contains("fragment productInfo on Product"));
        assert!(!query.contains("featuredProducts"));
    }

    #[test]
    fn null_edges_are_dropped() {
        let json = r#"{
            "newestProducts": {
                "edges": [
                    null,
                    {"node": {
                        "entityId": 3, "name": "Lamp", "path": "/lamp/", "description": "",
                        "images": {"edges": [{"node": {"urlOriginal": "https://cdn/lamp.jpg", "altText": null}}]},
                        "prices": {"price": {"value": 42.5, "currencyCode": "EUR"}, "salePrice": null, "retailPrice": null}
                    }}
                ]
            }
        }"#;

        let site: ProductsSite = serde_json::from_str(json).expect("decode");
        let products = site.into_products(ProductField::Newest).expect("field present");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].node.path, "/lamp/");
        assert_eq!(products[0].node.description, None);
        assert_eq!(products[0].node.images[0].alt_text, "");
    }

    #[test]
    fn site_info_decodes_tree_and_brand_connection() {
        let json = r#"{
            "categoryTree": [
                {"entityId": 10, "name": "Kitchen", "path": "/kitchen/", "children": [
                    {"entityId": 11, "name": "Knives", "path": "/kitchen/knives/", "children": []}
                ]}
            ],
            "brands": {
                "edges": [
                    {"node": {"entityId": 20, "name": "Common Good", "path": "/common-good/"}},
                    null
                ]
            }
        }"#;

        let site: SiteInfoSite = serde_json::from_str(json).expect("decode");
        let info = SiteInfo::from(site);
        assert_eq!(info.categories.len(), 1);
        assert_eq!(info.categories[0].children[0].name, "Knives");
        assert_eq!(info.brands.len(), 1);
        assert_eq!(info.brands[0].path, "/common-good/");
    }

    #[test]
    fn connection_without_edges_is_empty() {
        let site: SiteInfoSite =
            serde_json::from_str(r#"{"brands": {}}"#).expect("decode");
        assert!(SiteInfo::from(site).brands.is_empty());

        let products: ProductsSite =
            serde_json::from_str(r#"{"featuredProducts": {}}"#).expect("decode");
        assert_eq!(products.into_products(ProductField::Featured), Some(vec![]));
    }

    #[test]
    fn missing_field_yields_none() {
        let site: ProductsSite = serde_json::from_str("{}").expect("decode");
        assert!(site.into_products(ProductField::Featured).is_none());
    }
}

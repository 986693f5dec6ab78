//! Catalog domain types shared by the commerce client, the pipeline and the renderer.
//!
//! Field names serialize in camelCase so `props.json` matches what the
//! storefront's client-side code expects.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// An amount in a single currency, already normalized by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub value: f64,
    #[serde(default)]
    pub currency_code: String,
}

/// Price block of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPrices {
    /// The price shown to shoppers; the display ordering key.
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retail_price: Option<Money>,
}

/// A product image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub entity_id: u64,
    pub name: String,
    /// URL slug; unique per product.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    pub prices: ProductPrices,
}

/// Connection edge wrapping a [`Product`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEdge {
    pub node: Product,
}

impl ProductEdge {
    /// The display price used for ordering.
    pub fn price(&self) -> f64 {
        self.node.prices.price.value
    }

    /// The product's unique path.
    pub fn path(&self) -> &str {
        &self.node.path
    }
}

/// Products in source API order.
pub type ProductList = Vec<ProductEdge>;

// ---------------------------------------------------------------------------
// Site info
// ---------------------------------------------------------------------------

/// A node of the category tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub entity_id: u64,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
}

/// A brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub entity_id: u64,
    pub name: String,
    pub path: String,
}

/// Categories and brands, fetched together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
}

/// A content page (about, shipping, ...) managed in the commerce backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub sort_order: i64,
}

fn default_visible() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_edge_uses_backend_field_names() {
        let json = r#"{
            "node": {
                "entityId": 77,
                "name": "Orbit Terrarium",
                "path": "/orbit-terrarium/",
                "images": [{"url": "https://cdn.example.com/77.jpg", "altText": "Terrarium"}],
                "prices": {
                    "price": {"value": 109.0, "currencyCode": "USD"},
                    "retailPrice": {"value": 129.0, "currencyCode": "USD"}
                }
            }
        }"#;

        let edge: ProductEdge = serde_json::from_str(json).expect("deserialize edge");
        assert_eq!(edge.path(), "/orbit-terrarium/");
        assert_eq!(edge.price(), 109.0);
        assert!(edge.node.prices.sale_price.is_none());
        assert_eq!(edge.node.images[0].alt_text, "Terrarium");

        let out = serde_json::to_value(&edge).expect("serialize edge");
        assert_eq!(out["node"]["entityId"], 77);
        assert!(out["node"]["prices"].get("salePrice").is_none());
    }

    #[test]
    fn page_defaults_to_visible() {
        let page: Page =
            serde_json::from_str(r#"{"id": 4, "name": "Shipping"}"#).expect("deserialize page");
        assert!(page.is_visible);
        assert_eq!(page.url, "");
    }
}

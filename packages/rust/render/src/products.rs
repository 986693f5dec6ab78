//! Product widgets: cards, the featured grid and the all-products section.

use maud::{Markup, html};
use storefront_shared::{Brand, Category, Money, Product, ProductEdge};

/// Featured products shown in the hero grid.
pub const FEATURED_GRID_SIZE: usize = 3;

/// Newest products shown in the all-products section.
pub const ALL_PRODUCTS_LIMIT: usize = 6;

/// Image sizing and loading hints for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardImage {
    pub width: u32,
    pub height: u32,
    /// Load eagerly with high fetch priority (above-the-fold cards).
    pub priority: bool,
}

impl CardImage {
    pub const fn square(size: u32, priority: bool) -> Self {
        Self {
            width: size,
            height: size,
            priority,
        }
    }
}

/// Card variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardVariant {
    Full,
    Simple,
}

/// Format a price for display, e.g. `USD 109.00`.
pub fn format_price(money: &Money) -> String {
    if money.currency_code.is_empty() {
        format!("{:.2}", money.value)
    } else {
        format!("{} {:.2}", money.currency_code, money.value)
    }
}

/// A single product card linking to the product page.
pub fn product_card(product: &Product, image: CardImage, variant: CardVariant) -> Markup {
    let href = format!("/product{}", product.path);
    let first_image = product.images.first();
    let (loading, fetch_priority) = if image.priority {
        ("eager", Some("high"))
    } else {
        ("lazy", None)
    };
    let variant_name = match variant {
        CardVariant::Full => "full",
        CardVariant::Simple => "simple",
    };

    html! {
        a.product-card href=(href) data-variant=(variant_name) {
            @if let Some(img) = first_image {
                img src=(img.url)
                    alt=(alt_text(product, &img.alt_text))
                    width=(image.width)
                    height=(image.height)
                    loading=(loading)
                    fetchpriority=[fetch_priority];
            }
            h3.product-name { (product.name) }
            @if variant == CardVariant::Full {
                span.product-price { (format_price(&product.prices.price)) }
            }
        }
    }
}

fn alt_text<'a>(product: &'a Product, alt: &'a str) -> &'a str {
    if alt.is_empty() { &product.name } else { alt }
}

/// Grid of the first featured products; the first card is rendered large.
pub fn featured_grid(featured: &[ProductEdge]) -> Markup {
    html! {
        div.featured-grid {
            @for (i, edge) in featured.iter().take(FEATURED_GRID_SIZE).enumerate() {
                (product_card(
                    &edge.node,
                    CardImage::square(if i == 0 { 1080 } else { 540 }, true),
                    CardVariant::Full,
                ))
            }
        }
    }
}

/// Category and brand navigation next to the newest products.
pub fn all_products_grid(
    categories: &[Category],
    brands: &[Brand],
    newest: &[ProductEdge],
) -> Markup {
    html! {
        section.all-products {
            aside.filters {
                ul.categories {
                    li { a href="/search" { "All Categories" } }
                    @for category in categories {
                        li { a href=(format!("/search/{}", slug(&category.path))) { (category.name) } }
                    }
                }
                ul.brands {
                    li { a href="/search" { "All Designers" } }
                    @for brand in brands {
                        li { a href=(format!("/search/designers/{}", slug(&brand.path))) { (brand.name) } }
                    }
                }
            }
            div.products {
                @for edge in newest.iter().take(ALL_PRODUCTS_LIMIT) {
                    (product_card(&edge.node, CardImage::square(480, false), CardVariant::Simple))
                }
            }
        }
    }
}

/// Strip the leading and trailing slashes of a backend path.
fn slug(path: &str) -> &str {
    path.trim_matches('/')
}

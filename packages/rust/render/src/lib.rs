//! HTML rendering for the storefront home page.
//!
//! Views are plain functions returning [`maud::Markup`]; interpolated values
//! are escaped by maud.
//!
//! - [`head`]: SEO tags and the CMS editor hooks
//! - [`blocks`]: CMS story block views
//! - [`products`]: product cards and grids
//! - [`page`]: the assembled home document

pub mod blocks;
pub mod head;
pub mod page;
pub mod products;

pub use blocks::{BlockOptions, UnknownBlockPolicy, render_block, render_blocks};
pub use head::{CACHE_VERSION_GLOBAL, CmsHead, page_title};
pub use page::{HomeDocument, render_home};
pub use products::{CardImage, CardVariant, format_price, product_card};

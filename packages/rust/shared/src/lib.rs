//! Shared types, error model, and configuration for the storefront.
//!
//! This crate is the foundation depended on by all other storefront crates.
//! It provides:
//! - [`StorefrontError`]: the unified error type
//! - Catalog types ([`ProductEdge`], [`Category`], [`Brand`], [`Page`])
//! - Configuration ([`AppConfig`], config loading, token lookup)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CmsSettings, CommerceSettings, OpenGraphConfig, OpenGraphImage, PageSettings,
    SeoConfig, TwitterConfig, UnknownBlocks, config_dir, config_file_path, init_config,
    load_config, load_config_from, read_token, validate_tokens,
};
pub use error::{Result, StorefrontError};
pub use types::{
    Brand, Category, Money, Page, Product, ProductEdge, ProductImage, ProductList, ProductPrices,
    SiteInfo,
};

//! Core pipeline orchestration and domain logic for the storefront.
//!
//! This crate ties together the commerce and CMS backends, product curation,
//! rendering and publishing into end-to-end workflows (e.g.,
//! `generate_and_publish`).

pub mod fetcher;
pub mod page;
pub mod pipeline;
pub mod publish;
pub mod selection;

#[cfg(test)]
mod fixtures;

pub use fetcher::{
    DEFAULT_REVALIDATE, GeneratedHome, GenerationRequest, HomeSources, PageConfig, PageProps,
    generate_home,
};
pub use page::{HomePage, PageView};
pub use pipeline::{
    GenerateConfig, GenerateOutcome, GenerateResult, ProgressReporter, SilentProgress,
    generate_and_publish,
};
pub use publish::{PublishManifest, PublishMeta, PublishResult};
pub use selection::{CURATED_SLOTS, CuratedProducts, curate};

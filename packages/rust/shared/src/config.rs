//! Application configuration for the storefront.
//!
//! User config lives at `~/.storefront/storefront.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorefrontError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".storefront";

// ---------------------------------------------------------------------------
// Config structs (matching storefront.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Commerce backend settings.
    #[serde(default)]
    pub commerce: CommerceSettings,

    /// Headless CMS settings.
    #[serde(default)]
    pub cms: CmsSettings,

    /// Home page generation settings.
    #[serde(default)]
    pub page: PageSettings,

    /// Static SEO tags injected into every page head.
    #[serde(default)]
    pub seo: SeoConfig,
}

/// `[commerce]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceSettings {
    /// GraphQL storefront endpoint.
    #[serde(default = "default_storefront_api_url")]
    pub storefront_api_url: String,

    /// REST content endpoint (web pages live under `/pages`).
    #[serde(default = "default_content_api_url")]
    pub content_api_url: String,

    /// Env var holding the storefront (GraphQL) token.
    #[serde(default = "default_storefront_token_env")]
    pub api_token_env: String,

    /// Env var holding the store (REST) token.
    #[serde(default = "default_store_token_env")]
    pub store_api_token_env: String,

    /// Locale used when a request does not name one.
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_commerce_timeout")]
    pub timeout_secs: u64,
}

impl Default for CommerceSettings {
    fn default() -> Self {
        Self {
            storefront_api_url: default_storefront_api_url(),
            content_api_url: default_content_api_url(),
            api_token_env: default_storefront_token_env(),
            store_api_token_env: default_store_token_env(),
            default_locale: default_locale(),
            timeout_secs: default_commerce_timeout(),
        }
    }
}

fn default_storefront_api_url() -> String {
    "https://store.example.com/graphql".into()
}
fn default_content_api_url() -> String {
    "https://api.bigcommerce.com/stores/STORE_HASH/v3/content".into()
}
fn default_storefront_token_env() -> String {
    "BIGCOMMERCE_STOREFRONT_API_TOKEN".into()
}
fn default_store_token_env() -> String {
    "BIGCOMMERCE_STORE_API_TOKEN".into()
}
fn default_locale() -> String {
    "en-US".into()
}
fn default_commerce_timeout() -> u64 {
    30
}

/// `[cms]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsSettings {
    /// CDN API base URL.
    #[serde(default = "default_cms_api_url")]
    pub api_url: String,

    /// Env var holding the CMS preview/public token.
    #[serde(default = "default_cms_token_env")]
    pub token_env: String,

    /// Script the visual editor loads into previewed pages.
    #[serde(default = "default_editor_script_url")]
    pub editor_script_url: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_cms_timeout")]
    pub timeout_secs: u64,
}

impl Default for CmsSettings {
    fn default() -> Self {
        Self {
            api_url: default_cms_api_url(),
            token_env: default_cms_token_env(),
            editor_script_url: default_editor_script_url(),
            timeout_secs: default_cms_timeout(),
        }
    }
}

fn default_cms_api_url() -> String {
    "https://api.storyblok.com/v1".into()
}
fn default_cms_token_env() -> String {
    "STORYBLOK_TOKEN".into()
}
fn default_editor_script_url() -> String {
    "https://app.storyblok.com/f/storyblok-latest.js".into()
}
fn default_cms_timeout() -> u64 {
    10
}

/// How story blocks with an unregistered component tag are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownBlocks {
    /// Placeholder in preview, skipped otherwise.
    #[default]
    Auto,
    /// Always render a visible placeholder.
    Placeholder,
    /// Never render anything.
    Skip,
}

/// `[page]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSettings {
    /// Slug of the CMS story backing the home page.
    #[serde(default = "default_home_slug")]
    pub home_slug: String,

    /// Products requested for the featured slice.
    #[serde(default = "default_curated_count")]
    pub featured_count: u32,

    /// Products requested for the best-selling slice.
    #[serde(default = "default_curated_count")]
    pub best_selling_count: u32,

    /// Products requested for the newest slice (also the fallback pool).
    #[serde(default = "default_newest_count")]
    pub newest_count: u32,

    /// Seconds after which a generated page should be regenerated.
    #[serde(default = "default_revalidate_secs")]
    pub revalidate_secs: u64,

    /// Where generated pages are published.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Policy for unregistered story blocks.
    #[serde(default)]
    pub unknown_blocks: UnknownBlocks,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            home_slug: default_home_slug(),
            featured_count: default_curated_count(),
            best_selling_count: default_curated_count(),
            newest_count: default_newest_count(),
            revalidate_secs: default_revalidate_secs(),
            output_dir: default_output_dir(),
            unknown_blocks: UnknownBlocks::default(),
        }
    }
}

fn default_home_slug() -> String {
    "home".into()
}
fn default_curated_count() -> u32 {
    6
}
fn default_newest_count() -> u32 {
    12
}
fn default_revalidate_secs() -> u64 {
    14_400
}
fn default_output_dir() -> String {
    "var/site".into()
}

// ---------------------------------------------------------------------------
// SEO
// ---------------------------------------------------------------------------

/// `[seo]` section: site-wide defaults for title, description and social cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoConfig {
    pub title: String,
    /// Template with a `%s` placeholder for page-specific titles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_template: Option<String>,
    pub description: String,
    #[serde(default)]
    pub open_graph: OpenGraphConfig,
    #[serde(default)]
    pub twitter: TwitterConfig,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            title: "ACME Storefront".into(),
            title_template: Some("%s - ACME Storefront".into()),
            description: "The ACME storefront home page.".into(),
            open_graph: OpenGraphConfig::default(),
            twitter: TwitterConfig::default(),
        }
    }
}

/// OpenGraph defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenGraphConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default = "default_og_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default)]
    pub images: Vec<OpenGraphImage>,
}

impl Default for OpenGraphConfig {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            kind: default_og_type(),
            locale: Some("en_US".into()),
            url: None,
            site_name: Some("ACME Storefront".into()),
            images: Vec::new(),
        }
    }
}

fn default_og_type() -> String {
    "website".into()
}

/// A social card image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenGraphImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Twitter card defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwitterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.storefront/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| StorefrontError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.storefront/storefront.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| StorefrontError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        StorefrontError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| StorefrontError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| StorefrontError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| StorefrontError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read a secret from the environment variable named in config.
pub fn read_token(var_name: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(StorefrontError::config(format!(
            "token not found. Set the {var_name} environment variable."
        ))),
    }
}

/// Check that every token env var named in config is set and non-empty.
pub fn validate_tokens(config: &AppConfig) -> Result<()> {
    let missing: Vec<&str> = [
        config.commerce.api_token_env.as_str(),
        config.commerce.store_api_token_env.as_str(),
        config.cms.token_env.as_str(),
    ]
    .into_iter()
    .filter(|var| read_token(var).is_err())
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(StorefrontError::config(format!(
            "missing tokens. Set these environment variables: {}",
            missing.join(", ")
        )))
    }
}

//! HTTP implementation of [`CommerceApi`] over the GraphQL storefront API
//! and the REST content API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

use storefront_shared::{
    CommerceSettings, Page, ProductList, Result, SiteInfo, StorefrontError, read_token,
};

use crate::queries::{
    self, GraphQlResponse, PagesResponse, ProductsSite, SiteData, SiteInfoSite,
};
use crate::{CommerceApi, CommerceConfig, ProductQuery};

/// User-Agent string for backend requests.
const USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

const SERVICE: &str = "commerce";

/// Commerce client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpCommerceClient {
    client: Client,
    storefront_api_url: String,
    content_api_url: String,
    storefront_token: String,
    store_token: String,
    default_locale: String,
}

impl HttpCommerceClient {
    /// Build a client with explicit tokens.
    pub fn new(
        settings: &CommerceSettings,
        storefront_token: impl Into<String>,
        store_token: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| StorefrontError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            storefront_api_url: settings.storefront_api_url.clone(),
            content_api_url: settings.content_api_url.trim_end_matches('/').to_string(),
            storefront_token: storefront_token.into(),
            store_token: store_token.into(),
            default_locale: settings.default_locale.clone(),
        })
    }

    /// Build a client reading both tokens from the env vars named in settings.
    pub fn from_settings(settings: &CommerceSettings) -> Result<Self> {
        let storefront_token = read_token(&settings.api_token_env)?;
        let store_token = read_token(&settings.store_api_token_env)?;
        Self::new(settings, storefront_token, store_token)
    }

    /// POST a GraphQL document and unwrap the `data` envelope.
    async fn graphql<T: DeserializeOwned>(
        &self,
        config: &CommerceConfig,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(&self.storefront_api_url)
            .bearer_auth(&self.storefront_token)
            .header(header::ACCEPT_LANGUAGE, &config.locale)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| StorefrontError::Network(format!("{}: {e}", self.storefront_api_url)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorefrontError::Api {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        let envelope: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| StorefrontError::decode(format!("storefront response: {e}")))?;

        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(StorefrontError::Api {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        envelope
            .data
            .ok_or_else(|| StorefrontError::decode("storefront response has no data"))
    }
}

#[async_trait]
impl CommerceApi for HttpCommerceClient {
    fn resolve_config(&self, locale: Option<&str>) -> CommerceConfig {
        CommerceConfig {
            locale: locale
                .filter(|l| !l.is_empty())
                .unwrap_or(&self.default_locale)
                .to_string(),
        }
    }

    #[instrument(skip_all, fields(field = %query.field, first = query.first, locale = %config.locale))]
    async fn fetch_products(
        &self,
        query: ProductQuery,
        config: &CommerceConfig,
        preview: bool,
    ) -> Result<ProductList> {
        debug!(preview, "fetching products");

        let document = queries::products_query(query.field);
        let data: SiteData<ProductsSite> = self
            .graphql(config, &document, json!({ "first": query.first }))
            .await?;

        let products = data.site.into_products(query.field).ok_or_else(|| {
            StorefrontError::decode(format!("response is missing site.{}", query.field))
        })?;

        debug!(count = products.len(), "products fetched");
        Ok(products)
    }

    #[instrument(skip_all, fields(locale = %config.locale))]
    async fn fetch_site_info(&self, config: &CommerceConfig, preview: bool) -> Result<SiteInfo> {
        debug!(preview, "fetching site info");

        let data: SiteData<SiteInfoSite> = self
            .graphql(config, queries::SITE_INFO_QUERY, json!({}))
            .await?;

        let info = SiteInfo::from(data.site);
        debug!(
            categories = info.categories.len(),
            brands = info.brands.len(),
            "site info fetched"
        );
        Ok(info)
    }

    #[instrument(skip_all, fields(locale = %config.locale))]
    async fn fetch_pages(&self, config: &CommerceConfig, preview: bool) -> Result<Vec<Page>> {
        debug!(preview, "fetching pages");

        let url = format!("{}/pages", self.content_api_url);
        let response = self
            .client
            .get(&url)
            .header("X-Auth-Token", &self.store_token)
            .header(header::ACCEPT, "application/json")
            .header(header::ACCEPT_LANGUAGE, &config.locale)
            .send()
            .await
            .map_err(|e| StorefrontError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorefrontError::Api {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        let body: PagesResponse = response
            .json()
            .await
            .map_err(|e| StorefrontError::decode(format!("{url}: {e}")))?;

        Ok(body.data.into_iter().map(Page::from).collect())
    }
}

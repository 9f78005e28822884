//! Speshits API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::SpeshitsApi;
use super::models::{ApiEnvelope, Taxon, TaxonQuery};
use super::pagination::{MAX_PAGE_SIZE, Page, PageRequest, StopRule, collect_all_pages};
use super::retry::RetryPolicy;
use super::token::TokenManager;
use crate::error::{Error, Result};

/// Speshits service base URL
const DEFAULT_BASE_URL: &str = "https://speshits.hinature.cn";

/// HTTP request timeout in seconds.
/// 30s rides out slow taxonomy lookups while still failing fast.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`SpeshitsClient`].
///
/// # Example
/// ```ignore
/// let config = ClientConfig::new()
///     .base_url("https://staging.speshits.hinature.cn")
///     .retry_policy(RetryPolicy::new().max_attempts(5));
/// let client = SpeshitsClient::with_config("user", "secret", config)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    base_url: Option<String>,
    retry: RetryPolicy,
    stop_rule: StopRule,
    http: Option<HttpClient>,
}

impl ClientConfig {
    /// Create a configuration with the production defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different service URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    /// Replace the retry policy applied to every operation.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Choose how paginated aggregation decides it has reached the last page.
    pub fn stop_rule(mut self, rule: StopRule) -> Self {
        self.stop_rule = rule;
        self
    }

    /// Supply an existing HTTP transport instead of building one.
    ///
    /// The handle is shared with the token exchange; reqwest clients clone
    /// cheaply and pool connections internally.
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }
}

/// Client for the Speshits taxonomic-data service.
///
/// One instance serves concurrent calls; every method takes `&self`.
pub struct SpeshitsClient {
    http: HttpClient,
    base_url: String,
    retry: RetryPolicy,
    stop_rule: StopRule,
    tokens: TokenManager,
}

impl SpeshitsClient {
    /// Create a client for the production service.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::with_config(username, password, ClientConfig::new())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(
        username: impl Into<String>,
        password: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let http = match config.http {
            Some(http) => http,
            None => HttpClient::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
        };
        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let tokens = TokenManager::new(&base_url, username, password);

        Ok(Self {
            http,
            base_url,
            retry: config.retry,
            stop_rule: config.stop_rule,
            tokens,
        })
    }

    /// Issue a GET under the retry policy and return the parsed envelope.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiEnvelope<T>> {
        self.retry
            .run(|| self.attempt(Method::GET, path, query, None::<&Value>))
            .await
    }

    /// Issue a POST with a JSON body under the retry policy.
    async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        const NO_QUERY: &[(&str, String)] = &[];
        self.retry
            .run(|| self.attempt(Method::POST, path, NO_QUERY, Some(body)))
            .await
    }

    /// One authenticated attempt: obtain a bearer token, send the request,
    /// triage the status, parse the envelope.
    ///
    /// The token exchange happens inside the attempt so a transient failure
    /// during it is retried by the same policy as the data call.
    async fn attempt<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiEnvelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.tokens.bearer_token(&self.http).await?;

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url).bearer_auth(&token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status, body));
        }

        response
            .json::<ApiEnvelope<T>>()
            .await
            .map_err(|e| Error::InvalidResponse(format!("failed to parse response from {path}: {e}")))
    }
}

#[async_trait]
impl SpeshitsApi for SpeshitsClient {
    async fn search_taxons(&self, query: &TaxonQuery, page: &PageRequest) -> Result<Page<Taxon>> {
        query.validate()?;

        let mut params = query.to_query_params();
        params.extend(page.to_query_params());

        let envelope: ApiEnvelope<Vec<Taxon>> = self.get("/v1/taxons/search", &params).await?;
        let total = envelope.total.unwrap_or(0);
        let items = envelope.into_data()?.unwrap_or_default();
        Ok(Page { items, total })
    }

    async fn search_all_taxons(&self, query: &TaxonQuery) -> Result<Vec<Taxon>> {
        query.validate()?;

        collect_all_pages(self.stop_rule, |page| {
            let request = PageRequest::new().page(page).page_size(MAX_PAGE_SIZE);
            async move { self.search_taxons(query, &request).await }
        })
        .await
    }

    async fn get_taxons_by_ids(&self, taxon_ids: &[String], traversal: bool) -> Result<Vec<Taxon>> {
        let mut params: Vec<(&str, String)> = taxon_ids
            .iter()
            .map(|id| ("taxon_ids", id.clone()))
            .collect();
        params.push(("traversal", traversal.to_string()));

        let envelope: ApiEnvelope<Vec<Taxon>> = self.get("/v1/taxons/batch", &params).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    async fn get_taxon_by_id(&self, taxon_id: &str, traversal: bool) -> Result<Option<Taxon>> {
        let params = [
            ("taxon_id", taxon_id.to_string()),
            ("traversal", traversal.to_string()),
        ];
        let envelope: ApiEnvelope<Taxon> = self.get("/v1/taxons", &params).await?;
        envelope.into_data()
    }

    async fn get_taxon_iucn(&self, canonical_name: &str) -> Result<Vec<String>> {
        let params = [("canonicalName", canonical_name.to_string())];
        let envelope: ApiEnvelope<Vec<String>> = self.get("/v1/taxons/iucn", &params).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    async fn get_taxon_cnpw(&self, canonical_name: &str) -> Result<Vec<String>> {
        let params = [("canonicalName", canonical_name.to_string())];
        let envelope: ApiEnvelope<Vec<String>> = self.get("/v1/taxons/cnpw", &params).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    async fn create_taxon(&self, taxon: &Taxon) -> Result<String> {
        let envelope: ApiEnvelope<String> = self.post("/v1/taxons", taxon).await?;
        envelope
            .into_data()?
            .ok_or_else(|| Error::InvalidResponse("create response carried no id".to_string()))
    }
}

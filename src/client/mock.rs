//! Mock Speshits API client for testing
//!
//! Provides a scripted implementation of `SpeshitsApi` for unit tests that
//! must not touch the network.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::SpeshitsApi;
use super::models::{Taxon, TaxonQuery};
use super::pagination::{Page, PageRequest};
use crate::error::{Error, Result};

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockSpeshitsClient::new().with_taxons(vec![tiger()]);
/// let page = mock.search_taxons(&query, &PageRequest::new()).await?;
/// assert_eq!(mock.call_counts().await.search_taxons, 1);
/// ```
#[derive(Default)]
pub struct MockSpeshitsClient {
    /// Taxons served by search and lookup operations
    taxons: Mutex<Vec<Taxon>>,
    /// Scripted search pages (index = page - 1); overrides `taxons` for search
    search_pages: Mutex<Option<Vec<Page<Taxon>>>>,
    /// IUCN categories served by `get_taxon_iucn`
    iucn: Mutex<Vec<String>>,
    /// CNPW levels served by `get_taxon_cnpw`
    cnpw: Mutex<Vec<String>>,
    /// Id returned by `create_taxon`
    created_id: Mutex<Option<String>>,
    /// Error to return (if any) - consumed on first use
    error: Mutex<Option<Error>>,
    /// Track number of calls for verification
    call_counts: Mutex<CallCounts>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub search_taxons: usize,
    pub search_all_taxons: usize,
    pub get_taxons_by_ids: usize,
    pub get_taxon_by_id: usize,
    pub get_taxon_iucn: usize,
    pub get_taxon_cnpw: usize,
    pub create_taxon: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.search_taxons
            + self.search_all_taxons
            + self.get_taxons_by_ids
            + self.get_taxon_by_id
            + self.get_taxon_iucn
            + self.get_taxon_cnpw
            + self.create_taxon
    }
}

impl MockSpeshitsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the taxons served by search and lookup operations.
    pub fn with_taxons(self, taxons: Vec<Taxon>) -> Self {
        *self.taxons.try_lock().unwrap() = taxons;
        self
    }

    /// Script per-page search responses (index = page - 1).
    pub fn with_search_pages(self, pages: Vec<Page<Taxon>>) -> Self {
        *self.search_pages.try_lock().unwrap() = Some(pages);
        self
    }

    /// Set the IUCN categories to return.
    pub fn with_iucn(self, categories: Vec<String>) -> Self {
        *self.iucn.try_lock().unwrap() = categories;
        self
    }

    /// Set the CNPW levels to return.
    pub fn with_cnpw(self, levels: Vec<String>) -> Self {
        *self.cnpw.try_lock().unwrap() = levels;
        self
    }

    /// Set the id returned by `create_taxon`.
    pub fn with_created_id(self, id: impl Into<String>) -> Self {
        *self.created_id.try_lock().unwrap() = Some(id.into());
        self
    }

    /// Fail the next call with the given error.
    pub fn with_error(self, error: Error) -> Self {
        *self.error.try_lock().unwrap() = Some(error);
        self
    }

    /// Snapshot the call counts recorded so far.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_counts.lock().await.clone()
    }

    /// Take the injected error, if one is pending.
    async fn take_error(&self) -> Option<Error> {
        self.error.lock().await.take()
    }
}

#[async_trait]
impl SpeshitsApi for MockSpeshitsClient {
    async fn search_taxons(&self, query: &TaxonQuery, page: &PageRequest) -> Result<Page<Taxon>> {
        self.call_counts.lock().await.search_taxons += 1;
        query.validate()?;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        if let Some(pages) = self.search_pages.lock().await.as_ref() {
            let total = pages.iter().map(|p| p.items.len() as u64).sum();
            return Ok(pages
                .get((page.page - 1) as usize)
                .map(|p| Page {
                    items: p.items.clone(),
                    total: p.total,
                })
                .unwrap_or(Page {
                    items: Vec::new(),
                    total,
                }));
        }

        let taxons = self.taxons.lock().await.clone();
        Ok(Page {
            total: taxons.len() as u64,
            items: taxons,
        })
    }

    async fn search_all_taxons(&self, query: &TaxonQuery) -> Result<Vec<Taxon>> {
        self.call_counts.lock().await.search_all_taxons += 1;
        query.validate()?;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        if let Some(pages) = self.search_pages.lock().await.as_ref() {
            return Ok(pages.iter().flat_map(|p| p.items.clone()).collect());
        }
        Ok(self.taxons.lock().await.clone())
    }

    async fn get_taxons_by_ids(&self, taxon_ids: &[String], _traversal: bool) -> Result<Vec<Taxon>> {
        self.call_counts.lock().await.get_taxons_by_ids += 1;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let taxons = self.taxons.lock().await;
        Ok(taxons
            .iter()
            .filter(|t| {
                t.taxon_id
                    .as_ref()
                    .is_some_and(|id| taxon_ids.contains(id))
            })
            .cloned()
            .collect())
    }

    async fn get_taxon_by_id(&self, taxon_id: &str, _traversal: bool) -> Result<Option<Taxon>> {
        self.call_counts.lock().await.get_taxon_by_id += 1;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let taxons = self.taxons.lock().await;
        Ok(taxons
            .iter()
            .find(|t| t.taxon_id.as_deref() == Some(taxon_id))
            .cloned())
    }

    async fn get_taxon_iucn(&self, _canonical_name: &str) -> Result<Vec<String>> {
        self.call_counts.lock().await.get_taxon_iucn += 1;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self.iucn.lock().await.clone())
    }

    async fn get_taxon_cnpw(&self, _canonical_name: &str) -> Result<Vec<String>> {
        self.call_counts.lock().await.get_taxon_cnpw += 1;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self.cnpw.lock().await.clone())
    }

    async fn create_taxon(&self, _taxon: &Taxon) -> Result<String> {
        self.call_counts.lock().await.create_taxon += 1;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self
            .created_id
            .lock()
            .await
            .clone()
            .unwrap_or_else(|| "mock-taxon-id".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiger() -> Taxon {
        Taxon {
            taxon_id: Some("tx-1".to_string()),
            canonical_name: Some("Panthera tigris".to_string()),
            ..Taxon::default()
        }
    }

    fn query() -> TaxonQuery {
        TaxonQuery::new().canonical_name("Panthera")
    }

    #[tokio::test]
    async fn test_mock_serves_taxons_through_trait() {
        let mock = MockSpeshitsClient::new().with_taxons(vec![tiger()]);
        let api: &dyn SpeshitsApi = &mock;

        let page = api.search_taxons(&query(), &PageRequest::new()).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 1);

        let found = api.get_taxon_by_id("tx-1", false).await.unwrap();
        assert!(found.is_some());
        let missing = api.get_taxon_by_id("tx-9", false).await.unwrap();
        assert!(missing.is_none());

        let counts = mock.call_counts().await;
        assert_eq!(counts.search_taxons, 1);
        assert_eq!(counts.get_taxon_by_id, 2);
        assert_eq!(counts.total(), 3);
    }

    #[tokio::test]
    async fn test_mock_scripted_pages() {
        let mock = MockSpeshitsClient::new().with_search_pages(vec![
            Page {
                items: vec![tiger(), tiger(), tiger()],
                total: 5,
            },
            Page {
                items: vec![tiger(), tiger()],
                total: 5,
            },
        ]);

        let second = mock
            .search_taxons(&query(), &PageRequest::new().page(2))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 2);

        let all = mock.search_all_taxons(&query()).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn test_mock_error_consumed_on_first_use() {
        let mock = MockSpeshitsClient::new()
            .with_iucn(vec!["EN".to_string()])
            .with_error(Error::Api("Invalid parameter".to_string()));

        let err = mock.get_taxon_iucn("Panthera tigris").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter");

        // Error slot is emptied; the next call succeeds.
        let categories = mock.get_taxon_iucn("Panthera tigris").await.unwrap();
        assert_eq!(categories, vec!["EN".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_validates_like_the_real_client() {
        let mock = MockSpeshitsClient::new();
        let err = mock
            .search_taxons(&TaxonQuery::new(), &PageRequest::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_mock_create_returns_configured_id() {
        let mock = MockSpeshitsClient::new().with_created_id("tx-42");
        let id = mock.create_taxon(&tiger()).await.unwrap();
        assert_eq!(id, "tx-42");
    }
}

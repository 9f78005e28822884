//! Speshits API client

use async_trait::async_trait;

use crate::error::Result;

#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;
pub mod retry;
pub mod speshits;
mod token;

#[cfg(test)]
#[allow(unused_imports)]
pub use mock::MockSpeshitsClient;
pub use models::{ApiEnvelope, Taxon, TaxonQuery};
pub use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest, StopRule};
pub use retry::RetryPolicy;
pub use speshits::{ClientConfig, SpeshitsClient};

/// Speshits API client trait
#[async_trait]
pub trait SpeshitsApi: Send + Sync {
    /// Fetch one page of taxons matching the query filters.
    ///
    /// Returns the page's items together with the server-reported total
    /// across all pages.
    async fn search_taxons(&self, query: &TaxonQuery, page: &PageRequest) -> Result<Page<Taxon>>;

    /// Fetch every taxon matching the query filters, page by page.
    async fn search_all_taxons(&self, query: &TaxonQuery) -> Result<Vec<Taxon>>;

    /// Fetch several taxons by id in a single round-trip.
    ///
    /// With `traversal` set the service includes each taxon's ancestry.
    async fn get_taxons_by_ids(&self, taxon_ids: &[String], traversal: bool) -> Result<Vec<Taxon>>;

    /// Fetch a single taxon by id, `None` if the service holds no record.
    async fn get_taxon_by_id(&self, taxon_id: &str, traversal: bool) -> Result<Option<Taxon>>;

    /// IUCN red-list categories recorded for a canonical name.
    async fn get_taxon_iucn(&self, canonical_name: &str) -> Result<Vec<String>>;

    /// Chinese national protected-wildlife levels for a canonical name.
    async fn get_taxon_cnpw(&self, canonical_name: &str) -> Result<Vec<String>>;

    /// Create a taxon record, returning the server-assigned id.
    async fn create_taxon(&self, taxon: &Taxon) -> Result<String>;
}

//! Async client for the Speshits taxonomic-data service.
//!
//! The client authenticates with the OAuth password grant, keeps the bearer
//! token fresh behind the scenes, retries transient network failures, and
//! aggregates paginated search results.
//!
//! # Example
//! ```no_run
//! use speshits_client::{SpeshitsApi, SpeshitsClient, TaxonQuery};
//!
//! # async fn run() -> speshits_client::Result<()> {
//! let client = SpeshitsClient::new("user", "secret")?;
//! let query = TaxonQuery::new().canonical_name("Panthera tigris");
//! let taxons = client.search_all_taxons(&query).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::{
    ClientConfig, Page, PageRequest, RetryPolicy, SpeshitsApi, SpeshitsClient, StopRule, Taxon,
    TaxonQuery,
};
pub use error::{Error, Result};

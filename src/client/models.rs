//! Wire models for the Speshits API

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Uniform response wrapper every Speshits endpoint uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the operation succeeded
    pub success: bool,

    /// Server-supplied failure message (present on failure)
    #[serde(default)]
    pub message: Option<String>,

    /// The payload (shape varies per endpoint)
    #[serde(default)]
    pub data: Option<T>,

    /// Total item count across all pages (list endpoints only)
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, or surface the server's failure message.
    pub fn into_data(self) -> Result<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Error::Api(
                self.message.unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    }
}

/// A taxonomic record.
///
/// Only the fields the client itself reads are typed; everything else the
/// server sends is preserved untouched in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Taxon {
    /// Service-assigned taxon id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxon_id: Option<String>,

    /// Scientific name
    #[serde(rename = "canonicalName", skip_serializing_if = "Option::is_none")]
    pub canonical_name: Option<String>,

    /// Chinese vernacular name
    #[serde(rename = "chineseName", skip_serializing_if = "Option::is_none")]
    pub chinese_name: Option<String>,

    /// Taxonomic rank (species, genus, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,

    /// Remaining fields, passed through as-is
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Name filters for taxon search.
///
/// At least one of the two filters must be set; `validate` enforces this
/// before any network activity.
///
/// # Example
/// ```ignore
/// let query = TaxonQuery::new().canonical_name("Panthera tigris");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaxonQuery {
    /// Scientific name filter
    pub canonical_name: Option<String>,
    /// Chinese vernacular name filter
    pub chinese_name: Option<String>,
}

impl TaxonQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by scientific name.
    pub fn canonical_name(mut self, name: impl Into<String>) -> Self {
        self.canonical_name = Some(name.into());
        self
    }

    /// Filter by Chinese vernacular name.
    pub fn chinese_name(mut self, name: impl Into<String>) -> Self {
        self.chinese_name = Some(name.into());
        self
    }

    /// Reject queries with neither filter set (empty strings count as unset).
    pub fn validate(&self) -> Result<()> {
        let canonical_empty = self.canonical_name.as_deref().is_none_or(str::is_empty);
        let chinese_empty = self.chinese_name.as_deref().is_none_or(str::is_empty);
        if canonical_empty && chinese_empty {
            return Err(Error::Validation(
                "either canonicalName or chineseName must be provided".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert to query string parameters using the service's names.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref name) = self.canonical_name {
            params.push(("canonicalName", name.clone()));
        }
        if let Some(ref name) = self.chinese_name {
            params.push(("chineseName", name.clone()));
        }
        params
    }
}

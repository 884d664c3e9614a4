// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{Result, VandaError};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Facets returned by the clusters endpoint, in the order the service lists them.
pub const CLUSTER_FACETS: [&str; 14] = [
    "category",
    "person",
    "organisation",
    "collection",
    "gallery",
    "style",
    "place",
    "object_type",
    "technique",
    "material",
    "maker",
    "associated",
    "depicts",
    "accession_year",
];

/// Query text plus the page to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text search query.
    pub query: String,
    /// 1-based page number.
    pub page: u32,
    /// Records per page (the service caps this at 100).
    pub page_size: u32,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            page_size: 10,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

impl TryFrom<&Value> for SearchRequest {
    type Error = VandaError;

    /// Builds a request from an untyped JSON query, which must be a string.
    fn try_from(query: &Value) -> Result<Self> {
        match query {
            Value::String(text) => Ok(SearchRequest::new(text.as_str())),
            other => Err(VandaError::TypeMismatch(json_kind(other).to_string())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One catalogue object, reduced to the columns worth showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "Type")]
    pub object_type: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Construction Date")]
    pub construction_date: String,
    #[serde(rename = "Maker")]
    pub maker: Option<String>,
    #[serde(rename = "Association")]
    pub association: Option<String>,
    #[serde(rename = "Primary Location")]
    pub primary_location: String,
    #[serde(rename = "System Number")]
    pub system_number: String,
    #[serde(rename = "Primary Image Id")]
    pub primary_image_id: Option<String>,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        let maker = raw.primary_maker.unwrap_or_default();
        Self {
            object_type: raw.object_type,
            title: raw.primary_title,
            construction_date: raw.primary_date,
            maker: maker.name,
            association: maker.association,
            primary_location: raw.primary_place,
            system_number: raw.system_number,
            primary_image_id: raw.primary_image_id,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    /// Total records matching the query across all pages.
    pub record_count: u64,
    /// Number of pages at the requested page size.
    pub page_count: u64,
    pub records: Vec<Record>,
}

/// Statistics over one page of general search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub num_works: usize,
    pub num_unique_makers: usize,
    pub most_common_location: Option<String>,
    /// Distinct centuries, ascending.
    pub centuries: Vec<i64>,
    /// Distinct object types in first-seen order.
    pub distinct_types: Vec<String>,
}

/// Top term of every facet for a query.
///
/// Facets keep the order the service listed them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSummary {
    /// Total records matching the query.
    pub record_count: u64,
    /// `(facet, highest-ranked term)` pairs.
    pub top_terms: Vec<(String, String)>,
    /// Facets left out because the service returned no terms for them.
    pub skipped: Vec<String>,
}

impl ClusterSummary {
    /// Top term of `facet`, if the service reported one.
    pub fn get(&self, facet: &str) -> Option<&str> {
        self.top_terms
            .iter()
            .find(|(name, _)| name == facet)
            .map(|(_, value)| value.as_str())
    }

    pub fn facets(&self) -> impl Iterator<Item = &str> {
        self.top_terms.iter().map(|(name, _)| name.as_str())
    }
}

// Wire format of the search endpoint.

#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope {
    pub info: SearchInfo,
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchInfo {
    pub record_count: u64,
    #[serde(default)]
    pub pages: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRecord {
    #[serde(rename = "objectType", default, deserialize_with = "null_as_empty")]
    pub object_type: String,
    #[serde(rename = "_primaryTitle", default, deserialize_with = "blank_as_none")]
    pub primary_title: Option<String>,
    #[serde(rename = "_primaryDate", default, deserialize_with = "null_as_empty")]
    pub primary_date: String,
    #[serde(rename = "_primaryMaker", default)]
    pub primary_maker: Option<RawMaker>,
    #[serde(rename = "_primaryPlace", default, deserialize_with = "null_as_empty")]
    pub primary_place: String,
    #[serde(rename = "systemNumber", default, deserialize_with = "null_as_empty")]
    pub system_number: String,
    #[serde(rename = "_primaryImageId", default, deserialize_with = "blank_as_none")]
    pub primary_image_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMaker {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub association: Option<String>,
}

// Wire format of the clusters endpoint. `info` is absent when no query was given.

#[derive(Debug, Deserialize)]
pub(crate) struct ClusterEnvelope {
    pub info: Option<ClusterInfo>,
    #[serde(default, deserialize_with = "in_service_order")]
    pub clusters: Vec<(String, Cluster)>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClusterInfo {
    pub record_count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Cluster {
    #[serde(default)]
    pub terms: Vec<ClusterTerm>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClusterTerm {
    pub value: Value,
}

impl ClusterTerm {
    /// Term value as text; years come back as numbers for some facets.
    pub fn text(&self) -> String {
        match &self.value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// The service sends both `null` and `""` for missing text.
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Reads a JSON object as pairs without reordering its keys.
fn in_service_order<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, Cluster)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, Cluster)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of facet names to clusters")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Cluster>()? {
                pairs.push(entry);
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor)
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// SPDX-License-Identifier: GPL-3.0-or-later

use crate::clusters::summarize_clusters;
use crate::error::{Result, VandaError};
use crate::images::{image_url, ImageOptions};
use crate::mode::{ModeSelector, SearchMode};
use crate::models::{
    ClusterEnvelope, ClusterSummary, PageSummary, Record, SearchEnvelope, SearchRequest,
    SearchResponse,
};
use crate::summary::summarize;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use url::Url;

const VAM_API_BASE: &str = "https://api.vam.ac.uk/v2";
const VAM_IMAGE_BASE: &str = "https://framemark.vam.ac.uk/collections";
const USER_AGENT: &str = concat!("vanda/", env!("CARGO_PKG_VERSION"));

/// Client for the V&A collections search API.
#[derive(Debug, Clone)]
pub struct VandaClient {
    client: Client,
    base_url: String,
    image_base_url: String,
}

impl VandaClient {
    /// Create a new client against the public V&A endpoints.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder() -> VandaClientBuilder {
        VandaClientBuilder::default()
    }

    /// Search the collection, matching the query against the field chosen by `selector`.
    ///
    /// The mode is resolved before any request is made. Returns `None` when
    /// nothing matches.
    ///
    /// # Example
    /// ```no_run
    /// # use vanda_client::{SearchMode, SearchRequest, VandaClient};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = VandaClient::new()?;
    /// let request = SearchRequest::new("China").page_size(20);
    /// if let Some(response) = client.search(&request, SearchMode::General).await? {
    ///     println!("{} records", response.record_count);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(
        &self,
        request: &SearchRequest,
        mut selector: impl ModeSelector,
    ) -> Result<Option<SearchResponse>> {
        let mode = selector.select_mode()?;
        let url = self.search_url(request, mode)?;
        let envelope: SearchEnvelope = self.get(url).await?;

        info!(target: "vanda", "Success!");

        let record_count = envelope.info.record_count;
        let page_count = envelope.info.pages;
        if record_count == 0 {
            info!(target: "vanda", "No results!");
            return Ok(None);
        }

        info!(
            target: "vanda",
            "There are {} objects associated with the query {} and {} different pages",
            record_count, request.query, page_count
        );

        Ok(Some(SearchResponse {
            record_count,
            page_count,
            records: envelope.records.into_iter().map(Record::from).collect(),
        }))
    }

    /// Summary statistics over one page of a general search.
    pub async fn page_summary(&self, request: &SearchRequest) -> Result<Option<PageSummary>> {
        let Some(response) = self.search(request, SearchMode::General).await? else {
            info!(
                target: "vanda",
                "No summary statistics can be computed as there were no results!"
            );
            return Ok(None);
        };

        let summary = summarize(&response.records);
        info!(
            target: "vanda",
            "Search is associated with these many results: {}", summary.num_works
        );
        info!(
            target: "vanda",
            "Search is associated with these many unique makers: {}", summary.num_unique_makers
        );
        info!(
            target: "vanda",
            "Location most associated with search: {}",
            summary.most_common_location.as_deref().unwrap_or("unknown")
        );
        info!(
            target: "vanda",
            "Search contains works created in these centuries: {:?}", summary.centuries
        );
        info!(
            target: "vanda",
            "Search contains these types of works: {:?}", summary.distinct_types
        );

        Ok(Some(summary))
    }

    /// Image-service URLs for every record on a results page that has an image.
    ///
    /// URLs follow record order. An empty list means either no results or no
    /// record with an image id; the two cases are logged differently.
    pub async fn image_urls(
        &self,
        request: &SearchRequest,
        selector: impl ModeSelector,
        options: &ImageOptions,
    ) -> Result<Vec<String>> {
        let Some(response) = self.search(request, selector).await? else {
            return Ok(Vec::new());
        };

        let urls: Vec<String> = response
            .records
            .iter()
            .filter_map(|record| record.primary_image_id.as_deref())
            .map(|id| image_url(&self.image_base_url, id, options))
            .collect();

        if urls.is_empty() {
            warn!(
                target: "vanda",
                "no image ids are associated with the query {}", request.query
            );
        }
        for url in &urls {
            info!(target: "vanda", "{}", url);
        }

        Ok(urls)
    }

    /// Top term of every facet the clusters endpoint reports for `query`.
    pub async fn cluster_summary(&self, query: &str) -> Result<ClusterSummary> {
        if query.trim().is_empty() {
            return Err(VandaError::MissingQuery);
        }

        let mut url = self.endpoint("objects/clusters/search")?;
        url.query_pairs_mut().append_pair("q", query);

        let envelope: ClusterEnvelope = self.get(url).await?;
        let summary = summarize_clusters(envelope)?;

        info!(
            target: "vanda",
            "{} matching object records for query {}:", summary.record_count, query
        );

        Ok(summary)
    }

    fn search_url(&self, request: &SearchRequest, mode: SearchMode) -> Result<Url> {
        let mut url = self.endpoint("objects/search")?;
        url.query_pairs_mut()
            .append_pair(mode.query_param(), &request.query);

        if mode.is_paginated() {
            url.query_pairs_mut()
                .append_pair("page_size", &request.page_size.to_string())
                .append_pair("page", &request.page.to_string());
        }

        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}/{}", self.base_url.trim_end_matches('/'), path))
            .map_err(|e| VandaError::Config(format!("bad base URL {:?}: {}", self.base_url, e)))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        trace!(target: "vanda", "GET {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        debug!(target: "vanda", "response status: {}", status);

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VandaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        trace!(target: "vanda", "response body: {}", body);

        serde_json::from_str(&body).map_err(|e| {
            VandaError::InvalidResponse(format!("Failed to parse response: {}", e))
        })
    }
}

/// Builder for configuring a V&A client.
#[derive(Debug)]
pub struct VandaClientBuilder {
    base_url: String,
    image_base_url: String,
    timeout: Duration,
}

impl Default for VandaClientBuilder {
    fn default() -> Self {
        Self {
            base_url: VAM_API_BASE.to_string(),
            image_base_url: VAM_IMAGE_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl VandaClientBuilder {
    /// Set a custom API base URL (useful for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the prefix image URLs are built on.
    pub fn image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    /// Set request timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the V&A client.
    pub fn build(self) -> Result<VandaClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(VandaClient {
            client,
            base_url: self.base_url,
            image_base_url: self.image_base_url,
        })
    }
}

// SPDX-License-Identifier: GPL-3.0-or-later

//! Victoria & Albert Museum collections API client.
//!
//! This crate wraps the V&A search and clusters endpoints: field-constrained
//! object search, per-page summary statistics, image-service URL
//! construction, and top-term summaries of the collection facets.

pub mod client;
#[cfg(test)]
mod client_tests;
mod clusters;
pub mod error;
pub mod images;
pub mod mode;
pub mod models;
pub mod summary;

pub use client::{VandaClient, VandaClientBuilder};
pub use error::{Result, VandaError};
pub use images::{image_url, ImageOptions};
pub use mode::{ModeSelector, PromptModeSelector, SearchMode};
pub use models::{
    ClusterSummary, PageSummary, Record, SearchRequest, SearchResponse, CLUSTER_FACETS,
};

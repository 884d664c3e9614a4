// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{Result, VandaError};
use crate::models::{Cluster, ClusterEnvelope, ClusterSummary};
use tracing::warn;

/// Reduce a clusters response to the top term of each facet.
///
/// Facets without terms are logged and listed in `skipped`.
pub(crate) fn summarize_clusters(envelope: ClusterEnvelope) -> Result<ClusterSummary> {
    let info = envelope.info.ok_or(VandaError::MissingQuery)?;

    let mut top_terms = Vec::new();
    let mut skipped = Vec::new();

    for (facet, cluster) in &envelope.clusters {
        match top_term(facet, cluster) {
            Ok(value) => {
                top_terms.push((facet.clone(), value));
            }
            Err(err) => {
                warn!(
                    target: "vanda",
                    facet = facet.as_str(),
                    error = %err,
                    "skipping facet"
                );
                skipped.push(facet.clone());
            }
        }
    }

    Ok(ClusterSummary {
        record_count: info.record_count,
        top_terms,
        skipped,
    })
}

fn top_term(facet: &str, cluster: &Cluster) -> Result<String> {
    cluster
        .terms
        .first()
        .map(|term| term.text())
        .ok_or_else(|| VandaError::IndexOutOfRange(facet.to_string()))
}

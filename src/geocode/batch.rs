//! Sequential batch geocoding
//!
//! Addresses are looked up one after another with a fixed pause between
//! requests so public endpoints are not hammered. A failing address is
//! recorded and the batch moves on.

use crate::geocode::{Gateway, GeocodeResult};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of one address in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum BatchOutcome {
    /// The lookup succeeded; `result` is the first hit, if any
    #[serde(rename = "ok")]
    Found {
        address: String,
        result: Option<GeocodeResult>,
    },
    #[serde(rename = "error")]
    Failed { address: String, error: String },
}

impl BatchOutcome {
    pub fn address(&self) -> &str {
        match self {
            BatchOutcome::Found { address, .. } | BatchOutcome::Failed { address, .. } => address,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Found { result: Some(_), .. })
    }
}

/// Geocode every address with `provider`
///
/// `on_progress` is called after each address with the number done so far.
pub async fn geocode_batch<F>(
    gateway: &Gateway,
    addresses: &[String],
    provider: &str,
    delay: Duration,
    mut on_progress: F,
) -> Vec<BatchOutcome>
where
    F: FnMut(usize),
{
    let mut outcomes = Vec::with_capacity(addresses.len());

    for (i, address) in addresses.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let outcome = match gateway.geocode(address, provider).await {
            Ok(results) => {
                debug!(address = %address, hits = results.len(), "batch item done");
                BatchOutcome::Found {
                    address: address.clone(),
                    result: results.into_iter().next(),
                }
            }
            Err(e) => {
                warn!(address = %address, error = %e, "batch item failed");
                BatchOutcome::Failed {
                    address: address.clone(),
                    error: e.to_string(),
                }
            }
        };

        outcomes.push(outcome);
        on_progress(i + 1);
    }

    outcomes
}

/// Split pasted text into addresses, one per non-blank line
pub fn parse_addresses(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

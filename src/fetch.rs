//! Period fetching against the CONDUSEF endpoint.
//!
//! One fetch per period: GET with the fixed section id, the year/month
//! under probe, and the fixed currency filter. Transport problems are
//! never propagated as errors — the scan treats them like absent data —
//! but they come back as a distinct `FetchOutcome` variant so callers can
//! log them apart.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::{EntityPattern, SourceConfig};
use crate::extract;
use crate::types::{FetchOutcome, Period};

/// Source of per-period data.
///
/// The HTTP client below is the production implementation; scan-engine
/// tests substitute deterministic in-memory stubs.
#[async_trait]
pub trait PeriodSource: Send + Sync {
    async fn fetch_period(&self, period: Period) -> FetchOutcome;
}

/// HTTP client for the regulator's public portfolio page.
pub struct CondusefClient {
    http: Client,
    source: SourceConfig,
    entities: Vec<EntityPattern>,
}

impl CondusefClient {
    pub fn new(source: SourceConfig, entities: Vec<EntityPattern>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(source.timeout_secs))
            .user_agent(concat!("sofipo-watch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client for CONDUSEF")?;

        Ok(Self { http, source, entities })
    }
}

#[async_trait]
impl PeriodSource for CondusefClient {
    async fn fetch_period(&self, period: Period) -> FetchOutcome {
        let request = self.http.get(&self.source.url).query(&[
            ("sec", self.source.section.to_string()),
            ("anio_s", period.year.to_string()),
            ("trim_s", period.month.to_string()),
            ("mone_s", self.source.currency.clone()),
        ]);

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => return FetchOutcome::TransportError(e.to_string()),
        };

        if !response.status().is_success() {
            return FetchOutcome::TransportError(format!("HTTP {}", response.status()));
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => return FetchOutcome::TransportError(e.to_string()),
        };

        // An empty/error page never carries the marker; don't bother
        // parsing the table without it.
        if !body.contains(&self.source.marker) {
            debug!(%period, "Response carries no data marker");
            return FetchOutcome::NoData;
        }

        let records = extract::extract_records(&body, &self.entities);
        if records.is_empty() {
            // Marker present but the table held none of the tracked
            // entities. Treated the same as an unpublished period.
            debug!(%period, "Data marker present but no tracked entities found");
            return FetchOutcome::NoData;
        }

        debug!(%period, entities = records.len(), "Period data extracted");
        FetchOutcome::Data(records)
    }
}

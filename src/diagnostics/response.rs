//! Response envelope for callers that serialize a collection.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::collector::DiagnosticsCollector;
use super::error::DiagnosticsError;
use super::selection::Selection;
use super::types::DiagnosticsReport;

/// Diagnostics plus metadata about the collection.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsResponse {
    pub diagnostics: DiagnosticsReport,
    pub metadata: ResponseMetadata,
    /// Seconds spent collecting (including cache lookup)
    #[serde(rename = "executionTime")]
    pub execution_time: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMetadata {
    /// Unix timestamp (seconds) when the collection finished
    pub timestamp: u64,
    pub available_providers: Vec<String>,
}

impl DiagnosticsResponse {
    /// Collect through `collector` and wrap the report.
    pub async fn collect<C>(collector: &C, selection: &Selection) -> Result<Self, DiagnosticsError>
    where
        C: DiagnosticsCollector + ?Sized,
    {
        let start = Instant::now();
        let diagnostics = collector.collect(selection).await?;
        let execution_time = start.elapsed().as_secs_f64();

        Ok(Self {
            diagnostics,
            metadata: ResponseMetadata {
                timestamp: unix_timestamp(),
                available_providers: collector.available_providers(),
            },
            execution_time,
        })
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

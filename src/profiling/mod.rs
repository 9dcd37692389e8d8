//! Table profiling collaborator (display-only statistics)
//!
//! Profiles are consumed by the front-end to help the operator judge a
//! candidate table. They carry no configuration semantics: a profiling
//! failure is reported as "no data available" and the conversation goes on.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Summary statistics for one profiled table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableProfile {
    pub row_count: u64,
    pub column_count: usize,
    /// Null counts per column.
    #[serde(default)]
    pub nulls_by_column: HashMap<String, u64>,
    /// A handful of sample rows as raw JSON objects.
    #[serde(default)]
    pub sample_rows: Vec<serde_json::Value>,
    /// Rendered HTML report, when the backend produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_html: Option<String>,
}

impl TableProfile {
    /// One-line summary for chat display.
    pub fn summary(&self) -> String {
        format!("{} rows across {} columns", self.row_count, self.column_count)
    }
}

/// Errors from the profiling backend.
#[derive(Debug, Error)]
pub enum ProfilingError {
    #[error("source {0} is unavailable: {1}")]
    SourceUnavailable(String, String),
    #[error("profiling query failed: {0}")]
    QueryFailed(String),
    #[error("report generation failed: {0}")]
    ReportFailed(String),
}

/// Profiling collaborator.
#[async_trait]
pub trait TableProfiler: Send + Sync {
    async fn profile(
        &self,
        source: &str,
        schema: &str,
        table: &str,
    ) -> Result<TableProfile, ProfilingError>;
}

//! Canonical ingestion configuration records
//!
//! An [`IngestionConfig`] is immutable once built by the validator. The
//! [`IngestionDocument`] wrapper matches the on-disk document layout: every
//! field nested under a top-level `ingestion` key, in a stable order that
//! keeps committed documents human-diffable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{LoadStrategy, RefreshSchedule};

/// Source side of an ingestion: a registered connection plus schema and table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
    pub schema: String,
    pub table: String,
}

/// Target side of an ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub schema: String,
    pub table: String,
}

/// A fully validated, normalized ingestion pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionConfig {
    pub source: SourceRef,
    pub target: TargetRef,
    pub domain: String,
    #[serde(default)]
    pub description: String,
    pub refresh_schedule: RefreshSchedule,
    pub load_strategy: LoadStrategy,
    pub created_at: DateTime<Utc>,
}

impl IngestionConfig {
    /// One-line summary shown to the operator before confirmation.
    pub fn summary(&self) -> String {
        format!(
            "{}: {}.{}.{} -> {}.{} ({}, {})",
            self.domain,
            self.source.name,
            self.source.schema,
            self.source.table,
            self.target.schema,
            self.target.table,
            self.refresh_schedule,
            self.load_strategy,
        )
    }
}

/// On-disk wrapper for the document committed for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionDocument {
    pub ingestion: IngestionConfig,
}

impl IngestionDocument {
    pub fn new(ingestion: IngestionConfig) -> Self {
        Self { ingestion }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

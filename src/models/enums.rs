//! Controlled vocabularies for ingestion slots
//!
//! Recognition of operator text goes through these tagged enums rather than
//! raw string comparison, so unrecognized input is a distinct, inspectable
//! case instead of a silently absent key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Business domain recognized in operator text.
///
/// The matched domain doubles as the default source and target table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Transactions,
    Sales,
    Inventory,
    Marketing,
    Finance,
}

impl Domain {
    /// Recognition order for the extraction rule (first match wins).
    pub const ALL: [Domain; 5] = [
        Domain::Transactions,
        Domain::Sales,
        Domain::Inventory,
        Domain::Marketing,
        Domain::Finance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Transactions => "transactions",
            Domain::Sales => "sales",
            Domain::Inventory => "inventory",
            Domain::Marketing => "marketing",
            Domain::Finance => "finance",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown domain: {}", s))
    }
}

/// Source database engine keyword recognized in operator text.
///
/// Each engine maps to a fixed, pre-registered source connection identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceEngine {
    MySql,
    MsSql,
    Oracle,
}

impl SourceEngine {
    /// Recognition order for the extraction rule (first match wins).
    pub const ALL: [SourceEngine; 3] = [SourceEngine::MySql, SourceEngine::MsSql, SourceEngine::Oracle];

    /// Keyword searched for in lowercased operator text.
    pub fn keyword(&self) -> &'static str {
        match self {
            SourceEngine::MySql => "mysql",
            SourceEngine::MsSql => "mssql",
            SourceEngine::Oracle => "oracle",
        }
    }

    /// Registered source connection name for this engine.
    pub fn source_name(&self) -> &'static str {
        match self {
            SourceEngine::MySql => "mysql_source",
            SourceEngine::MsSql => "mssql_source",
            SourceEngine::Oracle => "oracle_source",
        }
    }
}

impl fmt::Display for SourceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// How data lands in the target table.
///
/// This vocabulary is strict: an unrecognized strategy is a validation
/// failure, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    Overwrite,
    Incremental,
}

impl LoadStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStrategy::Overwrite => "overwrite",
            LoadStrategy::Incremental => "incremental",
        }
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" | "full load" => Ok(LoadStrategy::Overwrite),
            "incremental" => Ok(LoadStrategy::Incremental),
            other => Err(format!("unknown load strategy: {}", other)),
        }
    }
}

/// Refresh cadence label.
///
/// Unlike [`LoadStrategy`], unknown labels are preserved as [`RefreshSchedule::Custom`]
/// and resolved by the schedule mapper (which applies a documented daily
/// fallback rather than failing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RefreshSchedule {
    OneTime,
    Daily,
    Monthly,
    Quarterly,
    Custom(String),
}

impl RefreshSchedule {
    /// The canonical label, as it appears in configuration documents.
    pub fn label(&self) -> &str {
        match self {
            RefreshSchedule::OneTime => "one-time",
            RefreshSchedule::Daily => "daily",
            RefreshSchedule::Monthly => "monthly",
            RefreshSchedule::Quarterly => "quarterly",
            RefreshSchedule::Custom(label) => label,
        }
    }

    /// Whether this label is one of the four known cadences.
    pub fn is_known(&self) -> bool {
        !matches!(self, RefreshSchedule::Custom(_))
    }
}

impl From<String> for RefreshSchedule {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "one-time" => RefreshSchedule::OneTime,
            "daily" => RefreshSchedule::Daily,
            "monthly" => RefreshSchedule::Monthly,
            "quarterly" => RefreshSchedule::Quarterly,
            _ => RefreshSchedule::Custom(value.trim().to_string()),
        }
    }
}

impl From<RefreshSchedule> for String {
    fn from(value: RefreshSchedule) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for RefreshSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//! Source catalog discovery collaborator
//!
//! The catalog is read-only from the SDK's point of view: it backs selection
//! UIs and existence checks, and its failures degrade to "no data available"
//! without aborting a conversation. Results are never cached beyond one call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One table visible in a registered source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTable {
    pub source_name: String,
    pub schema: String,
    pub table: String,
}

/// Errors from the discovery backend.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("source {0} is unreachable: {1}")]
    Unreachable(String, String),
    #[error("discovery backend error: {0}")]
    Backend(String),
}

/// Filter applied while scanning sources. Both criteria are case-insensitive;
/// an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    /// Substring the table name must contain.
    pub name_contains: Option<String>,
    /// Exact table name.
    pub name_equals: Option<String>,
}

impl TableFilter {
    pub fn contains(fragment: impl Into<String>) -> Self {
        Self {
            name_contains: Some(fragment.into()),
            name_equals: None,
        }
    }

    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            name_contains: None,
            name_equals: Some(name.into()),
        }
    }

    pub fn matches(&self, table: &str) -> bool {
        let lowered = table.to_lowercase();
        if let Some(ref fragment) = self.name_contains
            && !lowered.contains(&fragment.to_lowercase())
        {
            return false;
        }
        if let Some(ref name) = self.name_equals
            && lowered != name.to_lowercase()
        {
            return false;
        }
        true
    }
}

/// Catalog collaborator listing tables across registered sources.
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    async fn list_tables(
        &self,
        filter: Option<&TableFilter>,
    ) -> Result<Vec<SourceTable>, DiscoveryError>;
}

/// Discover tables that look transactional (name contains "transaction").
pub async fn discover_sources<C: SourceCatalog + ?Sized>(
    catalog: &C,
) -> Result<Vec<SourceTable>, DiscoveryError> {
    catalog.list_tables(Some(&TableFilter::contains("transaction"))).await
}

/// Check whether a table with this exact name exists in any source.
pub async fn check_table<C: SourceCatalog + ?Sized>(
    catalog: &C,
    table: &str,
) -> Result<Vec<SourceTable>, DiscoveryError> {
    catalog.list_tables(Some(&TableFilter::exact(table))).await
}

/// In-memory catalog for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tables: Vec<SourceTable>,
}

impl StaticCatalog {
    pub fn new(tables: Vec<SourceTable>) -> Self {
        Self { tables }
    }

    pub fn with_table(
        mut self,
        source_name: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        self.tables.push(SourceTable {
            source_name: source_name.into(),
            schema: schema.into(),
            table: table.into(),
        });
        self
    }
}

#[async_trait]
impl SourceCatalog for StaticCatalog {
    async fn list_tables(
        &self,
        filter: Option<&TableFilter>,
    ) -> Result<Vec<SourceTable>, DiscoveryError> {
        Ok(self
            .tables
            .iter()
            .filter(|t| filter.is_none_or(|f| f.matches(&t.table)))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StaticCatalog {
        StaticCatalog::default()
            .with_table("mysql_finance", "finance", "daily_transactions")
            .with_table("mysql_finance", "finance", "accounts")
            .with_table("postgres_sales", "sales", "Transactions")
    }

    #[tokio::test]
    async fn test_discover_sources_filters_on_substring() {
        let found = discover_sources(&catalog()).await.unwrap();
        let tables: Vec<&str> = found.iter().map(|t| t.table.as_str()).collect();
        assert_eq!(tables, ["daily_transactions", "Transactions"]);
    }

    #[tokio::test]
    async fn test_check_table_is_exact_and_case_insensitive() {
        let found = check_table(&catalog(), "transactions").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source_name, "postgres_sales");

        let missing = check_table(&catalog(), "orders").await.unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_no_filter_lists_everything() {
        let all = catalog().list_tables(None).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}

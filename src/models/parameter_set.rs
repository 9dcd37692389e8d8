//! Accumulated slot values for one onboarding conversation
//!
//! A [`ParameterSet`] is the mutable slot map filled in across turns.
//! Values are stored as raw strings; canonicalization into the controlled
//! vocabularies happens in the validator when a configuration is built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single named configuration slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotField {
    SourceName,
    SourceSchema,
    SourceTable,
    TargetSchema,
    TargetTable,
    Domain,
    Refresh,
    LoadStrategy,
    Description,
}

impl SlotField {
    /// The full slot vocabulary.
    pub const ALL: [SlotField; 9] = [
        SlotField::SourceName,
        SlotField::SourceSchema,
        SlotField::SourceTable,
        SlotField::TargetSchema,
        SlotField::TargetTable,
        SlotField::Domain,
        SlotField::Refresh,
        SlotField::LoadStrategy,
        SlotField::Description,
    ];

    /// Slots that must be filled before a configuration can be built.
    /// Missing slots are always reported back in this order.
    pub const REQUIRED: [SlotField; 6] = [
        SlotField::SourceName,
        SlotField::SourceTable,
        SlotField::TargetTable,
        SlotField::Domain,
        SlotField::Refresh,
        SlotField::LoadStrategy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotField::SourceName => "source_name",
            SlotField::SourceSchema => "source_schema",
            SlotField::SourceTable => "source_table",
            SlotField::TargetSchema => "target_schema",
            SlotField::TargetTable => "target_table",
            SlotField::Domain => "domain",
            SlotField::Refresh => "refresh",
            SlotField::LoadStrategy => "load_strategy",
            SlotField::Description => "description",
        }
    }
}

impl fmt::Display for SlotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable slot map accumulated across conversation turns.
///
/// Last write wins: merging a newer set overwrites any slot the newer set
/// fills, and never clears a slot the newer set leaves empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: SlotField) -> Option<&str> {
        let slot = match field {
            SlotField::SourceName => &self.source_name,
            SlotField::SourceSchema => &self.source_schema,
            SlotField::SourceTable => &self.source_table,
            SlotField::TargetSchema => &self.target_schema,
            SlotField::TargetTable => &self.target_table,
            SlotField::Domain => &self.domain,
            SlotField::Refresh => &self.refresh,
            SlotField::LoadStrategy => &self.load_strategy,
            SlotField::Description => &self.description,
        };
        slot.as_deref()
    }

    /// Set a slot value. Whitespace-only values are ignored rather than
    /// clearing the slot, so partial re-extraction cannot erase progress.
    pub fn set(&mut self, field: SlotField, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        let slot = match field {
            SlotField::SourceName => &mut self.source_name,
            SlotField::SourceSchema => &mut self.source_schema,
            SlotField::SourceTable => &mut self.source_table,
            SlotField::TargetSchema => &mut self.target_schema,
            SlotField::TargetTable => &mut self.target_table,
            SlotField::Domain => &mut self.domain,
            SlotField::Refresh => &mut self.refresh,
            SlotField::LoadStrategy => &mut self.load_strategy,
            SlotField::Description => &mut self.description,
        };
        *slot = Some(trimmed.to_string());
    }

    /// Whether the slot holds a non-empty value.
    pub fn is_set(&self, field: SlotField) -> bool {
        self.get(field).is_some_and(|v| !v.trim().is_empty())
    }

    /// Merge another set into this one, last write wins per slot.
    pub fn merge(&mut self, other: &ParameterSet) {
        for field in SlotField::ALL {
            if let Some(value) = other.get(field) {
                self.set(field, value);
            }
        }
    }

    /// Required slots still unfilled, in [`SlotField::REQUIRED`] order.
    pub fn missing_fields(&self) -> Vec<SlotField> {
        SlotField::REQUIRED
            .into_iter()
            .filter(|field| !self.is_set(*field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut params = ParameterSet::new();
        params.set(SlotField::Domain, "sales");
        assert_eq!(params.get(SlotField::Domain), Some("sales"));
        assert!(params.is_set(SlotField::Domain));
        assert!(!params.is_set(SlotField::Refresh));
    }

    #[test]
    fn test_whitespace_values_are_ignored() {
        let mut params = ParameterSet::new();
        params.set(SlotField::SourceName, "mysql_source");
        params.set(SlotField::SourceName, "   ");
        assert_eq!(params.get(SlotField::SourceName), Some("mysql_source"));
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut base = ParameterSet::new();
        base.set(SlotField::Domain, "sales");
        base.set(SlotField::Refresh, "daily");

        let mut update = ParameterSet::new();
        update.set(SlotField::Domain, "finance");

        base.merge(&update);
        assert_eq!(base.get(SlotField::Domain), Some("finance"));
        // Slots the update leaves empty are untouched.
        assert_eq!(base.get(SlotField::Refresh), Some("daily"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut base = ParameterSet::new();
        base.set(SlotField::SourceName, "mysql_source");

        let mut update = ParameterSet::new();
        update.set(SlotField::Domain, "transactions");
        update.set(SlotField::LoadStrategy, "incremental");

        let mut once = base.clone();
        once.merge(&update);
        let mut twice = once.clone();
        twice.merge(&update);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_fields_follow_required_order() {
        let mut params = ParameterSet::new();
        params.set(SlotField::Domain, "sales");
        params.set(SlotField::SourceTable, "sales");
        params.set(SlotField::TargetTable, "sales");

        assert_eq!(
            params.missing_fields(),
            vec![SlotField::SourceName, SlotField::Refresh, SlotField::LoadStrategy]
        );
        assert!(!params.is_complete());
    }

    #[test]
    fn test_complete_set_has_no_missing_fields() {
        let mut params = ParameterSet::new();
        params.set(SlotField::SourceName, "mysql_source");
        params.set(SlotField::SourceTable, "transactions");
        params.set(SlotField::TargetTable, "transactions");
        params.set(SlotField::Domain, "transactions");
        params.set(SlotField::Refresh, "daily");
        params.set(SlotField::LoadStrategy, "incremental");

        assert!(params.is_complete());
        assert!(params.missing_fields().is_empty());
    }
}

//! Building and validating canonical ingestion configurations
//!
//! The validator re-checks required slots independently of dialogue state:
//! a caller that skips the state machine still cannot build an incomplete
//! configuration.

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    IngestionConfig, LoadStrategy, ParameterSet, RefreshSchedule, SlotField, SourceRef, TargetRef,
};

/// Catalog schema assumed when the operator does not name a source schema.
pub const DEFAULT_SOURCE_SCHEMA: &str = "ai_tdv_finacle";

/// Analytics schema assumed when the operator does not name a target schema.
pub const DEFAULT_TARGET_SCHEMA: &str = "analytics11";

/// Errors that can occur while building a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required slots are empty, in reporting order.
    #[error("missing required fields: {}", format_fields(.0))]
    MissingFields(Vec<SlotField>),

    /// The load strategy is not in the controlled vocabulary. Unlike the
    /// refresh label, there is no fallback for this slot.
    #[error("unrecognized load strategy '{0}' (expected 'overwrite' or 'incremental')")]
    UnknownLoadStrategy(String),
}

fn format_fields(fields: &[SlotField]) -> String {
    fields.iter().map(SlotField::as_str).collect::<Vec<_>>().join(", ")
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Build a canonical [`IngestionConfig`] from accumulated slots.
///
/// Applies schema and description defaults, normalizes casing on the
/// controlled vocabularies, and stamps `created_at`.
pub fn build_config(params: &ParameterSet) -> ValidationResult<IngestionConfig> {
    let missing = params.missing_fields();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let raw_strategy = required(params, SlotField::LoadStrategy)?;
    let load_strategy: LoadStrategy = raw_strategy
        .parse()
        .map_err(|_| ValidationError::UnknownLoadStrategy(raw_strategy.to_string()))?;

    let refresh_schedule = RefreshSchedule::from(required(params, SlotField::Refresh)?.to_string());

    let config = IngestionConfig {
        source: SourceRef {
            name: required(params, SlotField::SourceName)?.to_string(),
            schema: params
                .get(SlotField::SourceSchema)
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_SOURCE_SCHEMA.to_string()),
            table: required(params, SlotField::SourceTable)?.to_string(),
        },
        target: TargetRef {
            schema: params
                .get(SlotField::TargetSchema)
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_TARGET_SCHEMA.to_string()),
            table: required(params, SlotField::TargetTable)?.to_string(),
        },
        domain: required(params, SlotField::Domain)?.to_lowercase(),
        description: params.get(SlotField::Description).unwrap_or("").to_string(),
        refresh_schedule,
        load_strategy,
        created_at: Utc::now(),
    };

    debug!(summary = %config.summary(), "built ingestion configuration");
    Ok(config)
}

/// Re-validate an already-built configuration, e.g. one loaded from disk.
pub fn validate_config(config: &IngestionConfig) -> ValidationResult<()> {
    let mut missing = Vec::new();
    let checks: [(SlotField, &str); 4] = [
        (SlotField::SourceName, &config.source.name),
        (SlotField::SourceTable, &config.source.table),
        (SlotField::TargetTable, &config.target.table),
        (SlotField::Domain, &config.domain),
    ];
    for (field, value) in checks {
        if value.trim().is_empty() {
            missing.push(field);
        }
    }
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }
    Ok(())
}

fn required(params: &ParameterSet, field: SlotField) -> ValidationResult<&str> {
    params
        .get(field)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ValidationError::MissingFields(vec![field]))
}

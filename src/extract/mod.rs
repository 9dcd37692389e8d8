//! Deterministic slot extraction from operator free text
//!
//! Keyword rules only - the LLM collaborator is never consulted here, so the
//! same utterance always yields the same slots. Each rule inspects the
//! lowercased text independently and contributes at most one slot group;
//! absence of a match leaves the slot unset. No rule can fail.

use crate::models::{Domain, LoadStrategy, ParameterSet, RefreshSchedule, SlotField, SourceEngine};

/// Extract a partial [`ParameterSet`] from one utterance.
pub fn extract(text: &str) -> ParameterSet {
    let lowered = text.to_lowercase();
    let mut params = ParameterSet::new();
    apply_domain_rule(&lowered, &mut params);
    apply_source_engine_rule(&lowered, &mut params);
    apply_load_strategy_rule(&lowered, &mut params);
    apply_refresh_rule(&lowered, &mut params);
    params
}

/// First domain keyword found sets the domain and defaults both table names
/// to it, unless a table name is already present.
fn apply_domain_rule(lowered: &str, params: &mut ParameterSet) {
    for domain in Domain::ALL {
        if lowered.contains(domain.as_str()) {
            params.set(SlotField::Domain, domain.as_str());
            if !params.is_set(SlotField::SourceTable) {
                params.set(SlotField::SourceTable, domain.as_str());
            }
            if !params.is_set(SlotField::TargetTable) {
                params.set(SlotField::TargetTable, domain.as_str());
            }
            break;
        }
    }
}

fn apply_source_engine_rule(lowered: &str, params: &mut ParameterSet) {
    for engine in SourceEngine::ALL {
        if lowered.contains(engine.keyword()) {
            params.set(SlotField::SourceName, engine.source_name());
            break;
        }
    }
}

fn apply_load_strategy_rule(lowered: &str, params: &mut ParameterSet) {
    if lowered.contains("full load") || lowered.contains("overwrite") {
        params.set(SlotField::LoadStrategy, LoadStrategy::Overwrite.as_str());
    } else if lowered.contains("incremental") {
        params.set(SlotField::LoadStrategy, LoadStrategy::Incremental.as_str());
    }
}

fn apply_refresh_rule(lowered: &str, params: &mut ParameterSet) {
    let refresh = if lowered.contains("daily") {
        Some(RefreshSchedule::Daily)
    } else if lowered.contains("monthly") {
        Some(RefreshSchedule::Monthly)
    } else if lowered.contains("quarterly") {
        Some(RefreshSchedule::Quarterly)
    } else if lowered.contains("one-time") || lowered.contains("once") {
        Some(RefreshSchedule::OneTime)
    } else {
        None
    };
    if let Some(refresh) = refresh {
        params.set(SlotField::Refresh, refresh.label());
    }
}

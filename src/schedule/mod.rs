//! Mapping refresh labels to orchestrator schedule expressions
//!
//! The mapping table is fixed. Unknown labels fall back to the daily cadence
//! as documented business policy, but the fallback is reported explicitly so
//! callers that need an exact match can detect it instead of discovering a
//! silently daily pipeline later.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::RefreshSchedule;

/// Cron expression for the first day of each quarter.
pub const QUARTERLY_CRON: &str = "0 0 1 */3 *";

/// Orchestrator-native schedule expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleExpression {
    /// No automatic schedule; the pipeline only runs when triggered.
    Unscheduled,
    /// Cron expression or cron alias understood by the orchestrator.
    Cron(String),
}

impl ScheduleExpression {
    fn cron(expr: &str) -> Self {
        ScheduleExpression::Cron(expr.to_string())
    }

    /// Literal form substituted into the generated DAG source:
    /// a bare `None` or a single-quoted cron string.
    pub fn as_dag_literal(&self) -> String {
        match self {
            ScheduleExpression::Unscheduled => "None".to_string(),
            ScheduleExpression::Cron(expr) => format!("'{}'", expr),
        }
    }
}

/// Result of mapping one refresh label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleMapping {
    pub expression: ScheduleExpression,
    /// True when the label was not recognized and the daily fallback applied.
    pub fallback_applied: bool,
}

/// Map a refresh label to its schedule expression. Total: unknown labels
/// resolve to the daily cadence with `fallback_applied` set.
pub fn map_schedule(refresh: &RefreshSchedule) -> ScheduleMapping {
    match refresh {
        RefreshSchedule::OneTime => ScheduleMapping {
            expression: ScheduleExpression::Unscheduled,
            fallback_applied: false,
        },
        RefreshSchedule::Daily => ScheduleMapping {
            expression: ScheduleExpression::cron("@daily"),
            fallback_applied: false,
        },
        RefreshSchedule::Monthly => ScheduleMapping {
            expression: ScheduleExpression::cron("@monthly"),
            fallback_applied: false,
        },
        RefreshSchedule::Quarterly => ScheduleMapping {
            expression: ScheduleExpression::cron(QUARTERLY_CRON),
            fallback_applied: false,
        },
        RefreshSchedule::Custom(label) => {
            warn!(label = %label, "unrecognized refresh label, falling back to daily cadence");
            ScheduleMapping {
                expression: ScheduleExpression::cron("@daily"),
                fallback_applied: true,
            }
        }
    }
}

//! Rendering canonical configurations into reviewable and executable artifacts
//!
//! One confirmed configuration yields two texts: the YAML document that goes
//! up for review, and the generated Airflow DAG source. The DAG comes from a
//! fixed template in which every placeholder is bound for every input, so a
//! well-formed configuration always renders to a syntactically complete DAG
//! with no leftover markers.

use thiserror::Error;
use tracing::info;

use crate::models::{IngestionConfig, IngestionDocument};
use crate::schedule::map_schedule;

/// Fixed template for the generated DAG source. Placeholders use the
/// `{{name}}` form and are all substituted unconditionally.
const DAG_TEMPLATE: &str = r#""""Generated ingestion DAG. Do not edit by hand."""
from datetime import datetime

from airflow import DAG
from airflow.operators.python import PythonOperator

SOURCE_CONN_ID = "{{source_conn}}"
TARGET_CONN_ID = "{{target_conn}}"

with DAG(
    dag_id="{{dag_id}}",
    schedule_interval={{schedule}},
    start_date=datetime(2024, 1, 1),
    catchup=False,
    tags=["ingestion", "generated"],
) as dag:

    def _copy_table(**context):
        from ingestion_tasks import copy_table

        copy_table(
            source_conn_id=SOURCE_CONN_ID,
            target_conn_id=TARGET_CONN_ID,
            source_schema="{{source_schema}}",
            source_table="{{source_table}}",
            target_schema="{{target_schema}}",
            target_table="{{target_table}}",
        )

    ingest = PythonOperator(
        task_id="copy_{{source_table}}",
        python_callable=_copy_table,
    )
"#;

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize configuration document: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Everything produced from one confirmed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Unique DAG identifier: `ingest__{source_name}__{target_table}`.
    pub dag_id: String,
    /// Generated orchestrator source.
    pub dag_source: String,
    /// YAML document committed for review.
    pub config_document: String,
    /// True when the refresh label was unrecognized and the schedule fell
    /// back to the daily cadence.
    pub schedule_fallback: bool,
}

/// DAG identifier for a configuration. Pure in (source.name, target.table).
pub fn dag_id(config: &IngestionConfig) -> String {
    format!("ingest__{}__{}", config.source.name, config.target.table)
}

/// Symbolic orchestrator connection reference for a named endpoint. Resolved
/// to real credentials on the orchestrator side, never here.
pub fn connection_ref(name: &str) -> String {
    format!("conn_{}", name)
}

/// Render a configuration into its review document and DAG source.
pub fn render(config: &IngestionConfig) -> RenderResult<RenderedArtifact> {
    let id = dag_id(config);
    let mapping = map_schedule(&config.refresh_schedule);
    let schedule_literal = mapping.expression.as_dag_literal();

    // The target connection is derived from the target schema, not the
    // source name: the two endpoints are distinct connections.
    let source_conn = connection_ref(&config.source.name);
    let target_conn = connection_ref(&config.target.schema);

    let dag_source = substitute(
        DAG_TEMPLATE,
        &[
            ("dag_id", id.as_str()),
            ("schedule", schedule_literal.as_str()),
            ("source_conn", source_conn.as_str()),
            ("target_conn", target_conn.as_str()),
            ("source_schema", config.source.schema.as_str()),
            ("source_table", config.source.table.as_str()),
            ("target_schema", config.target.schema.as_str()),
            ("target_table", config.target.table.as_str()),
        ],
    );

    let config_document = IngestionDocument::new(config.clone()).to_yaml()?;

    info!(
        dag_id = %id,
        schedule = %schedule_literal,
        fallback = mapping.fallback_applied,
        "rendered ingestion artifact"
    );

    Ok(RenderedArtifact {
        dag_id: id,
        dag_source,
        config_document,
        schedule_fallback: mapping.fallback_applied,
    })
}

fn substitute(template: &str, bindings: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in bindings {
        out = out.replace(&format!("{{{{{}}}}}", name), value);
    }
    out
}

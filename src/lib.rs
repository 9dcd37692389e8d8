//! Data Onboarding SDK - conversational configuration compiler for ingestion pipelines
//!
//! Provides unified building blocks for:
//! - Deterministic slot extraction from operator free text
//! - Multi-turn dialogue state tracking (missing fields, confirmation)
//! - Validation and normalization into canonical ingestion configurations
//! - Schedule label mapping and Airflow DAG rendering
//! - Idempotent publishing of configurations as pull requests

pub mod cli;
pub mod conversation;
pub mod dialogue;
pub mod discovery;
pub mod extract;
pub mod llm;
pub mod models;
pub mod profiling;
pub mod publish;
pub mod render;
pub mod schedule;
pub mod validation;

// Re-export commonly used types
pub use conversation::{ConversationError, ConversationManager, ConversationReply};
pub use dialogue::{DialogueSession, DialogueState, Signal, TurnOutcome};
pub use discovery::{DiscoveryError, SourceCatalog, SourceTable, StaticCatalog, TableFilter};
pub use extract::extract;
pub use llm::{ChatClient, ChatMessage, CompletionError, Role};
#[cfg(feature = "api-backend")]
pub use llm::OllamaChatClient;
pub use models::{
    Domain, IngestionConfig, IngestionDocument, LoadStrategy, ParameterSet, RefreshSchedule,
    SlotField, SourceEngine, SourceRef, TargetRef,
};
pub use profiling::{ProfilingError, TableProfile, TableProfiler};
#[cfg(feature = "api-backend")]
pub use publish::GitHubHost;
pub use publish::{
    PublishError, PublishGateway, PublishOutcome, PullRequestLocation, VcsError, VcsHost,
};
pub use render::{RenderError, RenderedArtifact, dag_id, render};
pub use schedule::{ScheduleExpression, ScheduleMapping, map_schedule};
pub use validation::{ValidationError, build_config, validate_config};

//! Models module for the SDK
//!
//! Defines the core data structures for conversational pipeline onboarding:
//! the slot vocabulary, the accumulated parameter set, and the canonical
//! ingestion configuration record.

pub mod config;
pub mod enums;
pub mod parameter_set;

pub use config::{IngestionConfig, IngestionDocument, SourceRef, TargetRef};
pub use enums::{Domain, LoadStrategy, RefreshSchedule, SourceEngine};
pub use parameter_set::{ParameterSet, SlotField};

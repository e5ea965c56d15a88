//! # Credpipe Core
//!
//! Core library for the credpipe harvest pipeline. Provides the
//! registry HTTP client, the tabular artifact model, the ingestion /
//! cleaning / transformation stages, configuration, and error types.

pub mod artifact;
pub mod clean;
pub mod config;
pub mod continent;
pub mod error;
pub mod features;
pub mod ingest;
pub mod pipeline;
pub mod registry;
pub mod table;

// Re-export commonly used types at the crate root.
pub use artifact::{ColumnType, Schema, read_table, write_table};
pub use clean::Cleaner;
pub use config::{ApiConfig, PathsConfig, PipelineConfig, load_config};
pub use error::{CredpipeError, Result, Stage};
pub use features::{FeatureDeriver, percentage};
pub use ingest::{CreditAggregator, GoalFlattener, PaginatedFetcher};
pub use pipeline::Pipeline;
pub use registry::{
    CreditProduct, CreditStatusTotal, GoalEntry, ProjectRecord, RegistryClient, RegistrySource,
};
pub use table::{Table, Value};

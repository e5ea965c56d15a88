//! Error types for the credpipe core library.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering transport, decoding, table schema, and computation domains.
//! Every stage-level failure aborts the run; the `Stage` wrapper names
//! the stage so a diagnostic can be read without re-running.

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, CredpipeError>;

/// Pipeline stage names carried in error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingestion,
    Cleaning,
    Transformation,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Ingestion => write!(f, "ingestion"),
            Stage::Cleaning => write!(f, "cleaning"),
            Stage::Transformation => write!(f, "transformation"),
        }
    }
}

/// Top-level error type for the credpipe core library.
#[derive(Debug, thiserror::Error)]
pub enum CredpipeError {
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<CredpipeError>,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CredpipeError {
    /// Wrap this error with the stage it occurred in.
    pub fn in_stage(self, stage: Stage) -> Self {
        CredpipeError::Stage {
            stage,
            source: Box::new(self),
        }
    }
}

/// Errors from HTTP interactions with the registry.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("page limit of {limit} exceeded without reaching an empty page")]
    PageLimitExceeded { limit: u32 },
}

/// Errors from decoding registry response bodies.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from reading a table under a declared schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("expected column '{column}' is absent")]
    MissingColumn { column: String },

    #[error("column '{column}' row {row}: expected {expected}, found '{found}'")]
    TypeMismatch {
        column: String,
        row: usize,
        expected: &'static str,
        found: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors from derived-feature computation over cleaned data.
#[derive(Debug, thiserror::Error)]
pub enum ComputationError {
    #[error("no continent mapping for country code '{code}' (row id {id})")]
    UnknownCountry { code: String, id: i64 },

    #[error("non-numeric value in '{column}' at row {row}")]
    NonNumeric { column: String, row: usize },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

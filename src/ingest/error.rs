use thiserror::Error;

/// A raw feed that cannot be turned into records.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("feed has no header row")]
    MissingHeader,

    #[error("line {line}: invalid date '{value}'")]
    InvalidDate { line: usize, value: String },

    #[error("line {line}: invalid dose event: {source}")]
    InvalidEvent {
        line: usize,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

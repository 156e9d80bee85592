use thiserror::Error;

/// Problems with a single fragment record.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected at least 4 tab-separated fields, found {found}")]
    MissingFields { found: usize },

    #[error("invalid {field} coordinate: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum FeatureSetError {
    #[error("Error parsing line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Window size must be greater than zero")]
    InvalidWindowSize,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FeatureSetError>;

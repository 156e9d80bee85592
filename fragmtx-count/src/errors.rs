use std::io;

use fragmtx_core::RecordError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CountError {
    /// A fragment line could not be parsed. Aborts the scan.
    #[error("Malformed fragment record at line {line}: {source}")]
    MalformedRecord { line: usize, source: RecordError },

    #[error("Matrix has shape {rows}x{cols} but {barcodes} barcodes and {features} feature names were given")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        barcodes: usize,
        features: usize,
    },

    #[error("Invalid compressed row structure: {0}")]
    Structure(String),

    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, CountError>;

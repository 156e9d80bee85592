pub use fragmtx_core::consts::DEFAULT_COMMENT;

pub const DEFAULT_OUTPUT_PREFIX: &str = "fragmtx";
pub const PROGRESS_UPDATE_INTERVAL: u64 = 10_000;
pub const MATRIX_MARKET_HEADER: &str = "%%MatrixMarket matrix coordinate integer general";

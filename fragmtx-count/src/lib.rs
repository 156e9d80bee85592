//! # fragmtx-count
//!
//! Builds a barcode-by-feature count matrix from a single-cell ATAC fragments file in one
//! pass. Fragments and features must both be sorted by chromosome group, then start; the
//! [OverlapScanner] walks them in lockstep with a cursor that only ever moves forward.
//!
//! ```no_run
//! use fragmtx_count::*;
//! use fragmtx_core::models::FeatureSet;
//!
//! # fn main() -> fragmtx_count::Result<()> {
//! let features = FeatureSet::from_bed("peaks.bed", None).unwrap();
//! let ranks = build_chromosome_ranks(&features.features);
//!
//! let barcodes = derive_barcodes(FragmentReader::from_path("fragments.tsv.gz", "#")?)?;
//! let barcodes = BarcodeIndex::new(barcodes);
//!
//! let fragments = FragmentReader::from_path("fragments.tsv.gz", "#")?;
//! let counts = scan(fragments, &features.features, &ranks, &barcodes, Backend::Sparse)?;
//! let matrix = to_compressed_row_form(&counts)?;
//! # Ok(())
//! # }
//! ```
pub mod accumulator;
pub mod barcodes;
pub mod config;
pub mod consts;
pub mod errors;
pub mod matrix_market;
pub mod ranks;
pub mod reader;
pub mod scanner;

// re-exports
pub use accumulator::*;
pub use barcodes::*;
pub use config::*;
pub use errors::*;
pub use matrix_market::*;
pub use ranks::*;
pub use reader::*;
pub use scanner::*;

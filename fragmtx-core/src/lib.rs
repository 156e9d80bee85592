//! # fragmtx-core
//!
//! Core data models shared by the fragmtx crates: single-cell [Fragment](models::Fragment)
//! records, genomic [Feature](models::Feature) intervals and the sorted
//! [FeatureSet](models::FeatureSet) that count matrices are built against.
//!
//! Feature sets can be built from a peak BED file, from the `gene` records of a GTF
//! annotation, or by tiling a genome into fixed-size windows. All three constructors return
//! features sorted by chromosome (case-insensitive), start and end, which is the order the
//! overlap scanner in `fragmtx-count` expects.
pub mod consts;
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::*;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use log::info;
use sprs::CsMat;

use crate::consts::MATRIX_MARKET_HEADER;
use crate::errors::{CountError, Result};

fn gz_writer(path: &str) -> Result<BufWriter<GzEncoder<File>>> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(BufWriter::new(GzEncoder::new(file, Compression::default())))
}

/// Write one value per line to a gzipped file.
pub fn write_lines_gz<S: AsRef<str>>(path: &str, lines: &[S]) -> Result<()> {
    let mut writer = gz_writer(path)?;
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }
    writer.into_inner().map_err(|e| e.into_error())?.finish()?;
    Ok(())
}

///
/// Write a barcode-by-feature count matrix in Matrix Market format.
///
/// Three files are written:
/// - {prefix}_matrix.mtx.gz: sparse triplets (row, col, value), 1-based, row-major
/// - {prefix}_barcodes.tsv.gz: one barcode per row
/// - {prefix}_features.tsv.gz: one feature name per column
///
/// # Arguments
/// * `matrix` - CSR matrix, rows are barcodes and columns are features
/// * `barcodes` - row names
/// * `feature_names` - column names
/// * `output_prefix` - Prefix for output files
pub fn write_csr_to_mtx(
    matrix: &CsMat<u32>,
    barcodes: &[String],
    feature_names: &[String],
    output_prefix: &str,
) -> Result<()> {
    let (rows, cols) = matrix.shape();
    if rows != barcodes.len() || cols != feature_names.len() || !matrix.is_csr() {
        return Err(CountError::ShapeMismatch {
            rows,
            cols,
            barcodes: barcodes.len(),
            features: feature_names.len(),
        });
    }

    // 1. matrix.mtx.gz
    let mtx_path = format!("{}_matrix.mtx.gz", output_prefix);
    let mut mtx_writer = gz_writer(&mtx_path)?;

    writeln!(mtx_writer, "{}", MATRIX_MARKET_HEADER)?;
    writeln!(mtx_writer, "{} {} {}", rows, cols, matrix.nnz())?;

    for (row_idx, row) in matrix.outer_iterator().enumerate() {
        for (col_idx, value) in row.iter() {
            writeln!(mtx_writer, "{} {} {}", row_idx + 1, col_idx + 1, value)?;
        }
    }
    mtx_writer.into_inner().map_err(|e| e.into_error())?.finish()?;

    // 2. barcodes.tsv.gz
    write_lines_gz(&format!("{}_barcodes.tsv.gz", output_prefix), barcodes)?;

    // 3. features.tsv.gz
    write_lines_gz(&format!("{}_features.tsv.gz", output_prefix), feature_names)?;

    info!(
        "Wrote {}x{} matrix with {} nonzero entries to {}",
        rows,
        cols,
        matrix.nnz(),
        mtx_path
    );

    Ok(())
}

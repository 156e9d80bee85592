use fxhash::FxHashMap;
use sprs::CsMat;

use crate::config::Backend;
use crate::errors::{CountError, Result};

///
/// Target of the hit events emitted by the overlap scanner.
///
/// Counts only ever go up. Once the scan is done the table is frozen into compressed
/// sparse row form: rows are barcodes, columns are feature positions.
///
pub trait CountAccumulator {
    fn increment(&mut self, barcode_idx: usize, feature_idx: usize);

    /// `(n_barcodes, n_features)`
    fn shape(&self) -> (usize, usize);

    fn get(&self, barcode_idx: usize, feature_idx: usize) -> u32;

    fn to_compressed_row_form(&self) -> Result<CsMat<u32>>;
}

fn build_csr(
    shape: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<u32>,
) -> Result<CsMat<u32>> {
    CsMat::try_new(shape, indptr, indices, data)
        .map_err(|(_, _, _, e)| CountError::Structure(format!("{:?}", e)))
}

///
/// Row-major `rows x cols` grid. O(1) increments, memory grows with the full grid.
///
#[derive(Debug, Clone, PartialEq)]
pub struct DenseCounts {
    data: Vec<u32>,
    rows: usize,
    cols: usize,
}

impl DenseCounts {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0; rows * cols],
            rows,
            cols,
        }
    }
}

impl CountAccumulator for DenseCounts {
    #[inline]
    fn increment(&mut self, row: usize, col: usize) {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] += 1;
        }
    }

    fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn get(&self, row: usize, col: usize) -> u32 {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col]
        } else {
            0
        }
    }

    fn to_compressed_row_form(&self) -> Result<CsMat<u32>> {
        let mut indptr = Vec::with_capacity(self.rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        indptr.push(0);
        for row in 0..self.rows {
            let values = &self.data[row * self.cols..(row + 1) * self.cols];
            for (col, &value) in values.iter().enumerate() {
                if value > 0 {
                    indices.push(col);
                    data.push(value);
                }
            }
            indptr.push(indices.len());
        }

        build_csr(self.shape(), indptr, indices, data)
    }
}

///
/// List-of-lists accumulator: one map of touched columns per barcode.
///
#[derive(Debug, Clone, PartialEq)]
pub struct SparseCounts {
    rows: Vec<FxHashMap<usize, u32>>,
    cols: usize,
}

impl SparseCounts {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![FxHashMap::default(); rows],
            cols,
        }
    }

    /// Number of distinct nonzero cells.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum()
    }
}

impl CountAccumulator for SparseCounts {
    #[inline]
    fn increment(&mut self, row: usize, col: usize) {
        if col < self.cols {
            if let Some(counts) = self.rows.get_mut(row) {
                *counts.entry(col).or_insert(0) += 1;
            }
        }
    }

    fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols)
    }

    fn get(&self, row: usize, col: usize) -> u32 {
        self.rows
            .get(row)
            .and_then(|counts| counts.get(&col))
            .copied()
            .unwrap_or(0)
    }

    fn to_compressed_row_form(&self) -> Result<CsMat<u32>> {
        let nnz = self.nnz();
        let mut indptr = Vec::with_capacity(self.rows.len() + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut data = Vec::with_capacity(nnz);

        indptr.push(0);
        for counts in &self.rows {
            let mut entries: Vec<(usize, u32)> = counts.iter().map(|(&c, &v)| (c, v)).collect();
            entries.sort_unstable_by_key(|&(col, _)| col);
            for (col, value) in entries {
                indices.push(col);
                data.push(value);
            }
            indptr.push(indices.len());
        }

        build_csr(self.shape(), indptr, indices, data)
    }
}

///
/// A count table with its backend chosen at runtime.
///
#[derive(Debug, Clone, PartialEq)]
pub enum CountTable {
    Dense(DenseCounts),
    Sparse(SparseCounts),
}

impl CountTable {
    pub fn new(backend: Backend, rows: usize, cols: usize) -> Self {
        match backend {
            Backend::Dense => CountTable::Dense(DenseCounts::new(rows, cols)),
            Backend::Sparse => CountTable::Sparse(SparseCounts::new(rows, cols)),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            CountTable::Dense(_) => Backend::Dense,
            CountTable::Sparse(_) => Backend::Sparse,
        }
    }
}

impl CountAccumulator for CountTable {
    #[inline]
    fn increment(&mut self, barcode_idx: usize, feature_idx: usize) {
        match self {
            CountTable::Dense(counts) => counts.increment(barcode_idx, feature_idx),
            CountTable::Sparse(counts) => counts.increment(barcode_idx, feature_idx),
        }
    }

    fn shape(&self) -> (usize, usize) {
        match self {
            CountTable::Dense(counts) => counts.shape(),
            CountTable::Sparse(counts) => counts.shape(),
        }
    }

    fn get(&self, barcode_idx: usize, feature_idx: usize) -> u32 {
        match self {
            CountTable::Dense(counts) => counts.get(barcode_idx, feature_idx),
            CountTable::Sparse(counts) => counts.get(barcode_idx, feature_idx),
        }
    }

    fn to_compressed_row_form(&self) -> Result<CsMat<u32>> {
        match self {
            CountTable::Dense(counts) => counts.to_compressed_row_form(),
            CountTable::Sparse(counts) => counts.to_compressed_row_form(),
        }
    }
}

///
/// Freeze a finished count table into compressed sparse row form.
///
pub fn to_compressed_row_form(table: &CountTable) -> Result<CsMat<u32>> {
    table.to_compressed_row_form()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn fill<A: CountAccumulator>(counts: &mut A) {
        for (row, col) in [(0, 2), (2, 0), (0, 2), (2, 3), (0, 0), (2, 0), (2, 0)] {
            counts.increment(row, col);
        }
    }

    #[rstest]
    #[case(Backend::Dense)]
    #[case(Backend::Sparse)]
    fn test_csr_layout(#[case] backend: Backend) {
        let mut table = CountTable::new(backend, 3, 4);
        fill(&mut table);

        let csr = to_compressed_row_form(&table).unwrap();
        assert_eq!(csr.shape(), (3, 4));
        assert_eq!(csr.indptr().raw_storage(), &[0, 2, 2, 4]);
        assert_eq!(csr.indices(), &[0, 2, 0, 3]);
        assert_eq!(csr.data(), &[1, 2, 3, 1]);
    }

    #[rstest]
    fn test_backends_agree() {
        let mut dense = DenseCounts::new(3, 4);
        let mut sparse = SparseCounts::new(3, 4);
        fill(&mut dense);
        fill(&mut sparse);

        assert_eq!(sparse.nnz(), 4);
        assert_eq!(dense.get(2, 0), sparse.get(2, 0));
        assert_eq!(
            dense.to_compressed_row_form().unwrap(),
            sparse.to_compressed_row_form().unwrap()
        );
    }

    #[rstest]
    #[case(Backend::Dense, 0, 5)]
    #[case(Backend::Sparse, 0, 5)]
    #[case(Backend::Dense, 4, 0)]
    #[case(Backend::Sparse, 4, 0)]
    fn test_degenerate_shapes(#[case] backend: Backend, #[case] rows: usize, #[case] cols: usize) {
        let table = CountTable::new(backend, rows, cols);
        let csr = table.to_compressed_row_form().unwrap();
        assert_eq!(csr.shape(), (rows, cols));
        assert_eq!(csr.nnz(), 0);
    }

    #[rstest]
    fn test_out_of_range_increment_is_ignored() {
        let mut table = CountTable::new(Backend::Sparse, 1, 1);
        table.increment(1, 0);
        table.increment(0, 1);
        assert_eq!(table.to_compressed_row_form().unwrap().nnz(), 0);
    }
}

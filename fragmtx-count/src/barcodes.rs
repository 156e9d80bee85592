use std::io::BufRead;

use fragmtx_core::RecordError;
use fxhash::{FxHashMap, FxHashSet};
use log::{info, warn};

use crate::errors::{CountError, Result};
use crate::reader::FragmentReader;

///
/// The barcode universe of a count matrix: barcode -> row index.
///
/// Row index is the position of the barcode in the list it was built from.
///
#[derive(Debug, Clone, Default)]
pub struct BarcodeIndex {
    barcodes: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl BarcodeIndex {
    ///
    /// Index `barcodes` as given. If a barcode is listed twice the later position wins and
    /// the earlier row stays empty.
    ///
    pub fn new(barcodes: Vec<String>) -> Self {
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        for (i, barcode) in barcodes.iter().enumerate() {
            if index.insert(barcode.clone(), i).is_some() {
                warn!("Barcode {} is listed more than once, using its last position", barcode);
            }
        }

        BarcodeIndex { barcodes, index }
    }

    #[inline]
    pub fn get(&self, barcode: &str) -> Option<usize> {
        self.index.get(barcode).copied()
    }

    /// Number of rows, duplicates included.
    pub fn len(&self) -> usize {
        self.barcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barcodes.is_empty()
    }

    pub fn barcodes(&self) -> &[String] {
        &self.barcodes
    }
}

impl FromIterator<String> for BarcodeIndex {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        BarcodeIndex::new(iter.into_iter().collect())
    }
}

///
/// Collect the distinct barcodes (4th column) of a fragments file.
///
/// Barcodes come back in the order they are first seen.
///
/// # Arguments
/// - fragments: reader over the fragments file
pub fn derive_barcodes<R: BufRead>(mut fragments: FragmentReader<R>) -> Result<Vec<String>> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut barcodes: Vec<String> = Vec::new();

    while let Some(line) = fragments.next_line()? {
        match line.split('\t').nth(3) {
            Some(barcode) => {
                if !seen.contains(barcode) {
                    seen.insert(barcode.to_string());
                    barcodes.push(barcode.to_string());
                }
            }
            None => {
                let found = line.split('\t').count();
                return Err(CountError::MalformedRecord {
                    line: fragments.line_number(),
                    source: RecordError::MissingFields { found },
                });
            }
        }
    }

    info!("Found {} barcodes", barcodes.len());

    Ok(barcodes)
}

use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::{FeatureSetError, Result};

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> io::Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).map_err(|e| {
        io::Error::new(e.kind(), format!("Failed to open file {:?}: {}", path, e))
    })?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Get a reader for either a gzipped, non-gzipped file, or stdin
///
/// # Arguments
///
/// - file_path: path to the file to read, or '-' for stdin
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> io::Result<BufReader<Box<dyn Read>>> {
    if file_path_str == "-" {
        Ok(BufReader::new(Box::new(io::stdin()) as Box<dyn Read>))
    } else {
        get_dynamic_reader(Path::new(file_path_str))
    }
}

///
/// Read a chrom sizes file (`name<TAB>length` per line), keeping the file order.
///
/// # Arguments
/// - path: path to the chrom sizes file, optionally gzipped
pub fn read_chrom_sizes<T: AsRef<Path>>(path: T) -> Result<Vec<(String, u32)>> {
    let reader = get_dynamic_reader(path.as_ref())?;
    let mut chrom_sizes = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let (Some(chrom), Some(size)) = (parts.next(), parts.next()) else {
            return Err(FeatureSetError::Parse {
                line: index + 1,
                reason: format!("expected `name<TAB>length`, got {:?}", line),
            });
        };

        let size = size.parse::<u32>().map_err(|_| FeatureSetError::Parse {
            line: index + 1,
            reason: format!("invalid chromosome length: {:?}", size),
        })?;

        chrom_sizes.push((chrom.to_string(), size));
    }

    Ok(chrom_sizes)
}

///
/// Read a list of barcodes, one per line. Blank lines are ignored.
pub fn read_barcode_list<T: AsRef<Path>>(path: T) -> io::Result<Vec<String>> {
    let reader = get_dynamic_reader(path.as_ref())?;
    let mut barcodes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let barcode = line.trim();
        if !barcode.is_empty() {
            barcodes.push(barcode.to_string());
        }
    }
    Ok(barcodes)
}

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use fragmtx_core::models::Fragment;
use fragmtx_core::utils::get_dynamic_reader;
use indicatif::ProgressBar;

use crate::consts::PROGRESS_UPDATE_INTERVAL;
use crate::errors::{CountError, Result};

///
/// Lazy, forward-only reader of fragment records.
///
/// A leading block of comment lines is skipped; comments are only looked for until the
/// first data line. Whether lines need whitespace trimming is decided once from the first
/// data line: a 4 column file carries the barcode in its last column, so every line is
/// trimmed; files with more columns are split as they are.
///
pub struct FragmentReader<R> {
    reader: R,
    comment: String,
    buf: String,
    line_number: usize,
    in_header: bool,
    trim: Option<bool>,
    records: u64,
    progress: Option<ProgressBar>,
}

impl FragmentReader<BufReader<Box<dyn Read>>> {
    ///
    /// Open a fragments file, gzipped or not.
    ///
    /// # Arguments
    /// - path: path to the fragments file
    /// - comment: marker of the leading comment block
    pub fn from_path<P: AsRef<Path>>(path: P, comment: &str) -> Result<Self> {
        let reader = get_dynamic_reader(path.as_ref())?;
        Ok(FragmentReader::new(reader, comment))
    }
}

impl<R: BufRead> FragmentReader<R> {
    pub fn new(reader: R, comment: &str) -> Self {
        FragmentReader {
            reader,
            comment: comment.to_string(),
            buf: String::new(),
            line_number: 0,
            in_header: true,
            trim: None,
            records: 0,
            progress: None,
        }
    }

    /// Tick `progress` for every record read.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// 1-based number of the last line read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    ///
    /// Advance to the next data line and return it, with the line terminator (or, in trim
    /// mode, surrounding whitespace) removed. Returns `None` at the end of the stream.
    ///
    pub fn next_line(&mut self) -> Result<Option<&str>> {
        let (start, end) = loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            if self.in_header {
                if !self.comment.is_empty() && self.buf.starts_with(self.comment.as_str()) {
                    continue;
                }
                self.in_header = false;
            }

            if self.buf.trim().is_empty() {
                continue;
            }

            let trim = *self
                .trim
                .get_or_insert_with(|| self.buf.trim().split('\t').count() == 4);

            if trim {
                let start = self.buf.len() - self.buf.trim_start().len();
                break (start, self.buf.trim_end().len());
            }
            break (0, self.buf.trim_end_matches(['\n', '\r']).len());
        };

        self.records += 1;
        if let Some(progress) = &self.progress {
            if self.records % PROGRESS_UPDATE_INTERVAL == 0 {
                progress.set_message(format!("Processed {} fragments", self.records));
            }
            progress.inc(1);
        }

        Ok(Some(&self.buf[start..end]))
    }
}

impl<R: BufRead> Iterator for FragmentReader<R> {
    type Item = Result<Fragment>;

    fn next(&mut self) -> Option<Self::Item> {
        let parsed = match self.next_line() {
            Ok(Some(line)) => Fragment::from_fields(line.split('\t')),
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };

        Some(parsed.map_err(|source| CountError::MalformedRecord {
            line: self.line_number,
            source,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fragmtx_core::RecordError;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn read_all(input: &str, comment: &str) -> Result<Vec<Fragment>> {
        FragmentReader::new(input.as_bytes(), comment).collect()
    }

    #[rstest]
    fn test_skips_leading_comments_only() {
        let input = "# id=pbmc\n# pipeline=cellranger-atac\nchr1\t10\t20\tA\t1\nchr1\t15\t30\tB\t2\n";
        let fragments = read_all(input, "#").unwrap();
        assert_eq!(
            fragments,
            vec![
                Fragment::new("chr1", 10, 20, "A"),
                Fragment::new("chr1", 15, 30, "B"),
            ]
        );
    }

    #[rstest]
    fn test_comment_after_data_is_malformed() {
        let input = "chr1\t10\t20\tA\t1\n# late comment\n";
        let err = read_all(input, "#").unwrap_err();
        assert!(matches!(
            err,
            CountError::MalformedRecord {
                line: 2,
                source: RecordError::MissingFields { found: 1 }
            }
        ));
    }

    #[rstest]
    fn test_four_column_file_is_trimmed() {
        let input = "chr1\t10\t20\tA \r\nchr1\t15\t30\tB\t\n";
        let fragments = read_all(input, "#").unwrap();
        assert_eq!(fragments[0].barcode, "A");
        assert_eq!(fragments[1].barcode, "B");
    }

    #[rstest]
    fn test_crlf_five_column_file() {
        let input = "chr1\t10\t20\tA\t1\r\nchr1\t15\t30\tB\t2\r\n";
        let fragments = read_all(input, "#").unwrap();
        assert_eq!(fragments[1], Fragment::new("chr1", 15, 30, "B"));
    }

    #[rstest]
    fn test_custom_comment_marker() {
        let input = "@header\nchr1\t1\t2\tA\n";
        let fragments = read_all(input, "@").unwrap();
        assert_eq!(fragments.len(), 1);
    }

    #[rstest]
    fn test_blank_lines_are_skipped() {
        let input = "chr1\t1\t2\tA\n\nchr1\t3\t4\tA\n\n";
        let fragments = read_all(input, "#").unwrap();
        assert_eq!(fragments.len(), 2);
    }

    #[rstest]
    fn test_blank_line_does_not_decide_trimming() {
        let input = "#c\n\nchr1\t1\t2\tA \nchr1\t3\t4\tA\n";
        let fragments = read_all(input, "#").unwrap();
        assert_eq!(
            fragments,
            vec![Fragment::new("chr1", 1, 2, "A"), Fragment::new("chr1", 3, 4, "A")]
        );
    }

    #[rstest]
    fn test_reports_line_number_of_bad_record() {
        let input = "#c\nchr1\t1\t2\tA\nchr1\t3\tfour\tA\n";
        let err = read_all(input, "#").unwrap_err();
        assert!(matches!(err, CountError::MalformedRecord { line: 3, .. }));
    }

    #[rstest]
    fn test_empty_input() {
        assert!(read_all("", "#").unwrap().is_empty());
        assert!(read_all("# only comments\n", "#").unwrap().is_empty());
    }
}

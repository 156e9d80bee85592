use std::str::FromStr;

use crate::errors::RecordError;

///
/// One sequenced DNA fragment tagged with the barcode of the cell it came from.
///
/// Only the first four columns of a fragments file are used; read support and any extra
/// columns are ignored.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Fragment {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub barcode: String,
}

impl Fragment {
    pub fn new(chr: &str, start: u32, end: u32, barcode: &str) -> Self {
        Fragment {
            chr: chr.to_string(),
            start,
            end,
            barcode: barcode.to_string(),
        }
    }

    ///
    /// Build a fragment from already split fields: chrom, start, end, barcode, ...
    ///
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut fields = fields.into_iter();
        let mut take = |found: usize| fields.next().ok_or(RecordError::MissingFields { found });

        let chr = take(0)?;
        let start = take(1)?;
        let end = take(2)?;
        let barcode = take(3)?;

        Ok(Fragment {
            chr: chr.to_string(),
            start: parse_coordinate("start", start)?,
            end: parse_coordinate("end", end)?,
            barcode: barcode.to_string(),
        })
    }
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<u32, RecordError> {
    value
        .parse::<u32>()
        .map_err(|_| RecordError::InvalidCoordinate {
            field,
            value: value.to_string(),
        })
}

impl FromStr for Fragment {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fragment::from_fields(s.trim().split('\t'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_parse_five_columns() {
        let fragment = Fragment::from_str("chr1\t100\t250\tAAACGA-1\t3\n").unwrap();
        assert_eq!(fragment, Fragment::new("chr1", 100, 250, "AAACGA-1"));
    }

    #[rstest]
    fn test_parse_four_columns_with_crlf() {
        let fragment = Fragment::from_str("chr2\t5\t9\tbc1\r\n").unwrap();
        assert_eq!(fragment.barcode, "bc1");
    }

    #[rstest]
    #[case("chr1\t100\t250", RecordError::MissingFields { found: 3 })]
    #[case("chr1", RecordError::MissingFields { found: 1 })]
    #[case("chr1\tabc\t250\tbc1", RecordError::InvalidCoordinate { field: "start", value: "abc".to_string() })]
    #[case("chr1\t1\t-5\tbc1", RecordError::InvalidCoordinate { field: "end", value: "-5".to_string() })]
    fn test_malformed(#[case] line: &str, #[case] expected: RecordError) {
        assert_eq!(Fragment::from_str(line).unwrap_err(), expected);
    }
}

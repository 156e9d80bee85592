use std::cmp::Ordering;
use std::fmt::{self, Display};

///
/// A genomic interval that fragments are counted against: a peak, a gene body or a window.
///
/// Coordinates are treated as a closed interval `[start, end]` when testing overlaps, so a
/// fragment that only touches a boundary still counts.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Feature {
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

impl Feature {
    pub fn new(chr: &str, start: u32, end: u32) -> Self {
        Feature {
            chr: chr.to_string(),
            start,
            end,
        }
    }

    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Closed-interval overlap with `[start, end]`.
    #[inline]
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        end >= self.start && start <= self.end
    }

    /// Order used for count matrices: chromosome case-insensitively, then start, then end.
    pub fn sort_cmp(&self, other: &Feature) -> Ordering {
        self.chr
            .to_lowercase()
            .cmp(&other.chr.to_lowercase())
            .then(self.start.cmp(&other.start))
            .then(self.end.cmp(&other.end))
    }

    /// `chr_start_end`, the default feature name in matrix output.
    pub fn name(&self) -> String {
        format!("{}_{}_{}", self.chr, self.start, self.end)
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chr, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(100, 200, true)]
    #[case(100, 199, false)]
    #[case(300, 400, true)]
    #[case(301, 400, false)]
    #[case(250, 250, true)]
    #[case(0, 1000, true)]
    fn test_closed_overlap(#[case] start: u32, #[case] end: u32, #[case] expected: bool) {
        let feature = Feature::new("chr1", 200, 300);
        assert_eq!(feature.overlaps(start, end), expected);
    }

    #[rstest]
    fn test_sort_cmp_is_case_insensitive() {
        let a = Feature::new("Chr1", 500, 600);
        let b = Feature::new("chr1", 100, 200);
        let c = Feature::new("chr10", 0, 10);
        assert_eq!(a.sort_cmp(&b), Ordering::Greater);
        assert_eq!(b.sort_cmp(&c), Ordering::Less);
    }
}

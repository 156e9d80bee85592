use std::io::BufRead;
use std::path::Path;

use log::debug;

use crate::errors::{FeatureSetError, Result};
use crate::models::Feature;
use crate::utils::get_dynamic_reader;

///
/// FeatureSet struct, an ordered list of features plus one name per feature. A name is
/// the feature's row in the `features.tsv` output.
///
/// Feature position in `features` is the column index of the count matrix, so every
/// constructor here returns the set already sorted (see [FeatureSet::sort]).
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureSet {
    pub features: Vec<Feature>,
    pub names: Vec<String>,
}

impl FeatureSet {
    ///
    /// Create a feature set, naming each feature `chr_start_end`.
    ///
    pub fn new(features: Vec<Feature>) -> Self {
        let names = features.iter().map(Feature::name).collect();
        FeatureSet { features, names }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Feature, &String)> {
        self.features.iter().zip(self.names.iter())
    }

    ///
    /// Sort by chromosome (case-insensitive), start, then end. Names move with their features.
    ///
    pub fn sort(&mut self) {
        let mut paired: Vec<(Feature, String)> = self
            .features
            .drain(..)
            .zip(self.names.drain(..))
            .collect();

        paired.sort_by_cached_key(|(f, _)| (f.chr.to_lowercase(), f.start, f.end));

        let (features, names) = paired.into_iter().unzip();
        self.features = features;
        self.names = names;
    }

    ///
    /// Read peaks from a (possibly gzipped) BED file.
    ///
    /// Only the first three columns are used. Comment lines are skipped, and a first line whose
    /// start column is not a number is treated as a header.
    ///
    /// # Arguments
    /// - path: path to the bed file
    /// - normalized_peak_size: recentre every peak on its midpoint with this total width
    pub fn from_bed<P: AsRef<Path>>(path: P, normalized_peak_size: Option<u32>) -> Result<Self> {
        let reader = get_dynamic_reader(path.as_ref())?;

        let mut features = Vec::new();
        let mut names = Vec::new();
        let mut seen_data = false;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split('\t');
            let chr = parts.next().unwrap_or_default();
            let (Some(start), Some(end)) = (parts.next(), parts.next()) else {
                return Err(FeatureSetError::Parse {
                    line: index + 1,
                    reason: format!("expected at least 3 columns, got {:?}", line),
                });
            };

            let start = match start.trim().parse::<u32>() {
                Ok(start) => start,
                Err(_) if !seen_data => {
                    debug!("Skipping header line in BED file: {}", line);
                    seen_data = true;
                    continue;
                }
                Err(_) => {
                    return Err(FeatureSetError::Parse {
                        line: index + 1,
                        reason: format!("invalid start position: {:?}", start),
                    });
                }
            };
            seen_data = true;

            let end = end
                .trim()
                .parse::<u32>()
                .map_err(|_| FeatureSetError::Parse {
                    line: index + 1,
                    reason: format!("invalid end position: {:?}", end),
                })?;

            let feature = Feature::new(chr, start, end);
            names.push(feature.name());

            let feature = match normalized_peak_size {
                Some(size) => normalize_peak(feature, size),
                None => feature,
            };
            features.push(feature);
        }

        let mut set = FeatureSet { features, names };
        set.sort();
        Ok(set)
    }

    ///
    /// Tile every chromosome into consecutive, non-overlapping windows.
    ///
    /// Windows are closed intervals `[k * w, min((k + 1) * w, len) - 1]`.
    ///
    /// # Arguments
    /// - chrom_sizes: chromosome names and lengths
    /// - window_size: width of each window in bp
    pub fn from_windows(chrom_sizes: &[(String, u32)], window_size: u32) -> Result<Self> {
        if window_size == 0 {
            return Err(FeatureSetError::InvalidWindowSize);
        }

        let mut features = Vec::new();
        for (chr, size) in chrom_sizes {
            let mut start = 0_u32;
            while start < *size {
                let end = start.saturating_add(window_size).min(*size);
                features.push(Feature::new(chr, start, end - 1));
                start = end;
            }
        }

        let mut set = FeatureSet::new(features);
        set.sort();
        Ok(set)
    }
}

///
/// Recentre a peak on its midpoint and give it a fixed width.
///
/// The midpoint is rounded half-to-even; the new start is clipped at zero.
fn normalize_peak(feature: Feature, size: u32) -> Feature {
    let extension = size.div_ceil(2);
    let width = feature.end.saturating_sub(feature.start);
    let half = feature.start + width / 2;
    let mid = if width % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half
    };

    Feature {
        chr: feature.chr,
        start: mid.saturating_sub(extension),
        end: mid + extension,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_sort_keeps_names_aligned() {
        let mut set = FeatureSet {
            features: vec![
                Feature::new("chr2", 10, 20),
                Feature::new("Chr1", 50, 60),
                Feature::new("chr1", 5, 9),
            ],
            names: vec!["c".into(), "b".into(), "a".into()],
        };
        set.sort();

        assert_eq!(set.names, vec!["a", "b", "c"]);
        assert_eq!(set.features[0], Feature::new("chr1", 5, 9));
    }

    #[rstest]
    #[case(100, 200, 10, 145, 155)]
    #[case(0, 101, 10, 45, 55)] // mid 50.5 rounds to 50
    #[case(0, 103, 10, 47, 57)] // mid 51.5 rounds to 52
    #[case(0, 4, 10, 0, 7)]
    #[case(100, 200, 5, 147, 153)]
    fn test_normalize_peak(
        #[case] start: u32,
        #[case] end: u32,
        #[case] size: u32,
        #[case] new_start: u32,
        #[case] new_end: u32,
    ) {
        let peak = normalize_peak(Feature::new("chr1", start, end), size);
        assert_eq!((peak.start, peak.end), (new_start, new_end));
    }

    #[rstest]
    fn test_windows() {
        let sizes = vec![("chr2".to_string(), 10), ("chr1".to_string(), 25)];
        let set = FeatureSet::from_windows(&sizes, 10).unwrap();

        assert_eq!(
            set.features,
            vec![
                Feature::new("chr1", 0, 9),
                Feature::new("chr1", 10, 19),
                Feature::new("chr1", 20, 24),
                Feature::new("chr2", 0, 9),
            ]
        );
        assert_eq!(set.names[2], "chr1_20_24");
    }

    #[rstest]
    fn test_windows_zero_size() {
        let sizes = vec![("chr1".to_string(), 25)];
        assert!(matches!(
            FeatureSet::from_windows(&sizes, 0),
            Err(FeatureSetError::InvalidWindowSize)
        ));
    }
}

use std::fmt::{self, Display};

use fragmtx_core::models::{Feature, Fragment};
use log::{debug, info};

use crate::accumulator::{CountAccumulator, CountTable};
use crate::barcodes::BarcodeIndex;
use crate::config::Backend;
use crate::errors::Result;
use crate::ranks::ChromosomeRanks;

/// Outcome of feeding one fragment to the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStep {
    Continue,
    /// The cursor ran off the end of the feature list: no later fragment can overlap.
    Exhausted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub fragments: u64,
    pub unknown_barcode: u64,
    pub unknown_chromosome: u64,
    pub behind_cursor: u64,
    pub no_overlap: u64,
    pub hits: u64,
    pub exhausted: bool,
}

impl Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fragments, {} hits ({} unknown barcode, {} unknown chromosome, {} behind cursor, {} without overlap{})",
            self.fragments,
            self.hits,
            self.unknown_barcode,
            self.unknown_chromosome,
            self.behind_cursor,
            self.no_overlap,
            if self.exhausted { ", features exhausted" } else { "" }
        )
    }
}

///
/// Sorted merge-join of fragments against features.
///
/// The scanner holds one cursor into the feature list. It starts at 0 and only ever moves
/// forward, across all fragments of the stream, so a whole scan costs
/// `O(fragments + features)`. This requires both inputs to be sorted by chromosome rank,
/// then start.
///
pub struct OverlapScanner<'a> {
    features: &'a [Feature],
    feature_ranks: Vec<usize>,
    ranks: &'a ChromosomeRanks,
    barcodes: &'a BarcodeIndex,
    cursor: usize,
    stats: ScanStats,
}

impl<'a> OverlapScanner<'a> {
    pub fn new(
        features: &'a [Feature],
        ranks: &'a ChromosomeRanks,
        barcodes: &'a BarcodeIndex,
    ) -> Self {
        // features on a chromosome missing from `ranks` sort after everything
        let feature_ranks = features
            .iter()
            .map(|f| ranks.get(&f.chr).unwrap_or(usize::MAX))
            .collect();

        OverlapScanner {
            features,
            feature_ranks,
            ranks,
            barcodes,
            cursor: 0,
            stats: ScanStats::default(),
        }
    }

    /// Current position of the feature cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn into_stats(self) -> ScanStats {
        self.stats
    }

    fn exhaust(&mut self) -> ScanStep {
        self.stats.exhausted = true;
        ScanStep::Exhausted
    }

    ///
    /// Feed the next fragment of the stream, incrementing `counts` once for every feature it
    /// overlaps.
    ///
    pub fn process<A>(&mut self, fragment: &Fragment, counts: &mut A) -> ScanStep
    where
        A: CountAccumulator + ?Sized,
    {
        let n_features = self.features.len();
        if self.cursor >= n_features {
            return self.exhaust();
        }
        self.stats.fragments += 1;

        let Some(row) = self.barcodes.get(&fragment.barcode) else {
            self.stats.unknown_barcode += 1;
            return ScanStep::Continue;
        };

        let Some(chrom_rank) = self.ranks.get(&fragment.chr) else {
            self.stats.unknown_chromosome += 1;
            return ScanStep::Continue;
        };

        let cursor_rank = self.feature_ranks[self.cursor];
        if chrom_rank < cursor_rank {
            self.stats.behind_cursor += 1;
            return ScanStep::Continue;
        }

        if chrom_rank > cursor_rank {
            while self.cursor < n_features && chrom_rank > self.feature_ranks[self.cursor] {
                self.cursor += 1;
            }
            if self.cursor >= n_features {
                return self.exhaust();
            }
            // only reachable when the features are not grouped by chromosome
            if self.feature_ranks[self.cursor] != chrom_rank {
                self.stats.no_overlap += 1;
                return ScanStep::Continue;
            }
        }

        let feature = &self.features[self.cursor];

        // fragment in front of the feature: a later fragment may still reach it
        if fragment.end < feature.start {
            self.stats.no_overlap += 1;
            return ScanStep::Continue;
        }

        // fragment past the feature: move the cursor up to it
        if fragment.start > feature.end {
            while self.cursor < n_features
                && fragment.start > self.features[self.cursor].end
                && self.feature_ranks[self.cursor] == chrom_rank
            {
                self.cursor += 1;
            }

            if self.cursor >= n_features {
                return self.exhaust();
            }

            if self.feature_ranks[self.cursor] != chrom_rank
                || fragment.end < self.features[self.cursor].start
            {
                self.stats.no_overlap += 1;
                return ScanStep::Continue;
            }
        }

        self.emit_hits(row, chrom_rank, fragment, counts);

        ScanStep::Continue
    }

    /// Count the cursor feature and every following feature on the same chromosome that
    /// still overlaps. Does not move the cursor.
    fn emit_hits<A>(&mut self, row: usize, chrom_rank: usize, fragment: &Fragment, counts: &mut A)
    where
        A: CountAccumulator + ?Sized,
    {
        counts.increment(row, self.cursor);
        self.stats.hits += 1;

        let mut idx = self.cursor + 1;
        while idx < self.features.len()
            && self.feature_ranks[idx] == chrom_rank
            && self.features[idx].overlaps(fragment.start, fragment.end)
        {
            counts.increment(row, idx);
            self.stats.hits += 1;
            idx += 1;
        }
    }
}

///
/// Count fragment overlaps for every barcode and feature.
///
/// # Arguments
/// - fragments: fragment stream, sorted like `features`
/// - features: features sorted by chromosome group, then start
/// - ranks: chromosome ranks built from `features`
/// - barcodes: the barcode universe; other barcodes are ignored
/// - backend: dense or sparse accumulation
pub fn scan<I>(
    fragments: I,
    features: &[Feature],
    ranks: &ChromosomeRanks,
    barcodes: &BarcodeIndex,
    backend: Backend,
) -> Result<CountTable>
where
    I: IntoIterator<Item = Result<Fragment>>,
{
    scan_with_stats(fragments, features, ranks, barcodes, backend).map(|(counts, _)| counts)
}

///
/// Same as [scan], also returning what happened to the fragments.
///
/// A malformed record aborts the scan and no table is returned. Once the feature list is
/// exhausted the rest of the stream is not read.
pub fn scan_with_stats<I>(
    fragments: I,
    features: &[Feature],
    ranks: &ChromosomeRanks,
    barcodes: &BarcodeIndex,
    backend: Backend,
) -> Result<(CountTable, ScanStats)>
where
    I: IntoIterator<Item = Result<Fragment>>,
{
    let mut counts = CountTable::new(backend, barcodes.len(), features.len());
    let mut scanner = OverlapScanner::new(features, ranks, barcodes);

    for fragment in fragments {
        let fragment = fragment?;
        if scanner.process(&fragment, &mut counts) == ScanStep::Exhausted {
            debug!("Feature list exhausted, skipping the rest of the fragments");
            break;
        }
    }

    let stats = scanner.into_stats();
    info!("Scanned {}", stats);

    Ok((counts, stats))
}

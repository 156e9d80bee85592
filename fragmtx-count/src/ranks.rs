use fragmtx_core::models::Feature;
use fxhash::FxHashMap;

///
/// Chromosome name -> rank, by first appearance in a sorted feature list.
///
/// Ranks stand in for chromosome names in every ordering comparison of the scan. A
/// chromosome without features has no rank.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromosomeRanks {
    ranks: FxHashMap<String, usize>,
}

impl ChromosomeRanks {
    pub fn get(&self, chr: &str) -> Option<usize> {
        self.ranks.get(chr).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

pub fn build_chromosome_ranks(features: &[Feature]) -> ChromosomeRanks {
    let mut ranks: FxHashMap<String, usize> = FxHashMap::default();
    for feature in features {
        if !ranks.contains_key(&feature.chr) {
            let next = ranks.len();
            ranks.insert(feature.chr.clone(), next);
        }
    }

    ChromosomeRanks { ranks }
}

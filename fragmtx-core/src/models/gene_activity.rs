use std::io::BufRead;
use std::path::Path;

use crate::consts::{DEFAULT_DOWNSTREAM, DEFAULT_UPSTREAM, GTF_GENE_TYPE, MISSING_ATTRIBUTE};
use crate::errors::{FeatureSetError, Result};
use crate::models::{Feature, FeatureSet};
use crate::utils::get_dynamic_reader;

///
/// Options for turning GTF gene records into gene-activity features.
///
#[derive(Clone, Debug, PartialEq)]
pub struct GeneActivityOptions {
    /// bp added in front of the gene start (clipped at 0)
    pub upstream: u32,
    /// bp added after the gene end
    pub downstream: u32,
    /// keep only genes from this annotation source (2nd GTF column)
    pub source: Option<String>,
    /// keep only genes whose `gene_type` attribute is one of these
    pub gene_types: Option<Vec<String>>,
}

impl Default for GeneActivityOptions {
    fn default() -> Self {
        GeneActivityOptions {
            upstream: DEFAULT_UPSTREAM,
            downstream: DEFAULT_DOWNSTREAM,
            source: None,
            gene_types: None,
        }
    }
}

/// Pull `key "value"` out of a GTF attribute column.
fn gtf_attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    attributes.split(';').find_map(|attr| {
        let attr = attr.trim();
        let value = attr.strip_prefix(key)?;
        // make sure we matched the whole key, e.g. gene_id and not gene_id_version
        if !value.starts_with(char::is_whitespace) {
            return None;
        }
        Some(value.trim().trim_matches('"'))
    })
}

impl FeatureSet {
    ///
    /// Build gene-activity features (gene body plus promoter) from a GTF file.
    ///
    /// Each feature is named by its `features.tsv` row: `gene_id`, `gene_name` and `gene_type`,
    /// tab separated. A missing `gene_name` falls back to the `gene_id`, a missing `gene_type`
    /// to `.`.
    ///
    /// # Arguments
    /// - path: path to the GTF annotation, optionally gzipped
    /// - options: flanks and filters to apply
    pub fn from_gtf<P: AsRef<Path>>(path: P, options: &GeneActivityOptions) -> Result<Self> {
        let reader = get_dynamic_reader(path.as_ref())?;

        let mut features = Vec::new();
        let mut names = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < 9 {
                return Err(FeatureSetError::Parse {
                    line: index + 1,
                    reason: format!("GTF records need 9 columns, found {}", parts.len()),
                });
            }

            if parts[2] != GTF_GENE_TYPE {
                continue;
            }

            if options.source.as_deref().is_some_and(|source| source != parts[1]) {
                continue;
            }

            let attributes = parts[8];
            if let Some(gene_types) = &options.gene_types {
                let keep = gtf_attribute(attributes, "gene_type")
                    .is_some_and(|gt| gene_types.iter().any(|wanted| wanted == gt));
                if !keep {
                    continue;
                }
            }

            let gene_id = gtf_attribute(attributes, "gene_id").ok_or_else(|| {
                FeatureSetError::Parse {
                    line: index + 1,
                    reason: "gene record without a gene_id attribute".to_string(),
                }
            })?;

            let parse = |value: &str, what: &str| {
                value.parse::<u32>().map_err(|_| FeatureSetError::Parse {
                    line: index + 1,
                    reason: format!("invalid {} position: {:?}", what, value),
                })
            };
            let start = parse(parts[3], "start")?;
            let end = parse(parts[4], "end")?;

            features.push(Feature::new(
                parts[0],
                start.saturating_sub(options.upstream),
                end.saturating_add(options.downstream),
            ));
            let gene_name = gtf_attribute(attributes, "gene_name").unwrap_or(gene_id);
            let gene_type = gtf_attribute(attributes, "gene_type").unwrap_or(MISSING_ATTRIBUTE);
            names.push(format!("{}\t{}\t{}", gene_id, gene_name, gene_type));
        }

        let mut set = FeatureSet { features, names };
        set.sort();
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("gene_id \"ENSG01\"; gene_name \"TP53\";", "gene_id", Some("ENSG01"))]
    #[case("gene_id \"ENSG01\"; gene_name \"TP53\";", "gene_name", Some("TP53"))]
    #[case("gene_id_version \"3\"; gene_id \"ENSG01\";", "gene_id", Some("ENSG01"))]
    #[case("gene_id \"ENSG01\";", "gene_type", None)]
    fn test_gtf_attribute(#[case] attrs: &str, #[case] key: &str, #[case] expected: Option<&str>) {
        assert_eq!(gtf_attribute(attrs, key), expected);
    }
}

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use fragmtx_core::models::{FeatureSet, GeneActivityOptions};
use fragmtx_core::utils::{read_barcode_list, read_chrom_sizes};
use fragmtx_count::consts::DEFAULT_OUTPUT_PREFIX;
use fragmtx_count::{
    Backend, BarcodeIndex, CountConfig, FragmentReader, build_chromosome_ranks, derive_barcodes,
    scan_with_stats, to_compressed_row_form, write_csr_to_mtx,
};

pub fn required_arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("Missing required argument: {}", name))
}

///
/// Settings from `--config`, overridden by any flags given on the command line.
///
pub fn load_config(matches: &ArgMatches) -> Result<CountConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => CountConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load config file: {}", path))?,
        None => CountConfig::default(),
    };

    if let Some(comment) = matches.get_one::<String>("comment") {
        config.comment = comment.to_owned();
    }
    if let Some(backend) = matches.get_one::<String>("backend") {
        config.backend = Backend::from_str(backend).map_err(anyhow::Error::msg)?;
    }
    if matches.get_flag("no-progress") {
        config.progress = false;
    }

    Ok(config)
}

pub fn fragment_spinner(enabled: bool) -> Result<ProgressBar> {
    if !enabled {
        return Ok(ProgressBar::hidden());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg} ({per_sec})")?
            .tick_strings(&["-", "\\", "|", "/"]),
    );
    Ok(spinner)
}

///
/// The barcode universe: the `--barcodes` list as given, or every barcode of the fragments
/// file, sorted.
///
pub fn barcode_universe(
    matches: &ArgMatches,
    fragments: &Path,
    config: &CountConfig,
) -> Result<BarcodeIndex> {
    let barcodes = match matches.get_one::<String>("barcodes") {
        Some(path) => read_barcode_list(Path::new(path))
            .with_context(|| format!("Failed to read barcode list: {}", path))?,
        None => {
            let spinner = fragment_spinner(config.progress)?;
            spinner.set_message("Collecting barcodes...");
            let reader = FragmentReader::from_path(fragments, &config.comment)?
                .with_progress(spinner.clone());
            let mut barcodes = derive_barcodes(reader)?;
            spinner.finish_with_message("Done!");
            barcodes.sort();
            barcodes
        }
    };

    Ok(BarcodeIndex::new(barcodes))
}

///
/// Count the fragments of the matched command over `features` and write the matrix.
///
pub fn count_features(matches: &ArgMatches, features: FeatureSet) -> Result<()> {
    let config = load_config(matches)?;
    let fragments = Path::new(required_arg(matches, "fragments")?);
    let default_out = DEFAULT_OUTPUT_PREFIX.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    info!("Counting over {} features with the {} backend", features.len(), config.backend);

    let barcodes = barcode_universe(matches, fragments, &config)?;
    let ranks = build_chromosome_ranks(&features.features);

    let spinner = fragment_spinner(config.progress)?;
    spinner.set_message("Processing fragments...");
    let reader =
        FragmentReader::from_path(fragments, &config.comment)?.with_progress(spinner.clone());

    let (counts, _stats) = scan_with_stats(
        reader,
        &features.features,
        &ranks,
        &barcodes,
        config.backend,
    )
    .with_context(|| format!("Failed to count fragments in {:?}", fragments))?;
    spinner.finish_with_message("Done!");

    info!("Writing {} table to {}_matrix.mtx.gz", counts.backend(), output);
    let matrix = to_compressed_row_form(&counts)?;
    write_csr_to_mtx(&matrix, barcodes.barcodes(), &features.names, output)?;

    Ok(())
}

pub fn run_peaks(matches: &ArgMatches) -> Result<()> {
    let peaks = required_arg(matches, "peaks")?;
    let normalized_peak_size = matches.get_one::<u32>("normalize-peak-size").copied();

    let features = FeatureSet::from_bed(Path::new(peaks), normalized_peak_size)
        .with_context(|| format!("Failed to read peaks: {}", peaks))?;

    count_features(matches, features)
}

pub fn run_genes(matches: &ArgMatches) -> Result<()> {
    let gtf = required_arg(matches, "gtf")?;
    let options = GeneActivityOptions {
        upstream: matches.get_one::<u32>("upstream").copied().unwrap_or_default(),
        downstream: matches.get_one::<u32>("downstream").copied().unwrap_or_default(),
        source: matches.get_one::<String>("source").cloned(),
        gene_types: matches
            .get_many::<String>("gene-type")
            .map(|types| types.cloned().collect()),
    };

    let features = FeatureSet::from_gtf(Path::new(gtf), &options)
        .with_context(|| format!("Failed to read gene annotation: {}", gtf))?;

    count_features(matches, features)
}

pub fn run_windows(matches: &ArgMatches) -> Result<()> {
    let chrom_sizes = required_arg(matches, "chrom-sizes")?;
    let window_size = matches.get_one::<u32>("window-size").copied().unwrap_or_default();

    let chrom_sizes = read_chrom_sizes(chrom_sizes)
        .with_context(|| format!("Failed to read chrom sizes: {}", chrom_sizes))?;
    let features = FeatureSet::from_windows(&chrom_sizes, window_size)?;

    count_features(matches, features)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::io::Read;

    use flate2::read::GzDecoder;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::TempDir;

    use crate::count::cli::{create_genes_cli, create_peaks_cli, create_windows_cli};

    const FRAGMENTS: &str = "\
# fragments
chr1\t90\t120\tB\t1
chr1\t150\t180\tA\t2
chr1\t990\t1020\tA\t1
chr2\t5\t50\tB\t1
";

    #[fixture]
    fn workdir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fragments.tsv"), FRAGMENTS).unwrap();
        dir
    }

    fn path(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_str().unwrap().to_string()
    }

    fn read_gz(path: &str) -> String {
        let mut contents = String::new();
        GzDecoder::new(File::open(path).unwrap())
            .read_to_string(&mut contents)
            .unwrap();
        contents
    }

    #[rstest]
    fn test_cli_defaults_match_core() {
        use fragmtx_core::consts::*;

        let matches = create_windows_cli()
            .try_get_matches_from(["windows", "f.tsv", "chrom.sizes"])
            .unwrap();
        assert_eq!(matches.get_one::<u32>("window-size"), Some(&DEFAULT_WINDOW_SIZE));

        let matches = create_genes_cli()
            .try_get_matches_from(["genes", "f.tsv", "genes.gtf"])
            .unwrap();
        assert_eq!(matches.get_one::<u32>("upstream"), Some(&DEFAULT_UPSTREAM));
        assert_eq!(matches.get_one::<u32>("downstream"), Some(&DEFAULT_DOWNSTREAM));
    }

    #[rstest]
    fn test_config_file_overridden_by_flags(workdir: TempDir) {
        let config = path(&workdir, "fragmtx.toml");
        std::fs::write(&config, "backend = \"dense\"\ncomment = \"@\"\n").unwrap();

        let matches = create_peaks_cli()
            .try_get_matches_from(["peaks", "f.tsv", "p.bed", "--config", config.as_str(), "--comment", "%"])
            .unwrap();
        let config = load_config(&matches).unwrap();

        assert_eq!(config.backend, Backend::Dense);
        assert_eq!(config.comment, "%");
        assert!(config.progress);
    }

    #[rstest]
    fn test_bad_backend_flag() {
        let matches = create_peaks_cli()
            .try_get_matches_from(["peaks", "f.tsv", "p.bed", "--backend", "lil"])
            .unwrap();
        assert!(load_config(&matches).is_err());
    }

    #[rstest]
    #[case("dense")]
    #[case("sparse")]
    fn test_run_peaks(workdir: TempDir, #[case] backend: &str) {
        std::fs::write(
            workdir.path().join("peaks.bed"),
            "chr2\t0\t10\nchr1\t100\t200\nchr1\t1000\t1100\n",
        )
        .unwrap();
        let output = path(&workdir, "out/peaks");
        let fragments = path(&workdir, "fragments.tsv");
        let peaks = path(&workdir, "peaks.bed");

        let matches = create_peaks_cli()
            .try_get_matches_from([
                "peaks",
                fragments.as_str(),
                peaks.as_str(),
                "--backend",
                backend,
                "--output",
                output.as_str(),
                "--no-progress",
            ])
            .unwrap();
        run_peaks(&matches).unwrap();

        assert_eq!(
            read_gz(&format!("{}_matrix.mtx.gz", output)),
            "%%MatrixMarket matrix coordinate integer general\n2 3 4\n1 1 1\n1 2 1\n2 1 1\n2 3 1\n"
        );
        assert_eq!(read_gz(&format!("{}_barcodes.tsv.gz", output)), "A\nB\n");
        assert_eq!(
            read_gz(&format!("{}_features.tsv.gz", output)),
            "chr1_100_200\nchr1_1000_1100\nchr2_0_10\n"
        );
    }

    #[rstest]
    fn test_run_windows_with_barcode_list(workdir: TempDir) {
        std::fs::write(workdir.path().join("chrom.sizes"), "chr1\t2000\n").unwrap();
        std::fs::write(workdir.path().join("barcodes.txt"), "A\nZ\n").unwrap();
        let output = path(&workdir, "win");
        let fragments = path(&workdir, "fragments.tsv");
        let chrom_sizes = path(&workdir, "chrom.sizes");
        let barcodes = path(&workdir, "barcodes.txt");

        let matches = create_windows_cli()
            .try_get_matches_from([
                "windows",
                fragments.as_str(),
                chrom_sizes.as_str(),
                "--window-size",
                "1000",
                "--barcodes",
                barcodes.as_str(),
                "--output",
                output.as_str(),
                "--no-progress",
            ])
            .unwrap();
        run_windows(&matches).unwrap();

        // A: [150,180] in window 0, [990,1020] spans windows 0 and 1
        assert_eq!(
            read_gz(&format!("{}_matrix.mtx.gz", output)),
            "%%MatrixMarket matrix coordinate integer general\n2 2 2\n1 1 2\n1 2 1\n"
        );
        assert_eq!(read_gz(&format!("{}_barcodes.tsv.gz", output)), "A\nZ\n");
    }
}

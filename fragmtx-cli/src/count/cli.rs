use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const PEAKS_CMD: &str = "peaks";
pub const GENES_CMD: &str = "genes";
pub const WINDOWS_CMD: &str = "windows";

// keep in sync with fragmtx_core::consts
const DEFAULT_UPSTREAM: &str = "2000";
const DEFAULT_DOWNSTREAM: &str = "0";
const DEFAULT_WINDOW_SIZE: &str = "5000";

/// Options shared by every count matrix subcommand.
fn with_count_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("fragments")
                .required(true)
                .help("Fragments file (.tsv or .tsv.gz), sorted like the features"),
        )
        .arg(arg!(--barcodes <barcodes>).help(
            "File with the valid barcodes, one per line. Derived from the fragments when omitted",
        ))
        .arg(arg!(--backend <backend>).help("Count accumulator: dense (fast) or sparse (low memory)"))
        .arg(arg!(--comment <comment>).help("Marker of the comment header in the fragments file"))
        .arg(arg!(--config <config>).help("TOML file with default count settings"))
        .arg(arg!(--output <output>).help("Prefix of the Matrix Market output files"))
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .help("Do not show a progress spinner")
                .action(ArgAction::SetTrue),
        )
}

pub fn create_peaks_cli() -> Command {
    with_count_args(
        Command::new(PEAKS_CMD)
            .author("Databio")
            .about("Count fragments over the peaks of a BED file."),
    )
    .arg(Arg::new("peaks").required(true).help("Peak file (.bed or .bed.gz)"))
    .arg(
        arg!(--"normalize-peak-size" <size>)
            .help("Recentre every peak on its midpoint with this width")
            .value_parser(value_parser!(u32)),
    )
}

pub fn create_genes_cli() -> Command {
    with_count_args(
        Command::new(GENES_CMD)
            .author("Databio")
            .about("Count fragments over gene bodies and promoters (gene activity)."),
    )
    .arg(Arg::new("gtf").required(true).help("Gene annotation (.gtf or .gtf.gz)"))
    .arg(
        arg!(--upstream <bp>)
            .help("bp upstream of the gene start to include")
            .value_parser(value_parser!(u32))
            .default_value(DEFAULT_UPSTREAM),
    )
    .arg(
        arg!(--downstream <bp>)
            .help("bp downstream of the gene end to include")
            .value_parser(value_parser!(u32))
            .default_value(DEFAULT_DOWNSTREAM),
    )
    .arg(arg!(--source <source>).help("Only keep genes from this annotation source"))
    .arg(
        Arg::new("gene-type")
            .long("gene-type")
            .help("Only keep genes of this gene_type. Can be given more than once")
            .action(ArgAction::Append),
    )
}

pub fn create_windows_cli() -> Command {
    with_count_args(
        Command::new(WINDOWS_CMD)
            .author("Databio")
            .about("Count fragments over fixed-size genome windows."),
    )
    .arg(
        Arg::new("chrom-sizes")
            .required(true)
            .help("Chrom sizes file: chromosome name and length per line"),
    )
    .arg(
        arg!(--"window-size" <bp>)
            .help("Window width in bp")
            .value_parser(value_parser!(u32))
            .default_value(DEFAULT_WINDOW_SIZE),
    )
}

use clap::{Arg, ArgAction, Command, arg};

pub const BARCODES_CMD: &str = "barcodes";

pub fn create_barcodes_cli() -> Command {
    Command::new(BARCODES_CMD)
        .author("Databio")
        .about("List the distinct barcodes of a fragments file.")
        .arg(
            Arg::new("fragments")
                .required(true)
                .help("Fragments file (.tsv or .tsv.gz), or - for stdin"),
        )
        .arg(arg!(--output <output>).help("Write barcodes here instead of stdout (.gz is compressed)"))
        .arg(arg!(--comment <comment>).help("Marker of the comment header in the fragments file"))
        .arg(
            arg!(--sort)
                .help("Sort barcodes instead of keeping first-seen order")
                .action(ArgAction::SetTrue),
        )
}

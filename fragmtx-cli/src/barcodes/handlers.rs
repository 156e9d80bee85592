use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;

use fragmtx_core::consts::DEFAULT_COMMENT;
use fragmtx_core::utils::get_dynamic_reader_w_stdin;
use fragmtx_count::{FragmentReader, derive_barcodes, write_lines_gz};

use crate::count::handlers::required_arg;

pub fn run_barcodes(matches: &ArgMatches) -> Result<()> {
    let fragments = required_arg(matches, "fragments")?;
    let default_comment = DEFAULT_COMMENT.to_string();
    let comment = matches
        .get_one::<String>("comment")
        .unwrap_or(&default_comment);

    let reader = get_dynamic_reader_w_stdin(fragments)
        .with_context(|| format!("Failed to open fragments: {}", fragments))?;
    let mut barcodes = derive_barcodes(FragmentReader::new(reader, comment))?;
    if matches.get_flag("sort") {
        barcodes.sort();
    }

    match matches.get_one::<String>("output") {
        Some(output) if output.ends_with(".gz") => write_lines_gz(output, &barcodes)?,
        Some(output) => {
            let mut writer = BufWriter::new(File::create(output)?);
            for barcode in &barcodes {
                writeln!(writer, "{}", barcode)?;
            }
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            for barcode in &barcodes {
                writeln!(writer, "{}", barcode)?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}

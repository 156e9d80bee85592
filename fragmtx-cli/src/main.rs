mod barcodes;
mod count;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "fragmtx";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Build barcode-by-feature count matrices from single-cell ATAC fragment files.")
        .subcommand_required(true)
        .subcommand(count::cli::create_peaks_cli())
        .subcommand(count::cli::create_genes_cli())
        .subcommand(count::cli::create_windows_cli())
        .subcommand(barcodes::cli::create_barcodes_cli())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // COUNT MATRICES
        //
        Some((count::cli::PEAKS_CMD, matches)) => {
            count::handlers::run_peaks(matches)?;
        }
        Some((count::cli::GENES_CMD, matches)) => {
            count::handlers::run_genes(matches)?;
        }
        Some((count::cli::WINDOWS_CMD, matches)) => {
            count::handlers::run_windows(matches)?;
        }

        //
        // BARCODES
        //
        Some((barcodes::cli::BARCODES_CMD, matches)) => {
            barcodes::handlers::run_barcodes(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

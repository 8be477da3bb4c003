use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::constants::*;
use crate::{MerPcr, SearchConfig};

#[derive(Parser, Debug)]
#[command(name = "merpcr")]
#[command(about = "Electronic PCR: find STS markers in nucleotide sequences")]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// STS file (tab-delimited: id, primer1, primer2, pcr size[, alias])
    pub sts_file: PathBuf,
    /// FASTA sequence file (optionally gzip-compressed)
    pub fasta_file: PathBuf,

    /// Allowed deviation from the expected PCR size
    #[arg(short = 'M', long, default_value_t = DEFAULT_MARGIN)]
    pub margin: usize,
    /// Number of mismatches allowed per primer
    #[arg(short = 'N', long, default_value_t = DEFAULT_MISMATCHES)]
    pub mismatches: usize,
    /// Word size used for seeding
    #[arg(short = 'W', long, default_value_t = DEFAULT_WORDSIZE)]
    pub wordsize: usize,
    /// Number of threads
    #[arg(short = 'T', long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,
    /// Number of 3'-ward bases in which to disallow mismatches
    #[arg(short = 'X', long, default_value_t = DEFAULT_THREE_PRIME_MATCH)]
    pub three_prime_match: usize,
    /// Output file name (default: stdout)
    #[arg(short = 'O', long)]
    pub output: Option<PathBuf>,
    /// Quiet flag (0 = verbose, 1 = quiet)
    #[arg(short = 'Q', long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub quiet: u8,
    /// Default PCR size for markers without a usable size
    #[arg(short = 'Z', long, default_value_t = DEFAULT_PCR_SIZE)]
    pub default_pcr_size: usize,
    /// IUPAC flag (0 = don't honor IUPAC ambiguity symbols, 1 = honor them)
    #[arg(short = 'I', long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub iupac: u8,
    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            wordsize: self.wordsize,
            margin: self.margin,
            mismatches: self.mismatches,
            three_prime_match: self.three_prime_match,
            iupac: self.iupac == 1,
            default_pcr_size: self.default_pcr_size,
            threads: self.threads,
        }
    }

    /// Level used when `RUST_LOG` is not set.
    fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.quiet == 0 {
            "info"
        } else {
            "warn"
        }
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let mut engine = MerPcr::new(cli.search_config()).context("invalid search parameters")?;

    engine
        .load_sts_file(&cli.sts_file)
        .with_context(|| format!("failed to load STS file {}", cli.sts_file.display()))?;

    let records = engine
        .load_fasta_file(&cli.fasta_file)
        .with_context(|| format!("failed to load FASTA file {}", cli.fasta_file.display()))?;
    if records.is_empty() {
        bail!("no sequences in FASTA file {}", cli.fasta_file.display());
    }

    let out: Box<dyn Write> = match &cli.output {
        Some(path) if !path.as_os_str().eq_ignore_ascii_case("stdout") => Box::new(
            File::create(path)
                .with_context(|| format!("cannot create output file {}", path.display()))?,
        ),
        _ => Box::new(io::stdout().lock()),
    };

    let hits = engine.search(&records, BufWriter::new(out))?;
    info!("Search complete: {hits} hits found");
    Ok(())
}

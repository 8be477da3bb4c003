mod constants;
#[macro_use]
mod util;
pub mod cli;
mod config;
mod engine;
mod fasta;
mod hashes;
mod index;
mod matcher;
mod partition;
mod report;
mod scanner;
mod sts;

pub use constants::*;
pub use config::SearchConfig;
pub use engine::MerPcr;
pub use fasta::{FastaRecord, load_fasta_file, read_fasta};
pub use hashes::{RollingSeeds, Seed, build_seed};
pub use index::{IndexEntry, LoadReport, StsIndex};
pub use matcher::{Hit, PairMatcher, Strand};
pub use partition::{Partition, fan_out, merge_partition_hits, partition_overlap, plan_partitions};
pub use report::HitWriter;
pub use scanner::scan_partition;
pub use sts::{Direction, Marker, PcrSize, RawMarker, parse_pcr_size, read_sts, read_sts_file};
pub use util::*;

use std::path::PathBuf;

/// Common `Result` type for all library operations, using `PcrError` for errors.
pub type Result<T, E = PcrError> = core::result::Result<T, E>;

/// Error variants for configuration, loading and searching.
///
/// Soft data-quality conditions (short or unindexable primers, adjusted PCR
/// sizes) are never errors; they are counted in [`LoadReport`].
#[derive(thiserror::Error, Debug)]
pub enum PcrError {
    #[error("word size must be between 3 and 16 (got {0})")]
    WordSizeOutOfRange(usize),

    #[error("margin must be between 0 and 10000 (got {0})")]
    MarginOutOfRange(usize),

    #[error("number of mismatches must be between 0 and 10 (got {0})")]
    MismatchesOutOfRange(usize),

    #[error("default PCR size must be between 1 and 10000 (got {0})")]
    DefaultPcrSizeOutOfRange(usize),

    /// Thrown when the requested worker count is zero.
    #[error("thread count must be at least 1")]
    NoThreads,

    /// Thrown when an input file exists but holds no bytes.
    #[error("input file '{}' is empty", .path.display())]
    EmptyInput { path: PathBuf },

    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An STS line with fewer than four tab-separated fields. `line` is 1-based.
    #[error("bad STS format in {source_name} at line {line}: expected at least 4 fields, found {found}")]
    MalformedStsLine {
        source_name: String,
        line: usize,
        found: usize,
    },

    #[error("malformed FASTA in '{}': {message}", .path.display())]
    Fasta { path: PathBuf, message: String },

    /// A partition worker panicked; the whole sequence search is abandoned.
    #[error("search worker for partition {partition} failed: {reason}")]
    PartitionFailed { partition: usize, reason: String },

    #[error("cannot write hits: {0}")]
    Output(#[source] std::io::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

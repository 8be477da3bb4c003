//! STS (marker) records and the tab-delimited STS file format.
//!
//! Each non-blank, non-comment line reads
//! `id<TAB>primer1<TAB>primer2<TAB>pcr_size[<TAB>alias]`, where `pcr_size` is
//! either an integer or a `low-high` range.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::{PcrError, Result};

/// Which orientation of a marker an index entry scans for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `primer1` first, then `primer2`.
    Forward,
    /// `primer2` first, then the reverse complement of `primer1`.
    Reverse,
}

impl Direction {
    /// `'+'` or `'-'`, as printed in hit reports.
    pub const fn symbol(self) -> char {
        match self {
            Direction::Forward => '+',
            Direction::Reverse => '-',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Expected amplicon size parsed from an STS line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcrSize {
    /// Declared size, or the midpoint of a declared range.
    pub size: usize,
    /// Extra margin so that a range's full extent is still searched.
    /// Zero for plain sizes.
    pub widening: usize,
}

/// Parses a `pcr_size` field.
///
/// Accepts a positive integer or a `low-high` range with both bounds
/// present. A range yields its midpoint and widens the record's margin by
/// `|high - low| / 2 + 1`. Anything unparsable, or a size of zero, falls back
/// to `default` with no widening.
pub fn parse_pcr_size(field: &str, default: usize) -> PcrSize {
    let fallback = PcrSize { size: default, widening: 0 };
    let field = field.trim();

    if field.contains('-') {
        let mut parts = field.split('-');
        let (Some(low), Some(high), None) = (parts.next(), parts.next(), parts.next()) else {
            return fallback;
        };
        let (Ok(low), Ok(high)) = (low.trim().parse::<usize>(), high.trim().parse::<usize>()) else {
            return fallback;
        };
        return match low.checked_add(high).map(|sum| sum / 2) {
            Some(size) if size > 0 => PcrSize {
                size,
                widening: low.abs_diff(high) / 2 + 1,
            },
            _ => fallback,
        };
    }

    match field.parse::<usize>() {
        Ok(size) if size > 0 => PcrSize { size, widening: 0 },
        _ => fallback,
    }
}

/// One marker line as read from an STS file, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMarker {
    pub id: String,
    /// Upper-cased forward primer.
    pub primer1: Vec<u8>,
    /// Upper-cased reverse primer.
    pub primer2: Vec<u8>,
    pub pcr_size: PcrSize,
    /// Free-text annotation; empty when the line has no fifth field.
    pub alias: String,
    /// 1-based line number in the source.
    pub line: usize,
}

/// A validated marker as held by the index.
///
/// Shared by both of its index entries; never mutated after the index is
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub id: String,
    pub primer1: Vec<u8>,
    pub primer2: Vec<u8>,
    /// Effective amplicon size, never smaller than the primer-length sum.
    pub pcr_size: usize,
    /// Added to the configured margin when this marker is matched.
    pub margin_widening: usize,
    pub alias: String,
    pub line: usize,
}

/// Reads STS lines from `reader`.
///
/// `source_name` only labels errors and log lines. Blank lines and lines
/// starting with `#` are skipped. A line with fewer than four tab-separated
/// fields aborts the whole read with [`PcrError::MalformedStsLine`].
pub fn read_sts<R: BufRead>(
    reader: R,
    source_name: &str,
    default_pcr_size: usize,
) -> Result<Vec<RawMarker>> {
    let mut markers = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| PcrError::Io {
            path: source_name.into(),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            return Err(PcrError::MalformedStsLine {
                source_name: source_name.to_owned(),
                line: line_no,
                found: fields.len(),
            });
        }

        markers.push(RawMarker {
            id: fields[0].to_owned(),
            primer1: fields[1].as_bytes().to_ascii_uppercase(),
            primer2: fields[2].as_bytes().to_ascii_uppercase(),
            pcr_size: parse_pcr_size(fields[3], default_pcr_size),
            alias: fields.get(4).map(|s| (*s).to_owned()).unwrap_or_default(),
            line: line_no,
        });
    }

    debug!("{} marker lines read from {source_name}", markers.len());
    Ok(markers)
}

/// Opens and reads an STS file. An empty file is an error.
pub fn read_sts_file(path: &Path, default_pcr_size: usize) -> Result<Vec<RawMarker>> {
    let io_err = |source| PcrError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    if file.metadata().map_err(io_err)?.len() == 0 {
        return Err(PcrError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    info!("Reading STS file: {}", path.display());
    read_sts(
        BufReader::new(file),
        &path.display().to_string(),
        default_pcr_size,
    )
}

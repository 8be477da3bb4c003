//! Seed-keyed marker index.
//!
//! Every marker contributes up to two entries, one per scan orientation,
//! bucketed by the packed hash of a fixed-width seed taken from the primer
//! the scan meets first. The index is built once, then only read; partition
//! workers share it by reference.

use std::sync::Arc;

use ahash::AHashMap;
use tracing::{info, warn};

use crate::hashes::build_seed;
use crate::sts::{Direction, Marker, RawMarker};
use crate::util::reverse_complement;

/// One orientation of a marker, keyed in the index by its seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub marker: Arc<Marker>,
    pub direction: Direction,
    /// Primer met first while scanning: `primer1` forward, `primer2` reverse.
    pub first_primer: Vec<u8>,
    /// Primer searched downstream: `primer2` forward, reverse complement of
    /// `primer1` reverse.
    pub second_primer: Vec<u8>,
    /// Where the seed starts within `first_primer`.
    pub hash_offset: usize,
}

/// Counts collected while indexing. None of these conditions is fatal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Marker lines handed to the indexer.
    pub markers_read: usize,
    /// Entries inserted (at most two per marker).
    pub entries_indexed: usize,
    /// Markers skipped because a primer is shorter than the word size.
    pub primers_too_short: usize,
    /// Primers with no ambiguity-free seed anywhere.
    pub primers_ambiguous: usize,
    /// Markers whose PCR size was raised to the primer-length sum.
    pub pcr_size_adjusted: usize,
}

impl LoadReport {
    /// Emits one warning per non-zero soft condition, then a summary line.
    pub fn log(&self, wordsize: usize) {
        if self.primers_too_short > 0 {
            warn!(
                "{} STSs have primer shorter than word size ({wordsize}): not included in search",
                self.primers_too_short
            );
        }
        if self.primers_ambiguous > 0 {
            warn!(
                "{} primers have ambiguities which prevent computation of a hash value: not included in search",
                self.primers_ambiguous
            );
        }
        if self.pcr_size_adjusted > 0 {
            warn!(
                "{} STSs have a primer length sum greater than the pcr size: expected pcr size adjusted",
                self.pcr_size_adjusted
            );
        }
        info!(
            "Indexed {} entries from {} STS records",
            self.entries_indexed, self.markers_read
        );
    }
}

/// Build-once, read-many map from seed hash to marker entries.
#[derive(Debug, Clone)]
pub struct StsIndex {
    wordsize: usize,
    entries:  Vec<IndexEntry>,
    buckets:  AHashMap<u64, Vec<usize>>, // seed hash → positions in `entries`

    max_pcr_size: usize, // largest effective pcr_size seen
    max_span:     usize, // largest pcr_size + margin widening seen
}

impl StsIndex {
    /// Creates an empty index for seeds of `wordsize` bases.
    pub fn new(wordsize: usize) -> Self {
        Self {
            wordsize,
            entries: Vec::new(),
            buckets: AHashMap::new(),
            max_pcr_size: 0,
            max_span: 0,
        }
    }

    /// Indexes every marker and returns the index with its load counts.
    pub fn build<I>(markers: I, wordsize: usize) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = RawMarker>,
    {
        let mut index = Self::new(wordsize);
        let mut report = LoadReport::default();
        for raw in markers {
            index.index_marker(raw, &mut report);
        }
        (index, report)
    }

    /// Turns one marker into its forward and reverse entries.
    ///
    /// A marker with either primer shorter than the word size is skipped
    /// whole. A PCR size below the primer-length sum is raised to that sum.
    /// Each orientation is then indexed independently; an orientation whose
    /// first primer has no ambiguity-free seed is left out.
    pub fn index_marker(&mut self, raw: RawMarker, report: &mut LoadReport) {
        report.markers_read += 1;

        if raw.primer1.len() < self.wordsize || raw.primer2.len() < self.wordsize {
            report.primers_too_short += 1;
            return;
        }

        let primer_sum = raw.primer1.len() + raw.primer2.len();
        let mut pcr_size = raw.pcr_size.size;
        if primer_sum > pcr_size {
            report.pcr_size_adjusted += 1;
            pcr_size = primer_sum;
        }
        self.max_pcr_size = self.max_pcr_size.max(pcr_size);
        self.max_span = self.max_span.max(pcr_size.saturating_add(raw.pcr_size.widening));

        let forward_seed = build_seed(&raw.primer1, self.wordsize);
        let reverse_seed = build_seed(&raw.primer2, self.wordsize);
        let reverse_second = reverse_complement(&raw.primer1);

        let marker = Arc::new(Marker {
            id: raw.id,
            primer1: raw.primer1,
            primer2: raw.primer2,
            pcr_size,
            margin_widening: raw.pcr_size.widening,
            alias: raw.alias,
            line: raw.line,
        });

        match forward_seed {
            Some(seed) => {
                let entry = IndexEntry {
                    marker: Arc::clone(&marker),
                    direction: Direction::Forward,
                    first_primer: marker.primer1.clone(),
                    second_primer: marker.primer2.clone(),
                    hash_offset: seed.offset,
                };
                self.insert(seed.hash, entry, report);
            }
            None => report.primers_ambiguous += 1,
        }

        match reverse_seed {
            Some(seed) => {
                let entry = IndexEntry {
                    first_primer: marker.primer2.clone(),
                    second_primer: reverse_second,
                    marker,
                    direction: Direction::Reverse,
                    hash_offset: seed.offset,
                };
                self.insert(seed.hash, entry, report);
            }
            None => report.primers_ambiguous += 1,
        }
    }

    fn insert(&mut self, hash: u64, entry: IndexEntry, report: &mut LoadReport) {
        self.buckets.entry(hash).or_default().push(self.entries.len());
        self.entries.push(entry);
        report.entries_indexed += 1;
    }

    /// Entries whose seed hashes to `hash`, in insertion order.
    pub fn lookup(&self, hash: u64) -> impl Iterator<Item = &IndexEntry> + '_ {
        self.buckets
            .get(&hash)
            .into_iter()
            .flatten()
            .map(|&i| &self.entries[i])
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn wordsize(&self) -> usize {
        self.wordsize
    }

    /// Largest effective PCR size over every loaded marker, including
    /// markers whose primers turned out unindexable.
    pub fn max_pcr_size(&self) -> usize {
        self.max_pcr_size
    }

    /// Largest `pcr_size + margin widening` over every loaded marker.
    /// Equals [`max_pcr_size`](Self::max_pcr_size) when no marker declared
    /// a size range.
    pub fn max_span(&self) -> usize {
        self.max_span
    }
}

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::fasta::{FastaRecord, load_fasta_file};
use crate::index::{LoadReport, StsIndex};
use crate::matcher::{Hit, PairMatcher};
use crate::partition::{fan_out, merge_partition_hits, partition_overlap, plan_partitions};
use crate::report::HitWriter;
use crate::scanner::scan_partition;
use crate::sts::{RawMarker, read_sts, read_sts_file};
use crate::{PcrError, Result};

/// Electronic PCR search engine.
///
/// Built from a validated [`SearchConfig`]; load markers once, then search
/// any number of sequences against them. Sequences are searched one after
/// another, each one split across the configured number of workers.
pub struct MerPcr {
    config:  SearchConfig,
    matcher: PairMatcher,
    index:   StsIndex,
    pool:    Option<ThreadPool>, // only when more than one thread is requested

    total_hits: usize,
}

impl MerPcr {
    /// Validates `config` and sets up the worker pool.
    ///
    /// Fails before anything else happens if a parameter is out of bounds.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;

        let pool = if config.threads > 1 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(config.threads)
                    .thread_name(|i| format!("merpcr-worker-{i}"))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            matcher: PairMatcher::new(&config),
            index: StsIndex::new(config.wordsize),
            config,
            pool,
            total_hits: 0,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn index(&self) -> &StsIndex {
        &self.index
    }

    /// Hits reported by the last completed [`search`](Self::search).
    pub fn total_hits(&self) -> usize {
        self.total_hits
    }

    /// Replaces the index with one built from `markers`.
    pub fn load_markers<I>(&mut self, markers: I) -> LoadReport
    where
        I: IntoIterator<Item = RawMarker>,
    {
        let (index, report) = StsIndex::build(markers, self.config.wordsize);
        self.index = index;
        report.log(self.config.wordsize);
        report
    }

    /// Loads markers from STS text. `source_name` labels errors.
    pub fn load_sts<R: BufRead>(&mut self, reader: R, source_name: &str) -> Result<LoadReport> {
        let markers = read_sts(reader, source_name, self.config.default_pcr_size)?;
        Ok(self.load_markers(markers))
    }

    /// Loads markers from an STS file, replacing any loaded before.
    pub fn load_sts_file(&mut self, path: &Path) -> Result<LoadReport> {
        let started = Instant::now();
        let markers = read_sts_file(path, self.config.default_pcr_size)?;
        let report = self.load_markers(markers);
        info!(
            "Loaded {} STS records in {:.2} seconds",
            report.markers_read,
            started.elapsed().as_secs_f64()
        );
        Ok(report)
    }

    pub fn load_fasta_file(&self, path: &Path) -> Result<Vec<FastaRecord>> {
        load_fasta_file(path)
    }

    /// Finds every hit in one sequence, sorted by start.
    ///
    /// Either all partitions complete or the first worker failure is
    /// returned; no partial hit list escapes.
    pub fn search_sequence(&self, record: &FastaRecord) -> Result<Vec<Hit<'_>>> {
        if self.index.is_empty() || record.is_empty() {
            return Ok(Vec::new());
        }

        let seq = record.sequence.as_slice();
        let overlap = partition_overlap(self.index.max_span(), self.config.margin);
        let partitions = plan_partitions(seq.len(), self.config.threads, overlap);
        debug!(
            "{}: {} partition(s), overlap {overlap}",
            record.label,
            partitions.len()
        );

        let per_partition = fan_out(self.pool.as_ref(), &partitions, |part| {
            let range = part.range();
            let at_sequence_end = range.end == seq.len();
            scan_partition(&seq[range], part.offset, at_sequence_end, &self.index, &self.matcher)
        })?;
        Ok(merge_partition_hits(&partitions, per_partition, overlap))
    }

    /// Searches `records` in order and writes every hit to `out`.
    ///
    /// Returns the number of hits written. On failure, hits of the sequences
    /// before the failing one have already been written in full.
    pub fn search<W: Write>(&mut self, records: &[FastaRecord], out: W) -> Result<usize> {
        let mut writer = HitWriter::new(out);

        for record in records {
            info!("Processing sequence: {} ({} bp)", record.label, record.len());
            let hits = self.search_sequence(record)?;
            for hit in &hits {
                writer
                    .write_hit(&record.label, hit)
                    .map_err(PcrError::Output)?;
            }
            debug!("{}: {} hits", record.label, hits.len());
        }
        writer.flush().map_err(PcrError::Output)?;

        let total = writer.written();
        info!("Total hits found: {total}");
        self.total_hits = total;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_fails_construction() {
        let config = SearchConfig { wordsize: 20, ..SearchConfig::default() };
        assert!(matches!(MerPcr::new(config), Err(PcrError::WordSizeOutOfRange(20))));
    }

    #[test]
    fn empty_index_finds_nothing() {
        let mut engine = MerPcr::new(SearchConfig::default()).unwrap();
        let records = [FastaRecord::new("s", "ACGTACGTACGTACGT")];
        let mut out = Vec::new();
        assert_eq!(engine.search(&records, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }
}

//! Splitting a sequence into overlapping partitions, searching them in
//! parallel and merging the per-partition hits.

use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

use rayon::ThreadPool;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::constants::MIN_SEQ_LEN_FOR_THREADING;
use crate::matcher::Hit;
use crate::{PcrError, Result};

/// A contiguous slice of a sequence searched by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// Position among the sequence's partitions, from 0.
    pub id:     usize,
    pub offset: usize,
    pub len:    usize,
}

impl Partition {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Bases shared by neighbouring partitions: the longest amplicon any marker
/// can produce, less one. `max_span` is the largest `pcr_size + widening`.
pub fn partition_overlap(max_span: usize, margin: usize) -> usize {
    max_span.saturating_add(margin).saturating_sub(1)
}

/// Carves `seq_len` bases into at most `requested` overlapping partitions.
///
/// Short sequences always get a single partition. Otherwise the worker count
/// is lowered until `(workers + 1) * overlap` fits in the sequence. All
/// partitions but the last have the same length; the last runs to the end
/// of the sequence. Neighbours share exactly `overlap` bases.
pub fn plan_partitions(seq_len: usize, requested: usize, overlap: usize) -> Vec<Partition> {
    let mut workers = requested.max(1);
    if seq_len < MIN_SEQ_LEN_FOR_THREADING && workers > 1 {
        debug!("Sequence too small for threading, using a single partition");
        workers = 1;
    }
    while workers > 1
        && (workers + 1)
            .checked_mul(overlap)
            .is_none_or(|need| need > seq_len)
    {
        workers -= 1;
        info!("Reduced threads to {workers} due to sequence size limitations");
    }

    if workers == 1 {
        return vec![Partition { id: 0, offset: 0, len: seq_len }];
    }

    let chunk = (seq_len - (workers + 1) * overlap) / workers + 2 * overlap;
    let mut partitions = Vec::with_capacity(workers);
    let mut offset = 0;
    for id in 0..workers {
        let len = if id + 1 < workers { chunk } else { seq_len - offset };
        partitions.push(Partition { id, offset, len });
        offset += len - overlap;
    }
    partitions
}

/// Runs `work` once per partition and returns the results in partition
/// order.
///
/// With a pool and more than one partition the calls run concurrently on
/// the pool; otherwise they run in order on the calling thread. A panicking
/// call fails the whole run with [`PcrError::PartitionFailed`] naming the
/// partition.
pub fn fan_out<T, F>(pool: Option<&ThreadPool>, partitions: &[Partition], work: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&Partition) -> T + Sync,
{
    let run = |part: &Partition| -> Result<T> {
        panic::catch_unwind(AssertUnwindSafe(|| work(part))).map_err(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "worker panicked".to_owned());
            PcrError::PartitionFailed {
                partition: part.id,
                reason,
            }
        })
    };

    match pool {
        Some(pool) if partitions.len() > 1 => {
            pool.install(|| partitions.par_iter().map(run).collect())
        }
        _ => partitions.iter().map(run).collect(),
    }
}

/// Joins per-partition hit lists into one list sorted by start.
///
/// A hit from any partition after the first whose end lies within that
/// partition's leading `overlap` bases is dropped: the previous partition
/// already holds it. The sort is stable, so hits sharing a start keep their
/// discovery order.
pub fn merge_partition_hits<'a>(
    partitions: &[Partition],
    per_partition: Vec<Vec<Hit<'a>>>,
    overlap: usize,
) -> Vec<Hit<'a>> {
    let mut merged = Vec::with_capacity(per_partition.iter().map(Vec::len).sum());
    for (part, hits) in partitions.iter().zip(per_partition) {
        merged.extend(
            hits.into_iter()
                .filter(|hit| part.id == 0 || hit.end - part.offset >= overlap),
        );
    }
    merged.sort_by_key(|hit| hit.start);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sequence_is_one_partition() {
        let parts = plan_partitions(5_000, 8, 100);
        assert_eq!(parts, vec![Partition { id: 0, offset: 0, len: 5_000 }]);
    }

    #[test]
    fn partitions_tile_with_fixed_overlap() {
        let (seq_len, overlap) = (1_000_000, 300);
        let parts = plan_partitions(seq_len, 4, overlap);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].len, 250_225);
        assert_eq!(parts[0].offset, 0);
        for pair in parts.windows(2) {
            assert_eq!(pair[0].range().end - pair[1].offset, overlap);
        }
        assert_eq!(parts.last().unwrap().range().end, seq_len);
    }

    #[test]
    fn worker_count_shrinks_to_fit_overlap() {
        let parts = plan_partitions(100_000, 8, 30_000);
        assert_eq!(parts.len(), 2);
        let parts = plan_partitions(100_000, 8, 60_000);
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn huge_overlap_means_one_partition() {
        let overlap = partition_overlap(usize::MAX, 50);
        assert_eq!(overlap, usize::MAX - 1);
        let parts = plan_partitions(1_000_000, 4, overlap);
        assert_eq!(parts, vec![Partition { id: 0, offset: 0, len: 1_000_000 }]);
    }

    #[test]
    fn fan_out_keeps_partition_order() {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(3).build().unwrap();
        let parts = plan_partitions(400_000, 3, 500);
        let ids = fan_out(Some(&pool), &parts, |p| p.id).unwrap();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn fan_out_reports_failing_partition() {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let parts = plan_partitions(400_000, 2, 500);
        let err = fan_out(Some(&pool), &parts, |p| {
            if p.id == 1 {
                panic!("boom");
            }
            p.id
        })
        .unwrap_err();
        match err {
            PcrError::PartitionFailed { partition, reason } => {
                assert_eq!(partition, 1);
                assert_eq!(reason, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

use crate::hashes::RollingSeeds;
use crate::index::StsIndex;
use crate::matcher::{Hit, PairMatcher};

/// Scans one partition of a sequence and returns its hits.
///
/// `seq` is the partition's bases and `offset` its start within the full
/// sequence; hit coordinates are global. `at_sequence_end` is set for the
/// partition that runs to the end of the full sequence. Every ambiguity-free seed window
/// probes the index, and each entry in the bucket is tried with its first
/// primer anchored `hash_offset` bases before the window.
pub fn scan_partition<'a>(
    seq: &[u8],
    offset: usize,
    at_sequence_end: bool,
    index: &'a StsIndex,
    matcher: &PairMatcher,
) -> Vec<Hit<'a>> {
    let mut hits = Vec::new();
    for (pos, hash) in RollingSeeds::new(seq, index.wordsize()) {
        for entry in index.lookup(hash) {
            let Some(k) = pos.checked_sub(entry.hash_offset) else {
                continue;
            };
            if k + entry.first_primer.len() <= seq.len() {
                matcher.match_at(seq, k, entry, offset, at_sequence_end, &mut hits);
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::sts::{PcrSize, RawMarker};

    fn index_of(p1: &[u8], p2: &[u8], size: usize) -> StsIndex {
        let raw = RawMarker {
            id: "M".into(),
            primer1: p1.to_vec(),
            primer2: p2.to_vec(),
            pcr_size: PcrSize { size, widening: 0 },
            alias: String::new(),
            line: 1,
        };
        StsIndex::build([raw], 4).0
    }

    #[test]
    fn anchors_first_primer_before_seed() {
        // Seed of NACGTT starts at offset 1 within the primer
        let index = index_of(b"NACGTT", b"CCCAAAGG", 20);
        let config = SearchConfig { wordsize: 4, iupac: true, ..SearchConfig::default() };
        let matcher = PairMatcher::new(&config);

        // GACGTT ... CCCAAAGG at size 20
        let seq = b"TTGACGTTGGGGGGCCCAAAGGTT";
        let hits = scan_partition(seq, 0, true, &index, &matcher);
        assert_eq!(hits.len(), 1);
        assert_eq!((hits[0].start, hits[0].end), (2, 21));
    }

    #[test]
    fn seed_before_partition_start_is_ignored() {
        let index = index_of(b"NACGTT", b"CCCAAAGG", 20);
        let config = SearchConfig { wordsize: 4, iupac: true, ..SearchConfig::default() };
        let matcher = PairMatcher::new(&config);

        // Seed window at position 0 would anchor the primer at -1
        let seq = b"ACGTTGGGGGGCCCAAAGGTT";
        assert!(scan_partition(seq, 0, true, &index, &matcher).is_empty());
    }
}

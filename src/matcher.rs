use crate::config::SearchConfig;
use crate::index::IndexEntry;
use crate::sts::{Direction, Marker};
use crate::util::iupac_match;

/// Which end of a compared primer carries its 3' end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    /// 3' end at the right: the first primer of an entry.
    Plus,
    /// 3' end at the left: the second primer, stored reverse-complemented.
    Minus,
}

/// A confirmed amplicon.
///
/// `start` and `end` are 0-based, inclusive, and refer to the whole
/// unpartitioned sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a> {
    pub start: usize,
    pub end:   usize,
    pub entry: &'a IndexEntry,
}

impl Hit<'_> {
    pub fn marker(&self) -> &Marker {
        &self.entry.marker
    }

    pub fn direction(&self) -> Direction {
        self.entry.direction
    }

    /// Amplicon length in bases.
    pub fn amplicon_len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Confirms seed candidates into hits.
#[derive(Debug, Clone, Copy)]
pub struct PairMatcher {
    margin:            usize,
    mismatches:        usize,
    three_prime_match: usize,
    iupac:             bool,
}

impl PairMatcher {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            margin: config.margin,
            mismatches: config.mismatches,
            three_prime_match: config.three_prime_match,
            iupac: config.iupac,
        }
    }

    /// Compares a sequence window against a primer.
    ///
    /// Lengths must agree. Inside the 3'-protected zone (the last
    /// `three_prime_match` positions for [`Strand::Plus`], the first ones for
    /// [`Strand::Minus`]) a single mismatch fails the comparison. Elsewhere
    /// mismatches are counted against the budget and the comparison fails as
    /// soon as the budget is exceeded.
    pub fn compare(&self, window: &[u8], primer: &[u8], strand: Strand) -> bool {
        if window.len() != primer.len() {
            return false;
        }
        let len = window.len();
        let protected_from = len.saturating_sub(self.three_prime_match);

        let mut mismatches = 0usize;
        for (i, (&a, &b)) in window.iter().zip(primer).enumerate() {
            let same = if self.iupac {
                iupac_match(a, b)
            } else {
                a.eq_ignore_ascii_case(&b)
            };
            if same {
                continue;
            }

            let protected = match strand {
                Strand::Plus => i >= protected_from,
                Strand::Minus => i < self.three_prime_match,
            };
            if protected {
                return false;
            }
            mismatches += 1;
            if mismatches > self.mismatches {
                return false;
            }
        }
        true
    }

    /// Tries `entry` anchored at `k` in the partition `seq`.
    ///
    /// The first primer must match at `k`. The second primer is then tried at
    /// the expected amplicon size and at every shift within the margin,
    /// smaller sizes before larger ones at each shift; every match is pushed
    /// to `hits` with coordinates shifted by the partition's `offset`.
    /// Returns the number of hits added.
    ///
    /// An expected size running past the end of `seq` is clamped to the
    /// bases left only when `seq` ends where the whole sequence ends
    /// (`at_sequence_end`). Inside an interior partition the size is kept and
    /// only the smaller sizes that still fit are tried; the next partition
    /// sees the rest of the window.
    pub fn match_at<'a>(
        &self,
        seq: &[u8],
        k: usize,
        entry: &'a IndexEntry,
        offset: usize,
        at_sequence_end: bool,
        hits: &mut Vec<Hit<'a>>,
    ) -> usize {
        let first = entry.first_primer.as_slice();
        let second = entry.second_primer.as_slice();
        let (len1, len2) = (first.len(), second.len());
        let seq_len = seq.len();

        if k + len1 > seq_len || !self.compare(&seq[k..k + len1], first, Strand::Plus) {
            return 0;
        }

        // Room left after the first primer
        let avail = seq_len - (k + len1);
        if avail < len2 {
            return 0;
        }

        let margin = self.margin.saturating_add(entry.marker.margin_widening);
        let room = seq_len - k;
        let mut exp_size = entry.marker.pcr_size;
        let hi_margin = if exp_size > room {
            if at_sequence_end {
                // Amplicon would run off the sequence: search back from its end
                exp_size = room;
            }
            0
        } else {
            margin.min(room - exp_size)
        };
        let lo_margin = margin.min(exp_size.saturating_sub(len1 + len2));

        // Saturates only for sizes far past the partition, where no shift fits
        let expected = k.saturating_add(exp_size) - len2;
        let mut found = 0;
        let mut try_at = |p2: usize, hits: &mut Vec<Hit<'a>>| {
            if p2 >= k + len1
                && p2 + len2 <= seq_len
                && self.compare(&seq[p2..p2 + len2], second, Strand::Minus)
            {
                hits.push(Hit {
                    start: offset + k,
                    end: offset + p2 + len2 - 1,
                    entry,
                });
                found += 1;
            }
        };

        try_at(expected, hits);
        for shift in 1..=lo_margin.max(hi_margin) {
            if shift <= lo_margin {
                try_at(expected - shift, hits);
            }
            if shift <= hi_margin {
                try_at(expected + shift, hits);
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sts::Marker;

    fn matcher(mismatches: usize, three_prime_match: usize, iupac: bool) -> PairMatcher {
        PairMatcher::new(&SearchConfig {
            mismatches,
            three_prime_match,
            iupac,
            ..SearchConfig::default()
        })
    }

    fn entry(first: &[u8], second: &[u8], pcr_size: usize) -> IndexEntry {
        IndexEntry {
            marker: Arc::new(Marker {
                id: "T".into(),
                primer1: first.to_vec(),
                primer2: second.to_vec(),
                pcr_size,
                margin_widening: 0,
                alias: String::new(),
                line: 1,
            }),
            direction: Direction::Forward,
            first_primer: first.to_vec(),
            second_primer: second.to_vec(),
            hash_offset: 0,
        }
    }

    #[test]
    fn exact_and_case_insensitive() {
        let m = matcher(0, 1, false);
        assert!(m.compare(b"ACGT", b"ACGT", Strand::Plus));
        assert!(m.compare(b"acgt", b"ACGT", Strand::Plus));
        assert!(!m.compare(b"ACGT", b"ACGA", Strand::Plus));
        assert!(!m.compare(b"ACG", b"ACGT", Strand::Plus));
    }

    #[test]
    fn mismatch_budget_outside_protected_zone() {
        let m = matcher(1, 1, false);
        assert!(m.compare(b"ACGT", b"TCGT", Strand::Plus));
        assert!(!m.compare(b"ACGT", b"TGGT", Strand::Plus));
    }

    #[test]
    fn three_prime_zone_has_zero_tolerance() {
        let m = matcher(2, 1, false);
        // Plus strand protects the right end
        assert!(!m.compare(b"ACGT", b"ACGA", Strand::Plus));
        assert!(m.compare(b"ACGT", b"TCGT", Strand::Plus));
        // Minus strand protects the left end
        assert!(!m.compare(b"ACGT", b"TCGT", Strand::Minus));
        assert!(m.compare(b"ACGT", b"ACGA", Strand::Minus));
    }

    #[test]
    fn iupac_mode_switch() {
        assert!(matcher(0, 1, true).compare(b"ATCG", b"NTCG", Strand::Plus));
        assert!(!matcher(0, 1, false).compare(b"ATCG", b"NTCG", Strand::Plus));
    }

    #[test]
    fn finds_second_primer_at_expected_size() {
        let e = entry(b"AAAAC", b"GGGTT", 20);
        let seq = b"AAAACTTTTTTTTTTGGGTTCCCC";
        let mut hits = Vec::new();
        assert_eq!(matcher(0, 1, false).match_at(seq, 0, &e, 100, true, &mut hits), 1);
        assert_eq!((hits[0].start, hits[0].end), (100, 119));
        assert_eq!(hits[0].amplicon_len(), 20);
    }

    #[test]
    fn every_match_in_margin_is_recorded() {
        // Second primer repeated at sizes 20 and 22
        let e = entry(b"AAAAC", b"GGGTT", 21);
        let seq = b"AAAACTTTTTTTTTTGGGTTGGGTTCCCC";
        let mut hits = Vec::new();
        let found = matcher(0, 1, false).match_at(seq, 0, &e, 0, true, &mut hits);
        let ends: Vec<usize> = hits.iter().map(|h| h.end).collect();
        assert_eq!(found, 2);
        assert_eq!(ends, vec![19, 24]);
    }

    #[test]
    fn margin_zero_only_tries_expected_size() {
        let e = entry(b"AAAAC", b"GGGTT", 21);
        let seq = b"AAAACTTTTTTTTTTGGGTTGGGTTCCCC";
        let mut hits = Vec::new();
        let m = PairMatcher::new(&SearchConfig { margin: 0, ..SearchConfig::default() });
        assert_eq!(m.match_at(seq, 0, &e, 0, true, &mut hits), 0);
    }

    #[test]
    fn no_room_for_second_primer() {
        let e = entry(b"AAAAC", b"GGGTT", 20);
        let mut hits = Vec::new();
        assert_eq!(matcher(0, 1, false).match_at(b"AAAACGGG", 0, &e, 0, true, &mut hits), 0);
        assert!(hits.is_empty());
    }

    #[test]
    fn amplicon_clamped_at_sequence_end() {
        // Expected size 40 overruns the 25-base sequence; the primer at the
        // very end is still found by searching back from there.
        let e = entry(b"AAAAC", b"GGGTT", 40);
        let seq = b"AAAACTTTTTTTTTTTTTTTGGGTT";
        let mut hits = Vec::new();
        assert_eq!(matcher(0, 1, false).match_at(seq, 0, &e, 0, true, &mut hits), 1);
        assert_eq!(hits[0].end, 24);
    }

    #[test]
    fn interior_partition_keeps_expected_size() {
        // Clamped at the sequence end the 25-base amplicon is within a margin
        // of 5; with the declared 40 bases kept, it is not.
        let e = entry(b"AAAAC", b"GGGTT", 40);
        let seq = b"AAAACTTTTTTTTTTTTTTTGGGTT";
        let m = PairMatcher::new(&SearchConfig { margin: 5, ..SearchConfig::default() });

        let mut hits = Vec::new();
        assert_eq!(m.match_at(seq, 0, &e, 0, true, &mut hits), 1);
        hits.clear();
        assert_eq!(m.match_at(seq, 0, &e, 0, false, &mut hits), 0);
    }

    #[test]
    fn interior_partition_finds_smaller_sizes_that_fit() {
        // Declared 40 overruns the partition, the real 25-base amplicon is
        // still inside the margin of 20 below it.
        let e = entry(b"AAAAC", b"GGGTT", 40);
        let seq = b"AAAACTTTTTTTTTTTTTTTGGGTT";
        let m = PairMatcher::new(&SearchConfig { margin: 20, ..SearchConfig::default() });

        let mut hits = Vec::new();
        assert_eq!(m.match_at(seq, 0, &e, 0, false, &mut hits), 1);
        assert_eq!(hits[0].amplicon_len(), 25);
    }

    #[test]
    fn huge_pcr_size_does_not_overflow() {
        let e = entry(b"AAAAC", b"GGGTT", usize::MAX);
        let seq = b"AAAACTTTTTTTTTTTTTTTGGGTT";
        let mut hits = Vec::new();
        assert_eq!(matcher(0, 1, false).match_at(seq, 0, &e, 0, false, &mut hits), 0);
        assert_eq!(matcher(0, 1, false).match_at(seq, 0, &e, 0, true, &mut hits), 1);
    }
}

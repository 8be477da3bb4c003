use crate::constants::AMBIGUOUS;
use crate::util::code_of;

/// A fixed-width, ambiguity-free seed extracted from a primer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed {
    /// Start of the seed within the primer.
    pub offset: usize,
    /// `width` 2-bit codes packed MSB-first.
    pub hash: u64,
}

/// Mask keeping the low `2 * width` bits of a packed seed.
#[inline(always)]
pub(crate) const fn seed_mask(width: usize) -> u64 {
    if width >= 32 {
        u64::MAX
    } else {
        (1u64 << (2 * width)) - 1
    }
}

/// Packs `window` into a seed hash, or `None` if any base is ambiguous.
#[inline]
fn pack(window: &[u8]) -> Option<u64> {
    let mut hash = 0u64;
    for &b in window {
        let code = code_of(b);
        if code == AMBIGUOUS {
            return None;
        }
        hash = (hash << 2) | u64::from(code);
    }
    Some(hash)
}

/// Finds the leftmost ambiguity-free seed of `width` bases in `primer`.
///
/// Every start offset is tried left-to-right; an offset is abandoned as soon
/// as an ambiguous base is met and the next one is tried. The first offset
/// yielding a fully concrete seed wins, so the result is deterministic and
/// independent of the hash values themselves.
///
/// # Returns
/// - `Some(Seed)` with `offset ≤ primer.len() - width` and `hash < 4^width`
/// - `None` if `primer` is shorter than `width`, `width` is zero, or every
///   offset contains at least one ambiguous base
///
pub fn build_seed(primer: &[u8], width: usize) -> Option<Seed> {
    if width == 0 || primer.len() < width {
        return None;
    }
    primer
        .windows(width)
        .enumerate()
        .find_map(|(offset, window)| pack(window).map(|hash| Seed { offset, hash }))
}

/// Rolling seed iterator over a sequence.
///
/// Slides a `width`-base window one base at a time, updating the packed hash
/// in O(1) per step and tracking how many of the last `width` bases were
/// ambiguous. Only windows with no ambiguous base are yielded, as
/// `(window_start, hash)` pairs in increasing `window_start` order.
///
/// The yielded hash of a window always equals [`build_seed`] applied to that
/// window alone.
#[derive(Debug, Clone)]
pub struct RollingSeeds<'a> {
    seq:   &'a [u8],
    width: usize,
    mask:  u64,

    // Iteration state
    next_base: usize, // index of the next base to shift in
    hash:      u64,   // packed codes of the bases shifted in so far
    ambiguous: usize, // > 0 while an ambiguous base is still inside the window
}

impl<'a> RollingSeeds<'a> {
    /// Creates a new iterator over `seq` using seeds of `width` bases.
    ///
    /// A `width` of zero yields nothing.
    pub fn new(seq: &'a [u8], width: usize) -> Self {
        Self {
            seq,
            width,
            mask: seed_mask(width),
            next_base: 0,
            hash: 0,
            ambiguous: 0,
        }
    }
}

impl Iterator for RollingSeeds<'_> {
    type Item = (usize, u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.width == 0 {
            return None;
        }
        while self.next_base < self.seq.len() {
            let code = code_of(self.seq[self.next_base]);
            self.next_base += 1;

            // Old high bits fall off through the mask
            self.hash = (self.hash << 2) & self.mask;
            if code == AMBIGUOUS {
                // Stays ineligible until this base has aged out of the window
                self.ambiguous = self.width;
            } else {
                self.ambiguous = self.ambiguous.saturating_sub(1);
                self.hash |= u64::from(code);
            }

            if self.next_base >= self.width && self.ambiguous == 0 {
                return Some((self.next_base - self.width, self.hash));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.seq.len() - self.next_base;
        (0, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_of_homopolymers() {
        // All A's pack to zero; all T's to 4^8 - 1
        assert_eq!(build_seed(b"AAAAAAAA", 8), Some(Seed { offset: 0, hash: 0 }));
        assert_eq!(build_seed(b"TTTTTTTT", 8), Some(Seed { offset: 0, hash: 65535 }));
    }

    #[test]
    fn seed_skips_ambiguous_prefix() {
        // ACG is 0b000110
        let seed = build_seed(b"NNACGT", 3).unwrap();
        assert_eq!(seed, Seed { offset: 2, hash: 0b00_01_10 });
    }

    #[test]
    fn seed_is_leftmost_not_smallest() {
        // "TA" at offset 0 hashes larger than "AA" at offset 1
        let seed = build_seed(b"TAA", 2).unwrap();
        assert_eq!(seed.offset, 0);
    }

    #[test]
    fn seed_rejects_short_and_ambiguous() {
        assert_eq!(build_seed(b"ACG", 4), None);
        assert_eq!(build_seed(b"NNNNNNNNNNN", 11), None);
        assert_eq!(build_seed(b"ACNGTNAC", 3), None);
        assert_eq!(build_seed(b"ACGT", 0), None);
    }

    #[test]
    fn rolling_skips_windows_with_ambiguity() {
        let windows: Vec<usize> = RollingSeeds::new(b"ACGTNACGTA", 4).map(|(p, _)| p).collect();
        // Windows 1..=4 contain the N at index 4
        assert_eq!(windows, vec![0, 5, 6]);
    }

    #[test]
    fn rolling_matches_recomputation() {
        let seq = b"GATTACANNGCRTACGTTAGCAxxTTGACCAGTAGGTACCA";
        for width in [3, 5, 11] {
            let rolled: Vec<(usize, u64)> = RollingSeeds::new(seq, width).collect();
            let direct: Vec<(usize, u64)> = seq
                .windows(width)
                .enumerate()
                .filter_map(|(pos, w)| build_seed(w, width).map(|s| (pos, s.hash)))
                .collect();
            assert_eq!(rolled, direct, "width {width}");
        }
    }

    #[test]
    fn rolling_on_short_sequence_is_empty() {
        assert_eq!(RollingSeeds::new(b"ACG", 4).count(), 0);
    }
}

use crate::constants::{COMPL_BASES, IUPAC_EXPANSIONS, IUPAC_MASKS, SEQ_NT4_TABLE};

/// Encodes a nucleotide ASCII byte into its 2-bit code (0‒3), or `AMBIGUOUS` (4).
///
/// Uses the `SEQ_NT4_TABLE`, which assigns:
/// - A/a → 0
/// - C/c → 1
/// - G/g → 2
/// - T/t, U/u → 3
/// - Any other byte (including IUPAC ambiguity symbols) → 4
///
/// # Arguments
///
/// * `b` – An ASCII byte representing a nucleotide.
///
/// # Returns
///
/// * A 2-bit encoding (0..=3) for concrete bases, or 4 for any other byte.
#[inline(always)]
pub const fn code_of(b: u8) -> u8 {
    SEQ_NT4_TABLE[b as usize]
}

/// Returns the complementary base for the given ASCII byte.
///
/// Looks up the byte in the `COMPL_BASES` table, which covers the canonical
/// bases and the IUPAC ambiguity symbols in both cases, preserving case.
/// Anything else complements to `b'N'`.
#[inline(always)]
pub const fn complement(b: u8) -> u8 {
    COMPL_BASES[b as usize]
}

/// Returns the reverse complement of `seq` as a new buffer.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

/// Returns the set of IUPAC symbols `b` may stand for, or `None` when `b`
/// is not an IUPAC symbol. Lookup is case-insensitive; a canonical base
/// expands to itself (`T` and `U` to each other).
pub fn expand(b: u8) -> Option<&'static [u8]> {
    let upper = b.to_ascii_uppercase();
    IUPAC_EXPANSIONS
        .iter()
        .find(|(symbol, _)| *symbol == upper)
        .map(|(_, members)| *members)
}

/// Compares two bytes under IUPAC semantics: symbols match when their
/// expansion sets intersect. Bytes outside the IUPAC alphabet fall back to
/// case-insensitive equality.
#[inline(always)]
pub fn iupac_match(a: u8, b: u8) -> bool {
    let (ma, mb) = (IUPAC_MASKS[a as usize], IUPAC_MASKS[b as usize]);
    if ma != 0 && mb != 0 {
        ma & mb != 0
    } else {
        a.eq_ignore_ascii_case(&b)
    }
}

/// Checks that a configuration value lies in an inclusive range and returns
/// early with the given error variant otherwise.
///
/// Intended for the top of validation routines, one invocation per bounded
/// parameter:
///
/// ```ignore
/// check_range!(self.wordsize, MIN_WORDSIZE, MAX_WORDSIZE, PcrError::WordSizeOutOfRange);
/// ```
///
/// The error variant must be a tuple variant taking the offending value.
macro_rules! check_range {
    ($value:expr, $min:expr, $max:expr, $err:expr) => {{
        let value = $value;
        if !($min..=$max).contains(&value) {
            return Err($err(value));
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_case_insensitive() {
        for (upper, code) in [(b'A', 0), (b'C', 1), (b'G', 2), (b'T', 3), (b'U', 3)] {
            assert_eq!(code_of(upper), code);
            assert_eq!(code_of(upper.to_ascii_lowercase()), code);
        }
        assert_eq!(code_of(b'N'), crate::AMBIGUOUS);
        assert_eq!(code_of(b'-'), crate::AMBIGUOUS);
    }

    #[test]
    fn complement_preserves_case() {
        assert_eq!(complement(b'a'), b't');
        assert_eq!(complement(b'R'), b'Y');
        assert_eq!(complement(b'r'), b'y');
        assert_eq!(complement(b'?'), b'N');
    }

    #[test]
    fn reverse_complement_known_values() {
        assert_eq!(reverse_complement(b"ACGT"), b"ACGT");
        assert_eq!(reverse_complement(b"GCTA"), b"TAGC");
        assert_eq!(reverse_complement(b"ATGCN"), b"NGCAT");
    }

    #[test]
    fn expansion_sets() {
        assert_eq!(expand(b'A'), Some(&b"A"[..]));
        assert_eq!(expand(b'n').map(<[u8]>::len), Some(16));
        assert_eq!(expand(b'Z'), None);
    }

    #[test]
    fn iupac_intersections() {
        assert!(iupac_match(b'N', b'A'));
        assert!(iupac_match(b'R', b'g'));
        assert!(iupac_match(b'T', b'U'));
        assert!(!iupac_match(b'R', b'Y'));
        assert!(!iupac_match(b'A', b'C'));
        // X is outside the IUPAC alphabet: plain equality
        assert!(iupac_match(b'X', b'x'));
        assert!(!iupac_match(b'X', b'N'));
    }
}

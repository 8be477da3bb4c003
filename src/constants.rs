#![allow(clippy::unreadable_literal)]

// Global constants used throughout the product code.

// ---- Search parameter defaults ----

pub const DEFAULT_WORDSIZE: usize = 11;
pub const DEFAULT_MARGIN: usize = 50;
pub const DEFAULT_MISMATCHES: usize = 0;
pub const DEFAULT_THREE_PRIME_MATCH: usize = 1;
pub const DEFAULT_PCR_SIZE: usize = 240;
pub const DEFAULT_THREADS: usize = 1;

// ---- Search parameter bounds (inclusive) ----

pub const MIN_WORDSIZE: usize = 3;
pub const MAX_WORDSIZE: usize = 16;
pub const MIN_MARGIN: usize = 0;
pub const MAX_MARGIN: usize = 10000;
pub const MIN_MISMATCHES: usize = 0;
pub const MAX_MISMATCHES: usize = 10;
pub const MIN_PCR_SIZE: usize = 1;
pub const MAX_PCR_SIZE: usize = 10000;

/// Sequences shorter than this are always searched as a single partition.
pub const MIN_SEQ_LEN_FOR_THREADING: usize = 100_000;

// `ASCII_SIZE` – Number of possible ASCII values (0..255).
pub const ASCII_SIZE: usize = 256;

/// Sentinel returned by the 2-bit code table for anything that is not A/C/G/T/U.
pub const AMBIGUOUS: u8 = 4;

/// Complement base lookup table covering the canonical bases and every IUPAC
/// ambiguity symbol. Case is preserved (`a → t`, `R → Y`, `r → y`); any other
/// byte complements to `N`.
pub const COMPL_BASES: [u8; ASCII_SIZE] = {
    const PAIRS: [(u8, u8); 17] = [
        (b'A', b'T'),
        (b'C', b'G'),
        (b'G', b'C'),
        (b'T', b'A'),
        (b'U', b'A'), // RNA
        (b'R', b'Y'),
        (b'Y', b'R'),
        (b'M', b'K'),
        (b'K', b'M'),
        (b'S', b'S'),
        (b'W', b'W'),
        (b'B', b'V'),
        (b'V', b'B'),
        (b'D', b'H'),
        (b'H', b'D'),
        (b'N', b'N'),
        (b'X', b'X'),
    ];

    // Initialize all entries to 'N' (unknown nucleotide).
    let mut tbl = [b'N'; ASCII_SIZE];
    let mut i = 0;
    while i < PAIRS.len() {
        let (from, to) = PAIRS[i];
        tbl[from as usize] = to;
        tbl[from.to_ascii_lowercase() as usize] = to.to_ascii_lowercase();
        i += 1;
    }
    tbl
};

/// 2-bit encoding table for nucleotide sequences. Maps ASCII characters to:
/// A=0, C=1, G=2, T/U=3, any other character=`AMBIGUOUS` (4).
pub const SEQ_NT4_TABLE: [u8; ASCII_SIZE] = {
    // Initialize all entries to the ambiguity sentinel.
    let mut t = [AMBIGUOUS; ASCII_SIZE];

    // Assign valid encodings (uppercase and lowercase).
    t[b'A' as usize] = 0; // A → 00b
    t[b'a' as usize] = 0;

    t[b'C' as usize] = 1; // C → 01b
    t[b'c' as usize] = 1;

    t[b'G' as usize] = 2; // G → 10b
    t[b'g' as usize] = 2;

    t[b'T' as usize] = 3; // T → 11b
    t[b't' as usize] = 3;

    // RNA: U (or u) is treated as T.
    t[b'U' as usize] = 3;
    t[b'u' as usize] = 3;

    t
};

/// Every symbol that takes part in IUPAC-aware comparison, in bit order.
pub const IUPAC_SYMBOLS: &[u8; 16] = b"ACGTURYMKSWBDHVN";

/// What each IUPAC symbol may stand for. Sets are over symbols rather than
/// concrete bases, so `R` and `D` match through their shared `A`/`G`/`R`.
pub const IUPAC_EXPANSIONS: [(u8, &[u8]); 16] = [
    (b'A', b"A"),
    (b'C', b"C"),
    (b'G', b"G"),
    (b'T', b"TU"),
    (b'U', b"TU"),
    (b'R', b"AGR"),
    (b'Y', b"CTUY"),
    (b'M', b"ACM"),
    (b'K', b"GTUK"),
    (b'S', b"CGS"),
    (b'W', b"ATUW"),
    (b'B', b"CGTUYKSB"),
    (b'D', b"AGTURKWD"),
    (b'H', b"ACTUYMWH"),
    (b'V', b"ACGRMSV"),
    (b'N', b"ACGTURYMKSWBDHVN"),
];

/// IUPAC expansion sets packed as bitmasks over `IUPAC_SYMBOLS`, for both cases.
/// Bytes outside the IUPAC alphabet map to 0.
pub const IUPAC_MASKS: [u16; ASCII_SIZE] = {
    let mut tbl = [0u16; ASCII_SIZE];
    let mut i = 0;
    while i < IUPAC_EXPANSIONS.len() {
        let (symbol, members) = IUPAC_EXPANSIONS[i];
        let mut mask = 0u16;
        let mut j = 0;
        while j < members.len() {
            let mut bit = 0;
            while bit < IUPAC_SYMBOLS.len() {
                if IUPAC_SYMBOLS[bit] == members[j] {
                    mask |= 1 << bit;
                }
                bit += 1;
            }
            j += 1;
        }
        tbl[symbol as usize] = mask;
        tbl[symbol.to_ascii_lowercase() as usize] = mask;
        i += 1;
    }
    tbl
};

/// Bytes a FASTA sequence line may contribute: the canonical bases, `U`, the
/// IUPAC ambiguity symbols and `X`, in either case.
pub const SEQUENCE_ALPHABET: [bool; ASCII_SIZE] = {
    const SYMBOLS: &[u8] = b"ACGTUBDHKMNRSVWXY";
    let mut tbl = [false; ASCII_SIZE];
    let mut i = 0;
    while i < SYMBOLS.len() {
        tbl[SYMBOLS[i] as usize] = true;
        tbl[SYMBOLS[i].to_ascii_lowercase() as usize] = true;
        i += 1;
    }
    tbl
};

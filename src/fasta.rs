// FASTA loading built on bio::io::fasta
//
// Plain and gzip-compressed files are accepted (gzip detected by the .gz
// extension). Sequence bytes are filtered down to nucleotide and IUPAC
// symbols; everything else on a sequence line is dropped.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bio::io::fasta;
use flate2::read::MultiGzDecoder;
use tracing::info;

use crate::constants::SEQUENCE_ALPHABET;
use crate::{PcrError, Result};

/// One target sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// First whitespace-delimited token of the description line.
    pub label: String,
    /// Rest of the description line, if any.
    pub description: Option<String>,
    /// Case-preserved bases.
    pub sequence: Vec<u8>,
}

impl FastaRecord {
    pub fn new(label: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            description: None,
            sequence: sequence.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Reads every record from `reader`. `path` only labels errors.
pub fn read_fasta<R: Read>(reader: R, path: &Path) -> Result<Vec<FastaRecord>> {
    let mut records = Vec::new();
    for record in fasta::Reader::new(reader).records() {
        let record = record.map_err(|e| PcrError::Fasta {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        records.push(FastaRecord {
            label: record.id().to_owned(),
            description: record.desc().map(str::to_owned),
            sequence: record
                .seq()
                .iter()
                .copied()
                .filter(|&b| SEQUENCE_ALPHABET[b as usize])
                .collect(),
        });
    }
    Ok(records)
}

/// Opens and reads a FASTA file. An empty file is an error.
pub fn load_fasta_file(path: &Path) -> Result<Vec<FastaRecord>> {
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

    info!("Reading FASTA file: {}", path.display());
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    let records = read_fasta(BufReader::new(reader), path)?;
    info!("Loaded {} sequences", records.len());
    Ok(records)
}

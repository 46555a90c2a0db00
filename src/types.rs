use std::fmt;
use std::path::PathBuf;

/// Marker that opens every FASTA header line.
pub const HEADER_MARKER: char = '>';

/// One FASTA entry: the verbatim header line and the concatenated residues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub header: String,
    pub sequence: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    /// The lookup key for splice instructions: the whole header minus the marker,
    /// description text included.
    pub fn name(&self) -> &str {
        self.header
            .strip_prefix(HEADER_MARKER)
            .unwrap_or(&self.header)
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// A 1-based, inclusive coordinate range in the original sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpliceRange {
    pub start: i64,
    pub end: i64,
}

impl SpliceRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for SpliceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// One parsed row of the instruction table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceInstruction {
    pub source_file: PathBuf,
    pub sequence_name: String,
    pub range: SpliceRange,
    pub dest_file: PathBuf,
}

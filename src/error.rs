use std::path::PathBuf;
use thiserror::Error;

pub type SpliceResult<T> = Result<T, SpliceError>;

/// Everything that can go wrong while planning or writing splices.
///
/// Row-level variants (`RowParse`, `SourceMissing`) are recoverable and end up
/// in the plan's issue list; the I/O variants are fatal to a single job.
#[derive(Debug, Error)]
pub enum SpliceError {
    #[error("Error processing row: {row:?}. Error: {reason}")]
    RowParse { row: Vec<String>, reason: String },

    #[error("Error: {} does not exist.", path.display())]
    SourceMissing { path: PathBuf },

    #[error("cannot open FASTA source {}: {source}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed reading FASTA source {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write destination {}: {source}", path.display())]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

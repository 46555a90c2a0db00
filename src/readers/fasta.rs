use crate::error::{SpliceError, SpliceResult};
use crate::types::{SequenceRecord, HEADER_MARKER};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::mem;
use std::path::{Path, PathBuf};

/// Streams `(header, sequence)` records out of FASTA text.
///
/// A record starts at a `>` line and runs until the next one or end of input.
/// Lines are trimmed before use, sequence lines are joined without separators,
/// and anything before the first header is dropped. Every call to
/// [`FastaReader::from_path`] re-opens the file and starts from the top.
pub struct FastaReader<R: BufRead> {
    reader: R,
    path: PathBuf,
    line: String,
    header: Option<String>,
    sequence: Vec<u8>,
    finished: bool,
}

impl FastaReader<BufReader<Box<dyn Read>>> {
    pub fn from_path(path: &Path) -> SpliceResult<Self> {
        let not_found = |source| SpliceError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(not_found)?;
        let inner: Box<dyn Read> = match niffler::get_reader(Box::new(file)) {
            Ok((reader, _compression)) => reader,
            Err(niffler::Error::IOError(e)) => return Err(not_found(e)),
            // Too short to sniff: nothing to decompress, read it as-is.
            Err(_) => Box::new(File::open(path).map_err(not_found)?),
        };

        Ok(Self::with_path(
            BufReader::with_capacity(1024 * 1024, inner),
            path,
        ))
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_path(reader, Path::new("-"))
    }

    fn with_path(reader: R, path: &Path) -> Self {
        Self {
            reader,
            path: path.to_path_buf(),
            line: String::new(),
            header: None,
            sequence: Vec::new(),
            finished: false,
        }
    }

    fn flush_record(&mut self, next_header: Option<String>) -> Option<SequenceRecord> {
        let header = mem::replace(&mut self.header, next_header)?;
        Some(SequenceRecord {
            header,
            sequence: mem::take(&mut self.sequence),
        })
    }

    fn read_record(&mut self) -> SpliceResult<Option<SequenceRecord>> {
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_line(&mut self.line)
                .map_err(|source| SpliceError::SourceRead {
                    path: self.path.clone(),
                    source,
                })?;

            if read == 0 {
                self.finished = true;
                return Ok(self.flush_record(None));
            }

            let trimmed = self.line.trim();
            if trimmed.starts_with(HEADER_MARKER) {
                let header = trimmed.to_string();
                if let Some(record) = self.flush_record(Some(header)) {
                    return Ok(Some(record));
                }
                self.sequence.clear();
            } else if self.header.is_some() {
                self.sequence.extend_from_slice(trimmed.as_bytes());
            }
        }
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = SpliceResult<SequenceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

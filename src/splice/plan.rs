use crate::error::{SpliceError, SpliceResult};
use crate::types::{SpliceInstruction, SpliceRange};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Number of columns in an instruction row:
/// `old_file, sequence_name, start, end, new_file`.
pub const INSTRUCTION_COLUMNS: usize = 5;

/// A CSV row that did not make it into the plan.
#[derive(Debug)]
pub struct RowIssue {
    pub line: u64,
    pub error: SpliceError,
}

/// Ranges to cut, keyed by the full header text after `>`.
pub type SequenceRanges = HashMap<String, Vec<SpliceRange>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationGroup {
    pub dest_file: PathBuf,
    pub sequences: SequenceRanges,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    pub source_file: PathBuf,
    pub destinations: Vec<DestinationGroup>,
}

/// One `(source, destination)` rewrite pass.
#[derive(Debug, Clone, Copy)]
pub struct SpliceJob<'a> {
    pub source_file: &'a Path,
    pub dest_file: &'a Path,
    pub sequences: &'a SequenceRanges,
}

/// All requested deletions, grouped source -> destination -> sequence name.
///
/// Sources and destinations keep the order in which the table first mentions
/// them. Ranges keep row order; they are re-sorted when applied.
#[derive(Debug, Default)]
pub struct SplicePlan {
    sources: Vec<SourceGroup>,
    issues: Vec<RowIssue>,
}

impl SplicePlan {
    pub fn from_csv_path(path: &Path) -> SpliceResult<Self> {
        let reader = csv_reader().from_path(path)?;
        Self::from_csv(reader, |p| p.exists())
    }

    /// Builds a plan from CSV text. `source_exists` decides whether a row's
    /// `old_file` is usable; rows failing it are recorded as issues.
    pub fn from_reader<R: Read>(
        reader: R,
        source_exists: impl Fn(&Path) -> bool,
    ) -> SpliceResult<Self> {
        Self::from_csv(csv_reader().from_reader(reader), source_exists)
    }

    fn from_csv<R: Read>(
        mut reader: csv::Reader<R>,
        source_exists: impl Fn(&Path) -> bool,
    ) -> SpliceResult<Self> {
        let mut plan = SplicePlan::default();
        // Header row is required but its names are not checked.
        reader.headers()?;

        let mut record = StringRecord::new();
        loop {
            let line = reader.position().line();
            match reader.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    plan.issues.push(RowIssue { line, error: e.into() });
                    continue;
                }
            }
            let line = record.position().map_or(line, |p| p.line());

            let instruction = match parse_instruction(&record) {
                Ok(instruction) => instruction,
                Err(error) => {
                    plan.issues.push(RowIssue { line, error });
                    continue;
                }
            };

            if !source_exists(&instruction.source_file) {
                plan.issues.push(RowIssue {
                    line,
                    error: SpliceError::SourceMissing {
                        path: instruction.source_file,
                    },
                });
                continue;
            }

            plan.insert(instruction);
        }

        Ok(plan)
    }

    pub fn insert(&mut self, instruction: SpliceInstruction) {
        let SpliceInstruction {
            source_file,
            sequence_name,
            range,
            dest_file,
        } = instruction;

        let source_idx = match self
            .sources
            .iter()
            .position(|s| s.source_file == source_file)
        {
            Some(idx) => idx,
            None => {
                self.sources.push(SourceGroup {
                    source_file,
                    destinations: Vec::new(),
                });
                self.sources.len() - 1
            }
        };
        let destinations = &mut self.sources[source_idx].destinations;

        let dest_idx = match destinations.iter().position(|d| d.dest_file == dest_file) {
            Some(idx) => idx,
            None => {
                destinations.push(DestinationGroup {
                    dest_file,
                    sequences: HashMap::new(),
                });
                destinations.len() - 1
            }
        };

        destinations[dest_idx]
            .sequences
            .entry(sequence_name)
            .or_default()
            .push(range);
    }

    pub fn sources(&self) -> &[SourceGroup] {
        &self.sources
    }

    pub fn issues(&self) -> &[RowIssue] {
        &self.issues
    }

    /// Ranges registered for one `(source, dest, name)` triple.
    pub fn ranges(&self, source: &Path, dest: &Path, name: &str) -> Option<&[SpliceRange]> {
        self.sources
            .iter()
            .find(|s| s.source_file == source)?
            .destinations
            .iter()
            .find(|d| d.dest_file == dest)?
            .sequences
            .get(name)
            .map(Vec::as_slice)
    }

    /// Every `(source, dest)` pass in plan order.
    pub fn jobs(&self) -> impl Iterator<Item = SpliceJob<'_>> + '_ {
        self.sources.iter().flat_map(|source| {
            source.destinations.iter().map(move |dest| SpliceJob {
                source_file: &source.source_file,
                dest_file: &dest.dest_file,
                sequences: &dest.sequences,
            })
        })
    }

    pub fn job_count(&self) -> usize {
        self.sources.iter().map(|s| s.destinations.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

fn csv_reader() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(Trim::All);
    builder
}

fn parse_instruction(record: &StringRecord) -> Result<SpliceInstruction, SpliceError> {
    let row_error = |reason: String| SpliceError::RowParse {
        row: record.iter().map(str::to_string).collect(),
        reason,
    };

    if record.len() != INSTRUCTION_COLUMNS {
        return Err(row_error(format!(
            "expected {} columns, found {}",
            INSTRUCTION_COLUMNS,
            record.len()
        )));
    }

    let coordinate = |idx: usize| -> Result<i64, SpliceError> {
        let value = &record[idx];
        value
            .parse::<i64>()
            .map_err(|_| row_error(format!("invalid literal for integer: '{}'", value)))
    };

    Ok(SpliceInstruction {
        source_file: PathBuf::from(&record[0]),
        sequence_name: record[1].to_string(),
        range: SpliceRange::new(coordinate(2)?, coordinate(3)?),
        dest_file: PathBuf::from(&record[4]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "old_file,sequence_name,start,end,new_file\n";

    fn plan(rows: &str) -> SplicePlan {
        let text = format!("{}{}", HEADER, rows);
        SplicePlan::from_reader(text.as_bytes(), |p| p != Path::new("missing.fa")).unwrap()
    }

    #[test]
    fn test_groups_by_source_dest_and_name() {
        let plan = plan(
            "a.fa,seq1,3,5,out1.fa\n\
             a.fa,seq1,10,12,out1.fa\n\
             a.fa,seq2,1,1,out1.fa\n\
             a.fa,seq1,7,8,out2.fa\n\
             b.fa,seq1,2,2,out1.fa\n",
        );

        assert!(plan.issues().is_empty());
        assert_eq!(plan.sources().len(), 2);
        assert_eq!(plan.job_count(), 3);
        assert_eq!(
            plan.ranges(Path::new("a.fa"), Path::new("out1.fa"), "seq1"),
            Some(&[SpliceRange::new(3, 5), SpliceRange::new(10, 12)][..])
        );
        assert_eq!(
            plan.ranges(Path::new("a.fa"), Path::new("out2.fa"), "seq1"),
            Some(&[SpliceRange::new(7, 8)][..])
        );
        assert_eq!(plan.ranges(Path::new("a.fa"), Path::new("out2.fa"), "seq2"), None);

        let jobs: Vec<_> = plan
            .jobs()
            .map(|j| (j.source_file.to_path_buf(), j.dest_file.to_path_buf()))
            .collect();
        assert_eq!(
            jobs,
            vec![
                (PathBuf::from("a.fa"), PathBuf::from("out1.fa")),
                (PathBuf::from("a.fa"), PathBuf::from("out2.fa")),
                (PathBuf::from("b.fa"), PathBuf::from("out1.fa")),
            ]
        );
    }

    #[test]
    fn test_values_are_trimmed() {
        let plan = plan(" a.fa , seq 1 desc , 3 , 5 , out.fa \n");
        assert_eq!(
            plan.ranges(Path::new("a.fa"), Path::new("out.fa"), "seq 1 desc"),
            Some(&[SpliceRange::new(3, 5)][..])
        );
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let plan = plan(
            "a.fa,seq1,three,5,out.fa\n\
             a.fa,seq1,3\n\
             a.fa,seq1,1.5,5,out.fa\n\
             a.fa,seq1,3,5,out.fa\n",
        );

        assert_eq!(plan.issues().len(), 3);
        assert!(plan
            .issues()
            .iter()
            .all(|i| matches!(i.error, SpliceError::RowParse { .. })));
        assert_eq!(plan.issues()[0].line, 2);
        assert_eq!(
            plan.ranges(Path::new("a.fa"), Path::new("out.fa"), "seq1"),
            Some(&[SpliceRange::new(3, 5)][..])
        );
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let plan = plan(
            "missing.fa,seq1,3,5,out.fa\n\
             a.fa,seq1,3,5,out.fa\n",
        );

        assert_eq!(plan.issues().len(), 1);
        match &plan.issues()[0].error {
            SpliceError::SourceMissing { path } => assert_eq!(path, Path::new("missing.fa")),
            other => panic!("unexpected issue: {:?}", other),
        }
        assert_eq!(plan.job_count(), 1);
        assert_eq!(plan.sources()[0].source_file, Path::new("a.fa"));
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let plan = plan("");
        assert!(plan.is_empty());
        assert!(plan.issues().is_empty());
    }
}

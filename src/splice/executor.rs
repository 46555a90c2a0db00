use super::apply::{apply_splices, cut_order};
use super::plan::{SpliceJob, SplicePlan};
use crate::error::{SpliceError, SpliceResult};
use crate::readers::FastaReader;
use crate::types::SpliceRange;
use crate::utils::threading::run_ordered;
use bio::io::fasta;
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Something worth telling the user while a job runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpliceEvent {
    JobStarted {
        source: PathBuf,
        dest: PathBuf,
    },
    Spliced {
        name: String,
        source: PathBuf,
        range: SpliceRange,
        dest: PathBuf,
    },
    Copied {
        name: String,
        source: PathBuf,
        dest: PathBuf,
    },
}

impl fmt::Display for SpliceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpliceEvent::JobStarted { source, dest } => write!(
                f,
                "Processing {}, outputting to {}...",
                source.display(),
                dest.display()
            ),
            SpliceEvent::Spliced {
                name,
                source,
                range,
                dest,
            } => write!(
                f,
                "Splicing {} in {} from {} for output in {}",
                name,
                source.display(),
                range,
                dest.display()
            ),
            SpliceEvent::Copied { name, source, dest } => write!(
                f,
                "No splicing for {} in {}; copied to {}",
                name,
                source.display(),
                dest.display()
            ),
        }
    }
}

/// Receives per-job diagnostics. Shared between workers when jobs run in parallel.
pub trait Reporter: Sync {
    fn report(&self, event: &SpliceEvent);
}

/// Discards every event.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _event: &SpliceEvent) {}
}

#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    pub threads: usize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self { threads: 1 }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JobStats {
    pub records: usize,
    pub spliced: usize,
    pub bases_removed: usize,
}

#[derive(Debug)]
pub struct JobOutcome {
    pub source_file: PathBuf,
    pub dest_file: PathBuf,
    pub result: SpliceResult<JobStats>,
}

#[derive(Debug, Default)]
pub struct ExecutionSummary {
    pub outcomes: Vec<JobOutcome>,
}

impl ExecutionSummary {
    pub fn failures(&self) -> impl Iterator<Item = (&JobOutcome, &SpliceError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }

    pub fn totals(&self) -> JobStats {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .fold(JobStats::default(), |acc, s| JobStats {
                records: acc.records + s.records,
                spliced: acc.spliced + s.spliced,
                bases_removed: acc.bases_removed + s.bases_removed,
            })
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }
}

/// Runs every `(source, dest)` job in the plan.
///
/// A failing job is recorded in the summary and does not stop the others.
/// Jobs run in parallel only when `threads > 1` and the jobs touch disjoint
/// files: no two jobs share a destination and no destination is read by
/// another job. Otherwise they run in plan order, so a later job sees (or
/// overwrites) what an earlier one wrote.
pub fn execute_plan(
    plan: &SplicePlan,
    options: &ExecuteOptions,
    reporter: &dyn Reporter,
    progress: &ProgressBar,
) -> ExecutionSummary {
    let jobs: Vec<SpliceJob<'_>> = plan.jobs().collect();
    progress.set_length(jobs.len() as u64);

    let threads = if jobs_depend_on_each_other(&jobs) {
        1
    } else {
        options.threads.max(1)
    };

    let outcomes = run_ordered(jobs, threads, |job| {
        progress.set_message(format!("{}", job.dest_file.display()));
        let result = run_job(&job, reporter);
        progress.inc(1);
        JobOutcome {
            source_file: job.source_file.to_path_buf(),
            dest_file: job.dest_file.to_path_buf(),
            result,
        }
    });

    ExecutionSummary { outcomes }
}

fn jobs_depend_on_each_other(jobs: &[SpliceJob<'_>]) -> bool {
    let sources: HashSet<PathBuf> = jobs.iter().map(|job| path_key(job.source_file)).collect();
    let mut destinations = HashSet::new();
    jobs.iter().any(|job| {
        let dest = path_key(job.dest_file);
        sources.contains(&dest) || !destinations.insert(dest)
    })
}

/// Resolves `path` so `./b.fa` and `b.fa` compare equal. Destinations that do
/// not exist yet are resolved through their parent directory.
fn path_key(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Rewrites one source into one destination, cutting the ranges listed for
/// each matching header.
pub fn run_job(job: &SpliceJob<'_>, reporter: &dyn Reporter) -> SpliceResult<JobStats> {
    let dest_error = |source| SpliceError::DestinationWrite {
        path: job.dest_file.to_path_buf(),
        source,
    };

    let file = File::create(job.dest_file).map_err(dest_error)?;
    let mut writer = fasta::Writer::new(file);
    reporter.report(&SpliceEvent::JobStarted {
        source: job.source_file.to_path_buf(),
        dest: job.dest_file.to_path_buf(),
    });

    let mut stats = JobStats::default();
    for record in FastaReader::from_path(job.source_file)? {
        let record = record?;
        let name = record.name();

        match job.sequences.get(name) {
            Some(ranges) => {
                let spliced = apply_splices(&record.sequence, ranges);
                report_cuts(job, name, ranges, reporter);
                writer.write(name, None, &spliced).map_err(dest_error)?;
                stats.spliced += 1;
                stats.bases_removed += record.len().saturating_sub(spliced.len());
            }
            None => {
                writer
                    .write(name, None, &record.sequence)
                    .map_err(dest_error)?;
                reporter.report(&SpliceEvent::Copied {
                    name: name.to_string(),
                    source: job.source_file.to_path_buf(),
                    dest: job.dest_file.to_path_buf(),
                });
            }
        }
        stats.records += 1;
    }

    writer.flush().map_err(dest_error)?;
    Ok(stats)
}

fn report_cuts(job: &SpliceJob<'_>, name: &str, ranges: &[SpliceRange], reporter: &dyn Reporter) {
    for range in cut_order(ranges) {
        reporter.report(&SpliceEvent::Spliced {
            name: name.to_string(),
            source: job.source_file.to_path_buf(),
            range,
            dest: job.dest_file.to_path_buf(),
        });
    }
}

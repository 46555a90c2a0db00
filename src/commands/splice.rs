use crate::config::Config;
use crate::splice::{execute_plan, ExecuteOptions, ExecutionSummary, Reporter, SpliceEvent, SplicePlan};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::io::{self, Stdout, Write};
use std::path::Path;
use std::sync::Mutex;

/// Prints diagnostics to stdout without tearing the progress spinner.
pub struct ConsoleReporter<W = Stdout> {
    progress: ProgressBar,
    out: Mutex<W>,
}

impl ConsoleReporter<Stdout> {
    pub fn new(progress: ProgressBar) -> Self {
        Self::with_writer(progress, io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn with_writer(progress: ProgressBar, out: W) -> Self {
        Self {
            progress,
            out: Mutex::new(out),
        }
    }

    pub fn into_writer(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn line(&self, message: &str) {
        // The bar draws on stderr; diagnostics belong on `out`.
        self.progress.suspend(|| {
            let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
            let _ = writeln!(out, "{}", message);
        });
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn report(&self, event: &SpliceEvent) {
        self.line(&event.to_string());
    }
}

/// Plans and applies every splice listed in `csv_path`.
///
/// Skipped rows and failed output files are reported but do not make the run fail;
/// only an unreadable instruction table does.
pub fn run(csv_path: &Path, config: &Config) -> Result<ExecutionSummary> {
    let plan = SplicePlan::from_csv_path(csv_path)
        .with_context(|| format!("Failed to read splice table {}", csv_path.display()))?;

    for issue in plan.issues() {
        println!("{}", issue.error);
    }

    let progress = ProgressBarBuilder::new("Splicing")
        .with_template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")
        .with_length(plan.job_count() as u64)
        .with_tick()
        .hidden(!config.show_progress)
        .build()?;
    let reporter = ConsoleReporter::new(progress.clone());

    let options = ExecuteOptions {
        threads: config.threads,
    };
    let summary = execute_plan(&plan, &options, &reporter, &progress);
    progress.finish_and_clear();

    for (outcome, error) in summary.failures() {
        eprintln!(
            "Error: {} -> {}: {}",
            outcome.source_file.display(),
            outcome.dest_file.display(),
            error
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_diagnostics_go_to_writer_while_bar_is_visible() {
        let progress = ProgressBar::new(3);
        let reporter = ConsoleReporter::with_writer(progress, Vec::new());

        reporter.report(&SpliceEvent::JobStarted {
            source: PathBuf::from("old.fasta"),
            dest: PathBuf::from("new.fasta"),
        });
        reporter.report(&SpliceEvent::Copied {
            name: "seq2".to_string(),
            source: PathBuf::from("old.fasta"),
            dest: PathBuf::from("new.fasta"),
        });

        let text = String::from_utf8(reporter.into_writer()).unwrap();
        assert_eq!(
            text,
            "Processing old.fasta, outputting to new.fasta...\n\
             No splicing for seq2 in old.fasta; copied to new.fasta\n"
        );
    }
}

use clap::Parser;

/// Remove coordinate ranges from named FASTA sequences, driven by a CSV table.
///
/// Each row of the table reads `old_file, sequence_name, start, end, new_file`
/// with 1-based inclusive coordinates.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV file listing the regions to remove
    pub regions_csv: String,

    /// Rewrite independent output files on this many threads (overrides config)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Hide the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

use clap::error::ErrorKind;
use clap::Parser;
use contig_splicer::{cli, commands, config::Config};
use std::path::Path;

fn main() {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let mut config = Config::load();
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if args.no_progress {
        config.show_progress = false;
    }

    if let Err(e) = commands::splice::run(Path::new(&args.regions_csv), &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

mod fasta;

pub use fasta::FastaReader;

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod readers;
pub mod splice;
pub mod types;
pub mod utils;

pub use error::{SpliceError, SpliceResult};
pub use readers::FastaReader;
pub use splice::{apply_splices, execute_plan, SplicePlan};
pub use types::{SequenceRecord, SpliceInstruction, SpliceRange};

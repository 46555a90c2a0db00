pub mod apply;
pub mod executor;
pub mod plan;

pub use apply::apply_splices;
pub use executor::{execute_plan, ExecuteOptions, ExecutionSummary, Reporter, SpliceEvent};
pub use plan::{SpliceJob, SplicePlan};

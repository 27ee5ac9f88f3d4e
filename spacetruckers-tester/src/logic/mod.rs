pub mod policy;
pub mod reports;
pub mod simulation;

pub use policy::Strategy;
pub use simulation::{RunConfig, RunSummary, run_autopilot};

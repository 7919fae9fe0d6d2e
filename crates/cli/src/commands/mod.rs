//! CLI commands for the launch-cycle study.

pub mod analyze;
pub mod cycles;

pub use analyze::{run_analyze, AnalyzeArgs};
pub use cycles::{run_cycles, CyclesArgs};

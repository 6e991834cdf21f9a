//! Test execution engine
//!
//! Sequential test execution with per-test timeout supervision.

mod runner;
mod supervisor;

pub use runner::TestRunner;
pub use supervisor::{SupervisorHandle, SupervisorSettings, TimeoutSupervisor};

//! Console output
//!
//! Live progress printing for verbose runs.

mod progress;

pub use progress::ProgressPrinter;

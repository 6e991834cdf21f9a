//! Live console progress
//!
//! Optional colored per-test progress lines and the end-of-run summary.

use std::io::Write;

use crate::models::Verdict;
use crate::report::RunReport;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Prints live per-test progress when verbose mode is on.
pub struct ProgressPrinter {
    verbose: bool,
    colorize: bool,
}

impl ProgressPrinter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Announce a test about to run; the verdict is appended to the same
    /// line once classification finishes.
    pub fn announce(&self, current: usize, total: usize, test_id: &str) {
        if !self.verbose {
            return;
        }
        print!("{current} / {total} : Running test: {test_id} --> ");
        let _ = std::io::stdout().flush();
    }

    /// Complete the announced line with the colored outcome.
    pub fn verdict(&self, verdict: &Verdict) {
        if !self.verbose {
            return;
        }
        println!("{}", self.paint(verdict));
    }

    /// Print the pass/fail percentages after the run.
    pub fn summary(&self, report: &RunReport) {
        if !self.verbose {
            return;
        }
        println!(
            "{} of {} tests passed ({:.2}%)",
            report.passed(),
            report.total(),
            report.pass_percentage()
        );
        println!(
            "{} of {} tests failed ({:.2}%)",
            report.failed(),
            report.total(),
            report.fail_percentage()
        );
    }

    fn paint(&self, verdict: &Verdict) -> String {
        let label = verdict.outcome.to_string();
        if self.colorize {
            let color = if verdict.is_pass() { GREEN } else { RED };
            format!("{color}{label}{RESET}")
        } else {
            label
        }
    }
}

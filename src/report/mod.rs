//! Run report aggregation
//!
//! Accumulates per-test verdicts in declaration order and renders the final
//! textual report.

mod session;

pub use session::ReportSession;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

use crate::models::Verdict;

const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// One reported verdict line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerdictRecord {
    pub test_id: String,
    pub verdict: Verdict,
}

/// Aggregated result of a full run.
///
/// Exactly one verdict is expected per declared test; a count mismatch is
/// surfaced in the summary rather than treated as a crash.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    test_ids: Vec<String>,
    records: Vec<VerdictRecord>,
    passed: usize,
    failed: usize,
    started_at: DateTime<Local>,
    finished_at: Option<DateTime<Local>>,
    duration_secs: f64,
}

impl RunReport {
    /// Start a report for the declared test list.
    pub fn new(test_ids: Vec<String>) -> Self {
        Self {
            test_ids,
            records: Vec::new(),
            passed: 0,
            failed: 0,
            started_at: Local::now(),
            finished_at: None,
            duration_secs: 0.0,
        }
    }

    /// Record the verdict for one test, in declaration order.
    pub fn record(&mut self, test_id: impl Into<String>, verdict: Verdict) {
        if verdict.is_pass() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.records.push(VerdictRecord {
            test_id: test_id.into(),
            verdict,
        });
    }

    /// Close the report with the measured wall-clock duration.
    pub fn finalize(&mut self, duration: Duration) {
        self.finished_at = Some(Local::now());
        self.duration_secs = duration.as_secs_f64();
    }

    /// Number of declared tests.
    pub fn total(&self) -> usize {
        self.test_ids.len()
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn records(&self) -> &[VerdictRecord] {
        &self.records
    }

    pub fn pass_percentage(&self) -> f64 {
        percentage(self.passed, self.total())
    }

    pub fn fail_percentage(&self) -> f64 {
        percentage(self.failed, self.total())
    }

    /// True when the verdict count does not match the declared test count.
    pub fn has_anomaly(&self) -> bool {
        self.records.len() != self.test_ids.len()
    }

    /// Render the full report document.
    pub fn render(&self) -> String {
        let mut out = String::new();

        writeln!(out).ok();
        writeln!(
            out,
            "---- Tests start: {} ----",
            self.started_at.format(TIMESTAMP_FORMAT)
        )
        .ok();
        writeln!(out, "Tests (num = {}):", self.total()).ok();
        for id in &self.test_ids {
            writeln!(out, "     {id}").ok();
        }
        writeln!(out).ok();

        for record in &self.records {
            writeln!(
                out,
                "{} : {} : {}",
                record.test_id, record.verdict.outcome, record.verdict.reason
            )
            .ok();
        }

        writeln!(out).ok();
        writeln!(out).ok();

        if self.has_anomaly() {
            writeln!(
                out,
                "Note: declared tests (= {}) did not equal recorded verdicts (= {})",
                self.total(),
                self.records.len()
            )
            .ok();
        }

        writeln!(
            out,
            "{} of {} tests passed ({:.2}%)",
            self.passed,
            self.total(),
            self.pass_percentage()
        )
        .ok();
        writeln!(
            out,
            "{} of {} tests failed ({:.2}%)",
            self.failed,
            self.total(),
            self.fail_percentage()
        )
        .ok();
        writeln!(out).ok();

        if let Some(finished) = self.finished_at {
            writeln!(
                out,
                "---- Tests end: {} ----",
                finished.format(TIMESTAMP_FORMAT)
            )
            .ok();
        }
        writeln!(
            out,
            "---- Total time required to run tests: {:.2} seconds",
            self.duration_secs
        )
        .ok();

        out
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("test_{i}.x")).collect()
    }

    #[test]
    fn test_counts_and_percentages() {
        let mut report = RunReport::new(ids(4));
        report.record("test_0.x", Verdict::pass("ok"));
        report.record("test_1.x", Verdict::pass("ok"));
        report.record("test_2.x", Verdict::fail("bad"));
        report.record("test_3.x", Verdict::fail("bad"));

        assert_eq!(report.total(), 4);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 2);
        assert!((report.pass_percentage() - 50.0).abs() < f64::EPSILON);
        assert!(!report.has_anomaly());
    }

    #[test]
    fn test_counts_sum_over_full_suite() {
        // All declared tests processed sequentially: counts must sum to the
        // declared total and percentages follow from the counts.
        let n = 40;
        let mut report = RunReport::new(ids(n));
        for (i, id) in ids(n).into_iter().enumerate() {
            if i % 4 == 0 {
                report.record(id, Verdict::fail("bad"));
            } else {
                report.record(id, Verdict::pass("ok"));
            }
        }

        assert_eq!(report.passed() + report.failed(), n);
        assert!((report.pass_percentage() - 75.0).abs() < 1e-9);
        assert!((report.fail_percentage() - 25.0).abs() < 1e-9);
        assert!(!report.has_anomaly());
    }

    #[test]
    fn test_anomaly_is_flagged_not_fatal() {
        let mut report = RunReport::new(ids(3));
        report.record("test_0.x", Verdict::pass("ok"));
        report.finalize(Duration::from_secs(1));

        assert!(report.has_anomaly());
        let rendered = report.render();
        assert!(rendered.contains("did not equal recorded verdicts"));
        // The summary still prints.
        assert!(rendered.contains("1 of 3 tests passed (33.33%)"));
    }

    #[test]
    fn test_render_layout() {
        let mut report = RunReport::new(vec![
            "test_a.x".to_string(),
            "test_b.x".to_string(),
        ]);
        report.record("test_a.x", Verdict::pass("Match found on line 1"));
        report.record("test_b.x", Verdict::fail("Expected text not found on any line. (END)"));
        report.finalize(Duration::from_millis(2500));

        let rendered = report.render();
        assert!(rendered.contains("---- Tests start: "));
        assert!(rendered.contains("Tests (num = 2):"));
        assert!(rendered.contains("     test_a.x"));
        assert!(rendered.contains("test_a.x : PASSED : Match found on line 1"));
        assert!(rendered
            .contains("test_b.x : FAILED : Expected text not found on any line. (END)"));
        assert!(rendered.contains("1 of 2 tests passed (50.00%)"));
        assert!(rendered.contains("1 of 2 tests failed (50.00%)"));
        assert!(rendered.contains("---- Tests end: "));
        assert!(rendered.contains("---- Total time required to run tests: 2.50 seconds"));
    }

    #[test]
    fn test_verdict_order_follows_declaration_order() {
        let mut report = RunReport::new(ids(3));
        for id in ids(3) {
            report.record(id, Verdict::pass("ok"));
        }
        let order: Vec<_> = report.records().iter().map(|r| r.test_id.clone()).collect();
        assert_eq!(order, ids(3));
    }

    #[test]
    fn test_empty_report_has_zero_percentages() {
        let report = RunReport::new(Vec::new());
        assert_eq!(report.pass_percentage(), 0.0);
        assert_eq!(report.fail_percentage(), 0.0);
    }
}

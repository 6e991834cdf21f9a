//! Verdict models
//!
//! Pass/fail classification of a single test execution.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one classified test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
}

impl Outcome {
    pub fn symbol(&self) -> &'static str {
        match self {
            Outcome::Passed => "✓",
            Outcome::Failed => "✗",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "PASSED"),
            Outcome::Failed => write!(f, "FAILED"),
        }
    }
}

/// Classification of one test execution with a human-readable reason.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: Outcome,
    pub reason: String,
}

impl Verdict {
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Passed,
            reason: reason.into(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failed,
            reason: reason.into(),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.outcome.is_pass()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.outcome, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Passed.to_string(), "PASSED");
        assert_eq!(Outcome::Failed.to_string(), "FAILED");
        assert!(Outcome::Passed.is_pass());
        assert!(!Outcome::Failed.is_pass());
    }

    #[test]
    fn test_verdict_constructors() {
        let pass = Verdict::pass("Match found on line 2");
        assert!(pass.is_pass());
        assert_eq!(pass.to_string(), "PASSED : Match found on line 2");

        let fail = Verdict::fail("no match");
        assert!(!fail.is_pass());
        assert_eq!(fail.outcome, Outcome::Failed);
    }
}

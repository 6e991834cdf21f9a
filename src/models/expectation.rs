//! Expectation table models
//!
//! Defines test cases, expected outcomes, and line locators.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Placeholder marker for tests that should elicit an error whose exact text
/// is not yet known. Entries carrying it keep failing until the real message
/// is filled in.
pub const UNKNOWN_ERROR_MARKER: &str = "UNKNOWN ERROR MESSAGE EXPECTED";

/// Sentinel marker for tests whose correct outcome is exceeding the deadline.
pub const TIMEOUT_MARKER: &str = "__TIMEOUT_EXPECTED__";

/// Wildcard locator spelling accepted in suite files.
pub const ANY_LINE: &str = "*";

/// Errors raised while building the expectation table. All of these indicate
/// a corrupt table, not a runtime condition, and abort the run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpectationError {
    #[error("line locator for {test} is neither an integer nor '*': {value}")]
    MalformedLocator { test: String, value: String },

    #[error("line locator for {test} must be a positive line number")]
    ZeroLocator { test: String },
}

/// Which line of a capture must contain the expected marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineLocator {
    /// Any line may match (`"*"` in suite files).
    Any,
    /// Only this 1-based line is inspected.
    Line(u32),
}

impl LineLocator {
    /// Parse the suite-file spelling: `"*"` or a positive integer.
    pub fn parse(test: &str, raw: &str) -> Result<Self, ExpectationError> {
        let raw = raw.trim();
        if raw == ANY_LINE {
            return Ok(LineLocator::Any);
        }
        match raw.parse::<u32>() {
            Ok(0) => Err(ExpectationError::ZeroLocator {
                test: test.to_string(),
            }),
            Ok(n) => Ok(LineLocator::Line(n)),
            Err(_) => Err(ExpectationError::MalformedLocator {
                test: test.to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for LineLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineLocator::Any => write!(f, "{ANY_LINE}"),
            LineLocator::Line(n) => write!(f, "{n}"),
        }
    }
}

/// Expected outcome for a single test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The capture must contain this substring at the located line.
    Marker { text: String, line: LineLocator },

    /// An error is expected but its text is unknown; matched against the
    /// placeholder text, so the test fails until the table is completed.
    AnyError { line: LineLocator },

    /// Hitting the deadline is the correct outcome.
    TimeoutExpected,
}

impl Expectation {
    /// Build an expectation from the raw suite-file pair, mapping the legacy
    /// sentinel spellings onto their variants.
    pub fn from_raw(test: &str, marker: &str, line: &str) -> Result<Self, ExpectationError> {
        if marker == TIMEOUT_MARKER {
            return Ok(Expectation::TimeoutExpected);
        }
        let line = LineLocator::parse(test, line)?;
        if marker == UNKNOWN_ERROR_MARKER {
            Ok(Expectation::AnyError { line })
        } else {
            Ok(Expectation::Marker {
                text: marker.to_string(),
                line,
            })
        }
    }

    /// The substring the classifier searches for, if any. `AnyError` keeps
    /// the placeholder as its marker; `TimeoutExpected` has none.
    pub fn marker_text(&self) -> Option<&str> {
        match self {
            Expectation::Marker { text, .. } => Some(text),
            Expectation::AnyError { .. } => Some(UNKNOWN_ERROR_MARKER),
            Expectation::TimeoutExpected => None,
        }
    }

    /// The line locator, if the expectation inspects lines at all.
    pub fn locator(&self) -> Option<LineLocator> {
        match self {
            Expectation::Marker { line, .. } | Expectation::AnyError { line } => Some(*line),
            Expectation::TimeoutExpected => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Expectation::TimeoutExpected)
    }

    /// The suite-file spelling of the marker column.
    pub fn raw_marker(&self) -> &str {
        match self {
            Expectation::Marker { text, .. } => text,
            Expectation::AnyError { .. } => UNKNOWN_ERROR_MARKER,
            Expectation::TimeoutExpected => TIMEOUT_MARKER,
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Marker { text, line } => write!(f, "\"{text}\" on line {line}"),
            Expectation::AnyError { line } => write!(f, "any error on line {line}"),
            Expectation::TimeoutExpected => write!(f, "timeout"),
        }
    }
}

/// One entry of the expectation table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Test executable name, unique within the table.
    pub id: String,

    /// Expected outcome.
    pub expectation: Expectation,
}

impl TestCase {
    pub fn new(id: impl Into<String>, expectation: Expectation) -> Self {
        Self {
            id: id.into(),
            expectation,
        }
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (expects {})", self.id, self.expectation)
    }
}

//! Expectation table
//!
//! The built-in partitioned-communication suite plus optional loading of an
//! external suite file.
//!
//! Suite files are a sequence of entries so that report order follows
//! declaration order:
//!
//! ```yaml
//! - id: test_datatype0.x
//!   marker: "END"
//!   line: "1"
//! - id: test_init0.x
//!   marker: "__TIMEOUT_EXPECTED__"
//! ```
//!
//! The marker column accepts the legacy sentinel spellings
//! `UNKNOWN ERROR MESSAGE EXPECTED` and `__TIMEOUT_EXPECTED__`; the line
//! column accepts `"*"` or a positive integer and defaults to `"*"`.

#![allow(dead_code)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::models::{Expectation, LineLocator, TestCase, ANY_LINE};

/// Raw suite-file entry before sentinel mapping and locator parsing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawSuiteEntry {
    pub id: String,

    pub marker: String,

    #[serde(default = "default_line")]
    pub line: String,
}

fn default_line() -> String {
    ANY_LINE.to_string()
}

fn marker(id: &str, text: &str, line: LineLocator) -> TestCase {
    TestCase::new(
        id,
        Expectation::Marker {
            text: text.to_string(),
            line,
        },
    )
}

fn any_error(id: &str) -> TestCase {
    TestCase::new(
        id,
        Expectation::AnyError {
            line: LineLocator::Any,
        },
    )
}

fn timeout(id: &str) -> TestCase {
    TestCase::new(id, Expectation::TimeoutExpected)
}

/// The built-in expectation table for the partitioned-communication tests.
///
/// `any_error` entries are tests that should elicit an MPI error message
/// whose text has not been recorded yet.
pub fn builtin() -> Vec<TestCase> {
    use LineLocator::{Any, Line};

    vec![
        any_error("test_cancel0.x"),
        marker("test_datatype0.x", "END", Line(1)),
        marker("test_datatype1.x", "END", Line(1)),
        marker("test_datatype2.x", "END", Line(1)),
        marker("test_datatype3.x", "END", Line(1)),
        marker("test_datatype4.x", "END", Line(1)),
        marker("test_datatype5.x", "END", Line(1)),
        marker("test_example1a.x", "END", Line(1)),
        marker("test_example1b.x", "END", Line(1)),
        marker("test_example2.x", "END", Line(1)),
        marker("test_example3a.x", "END", Line(1)),
        marker("test_example3b.x", "END", Line(1)),
        marker("test_example3c.x", "END", Line(1)),
        any_error("test_free0.x"),
        timeout("test_init0.x"),
        timeout("test_init1.x"),
        timeout("test_init2.x"),
        marker("test_local0.x", "END", Line(1)),
        marker("test_local1.x", "END", Line(1)),
        marker("test_numparts0.x", "END", Line(1)),
        marker("test_numparts1.x", "END", Line(1)),
        marker("test_order0.x", "END", Line(1)),
        marker("test_parrived0.x", "END", Any),
        marker("test_parrived1.x", "END", Any),
        marker("test_parrived2.x", "*** An error occurred in MPI_Parrived", Any),
        any_error("test_partitions0.x"),
        any_error("test_partitions1.x"),
        any_error("test_partitions2.x"),
        any_error("test_partitions3.x"),
        any_error("test_pready0.x"),
        any_error("test_pready1.x"),
        any_error("test_pready2.x"),
        any_error("test_pready3.x"),
        marker("test_pready4.x", "MPI_ERR_REQUEST: invalid request", Any),
        marker("test_pready_list0.x", "END", Line(1)),
        any_error("test_pready_list1.x"),
        marker("test_pready_range0.x", "END", Line(1)),
        marker("test_startall0.x", "END", Any),
        any_error("test_state0.x"),
        any_error("test_wildcard0.x"),
        any_error("test_wildcard1.x"),
        marker("test_zerocount0.x", "END", Any),
        marker("test_zerocount1.x", "END", Any),
    ]
}

/// Load an expectation table from a YAML or JSON suite file.
///
/// A malformed line locator or a duplicate/empty table aborts the run; the
/// table is configuration, and a corrupt table must not produce verdicts.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<TestCase>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read suite file: {}", path.display()))?;

    let raw: Vec<RawSuiteEntry> = if is_yaml_file(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML suite file: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON suite file: {}", path.display()))?
    };

    from_raw_entries(raw).with_context(|| format!("Invalid suite file: {}", path.display()))
}

/// Build the typed table from raw entries, validating as the original table
/// was validated: unique ids, non-empty, well-formed locators.
pub fn from_raw_entries(raw: Vec<RawSuiteEntry>) -> Result<Vec<TestCase>> {
    if raw.is_empty() {
        anyhow::bail!("suite contains no tests");
    }

    let mut seen = HashSet::new();
    let mut cases = Vec::with_capacity(raw.len());

    for entry in raw {
        if entry.id.trim().is_empty() {
            anyhow::bail!("suite entry with empty test id");
        }
        if !seen.insert(entry.id.clone()) {
            anyhow::bail!("duplicate test id in suite: {}", entry.id);
        }
        let expectation = Expectation::from_raw(&entry.id, &entry.marker, &entry.line)?;
        cases.push(TestCase::new(entry.id, expectation));
    }

    Ok(cases)
}

/// Render the table back to raw entries (used by `list` and for writing an
/// editable suite file).
pub fn to_raw_entries(cases: &[TestCase]) -> Vec<RawSuiteEntry> {
    cases
        .iter()
        .map(|case| RawSuiteEntry {
            id: case.id.clone(),
            marker: case.expectation.raw_marker().to_string(),
            line: case
                .expectation
                .locator()
                .map(|l| l.to_string())
                .unwrap_or_else(default_line),
        })
        .collect()
}

fn is_yaml_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

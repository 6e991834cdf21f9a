//! Output classification
//!
//! Pure decision logic turning a captured test output into a verdict.

use crate::models::{ExecutionCapture, Expectation, LineLocator, TestCase, Verdict};

/// Report text for a timeout that was expected and occurred.
pub const TIMEOUT_EXPECTED_AND_FOUND: &str = "Timeout expected and did occur";

/// Report text for an expected timeout that never happened.
pub const TIMEOUT_EXPECTED_AND_NOT_FOUND: &str =
    "A timeout was expected but the test terminated for some other reason";

/// Report text for a timeout that was not expected.
pub const TIMEOUT_UNEXPECTED: &str = "No timeout was expected but test terminated due to timeout";

/// Report text for a capture that could not be decoded as text.
pub const OUTPUT_UNREADABLE: &str =
    "Output is not readable as text. Check the captured stderr file";

/// Classify one test execution.
///
/// Precedence: readability first, then the timeout matrix, then marker
/// matching. Every (expectation, capture) combination lands in exactly one
/// branch.
pub fn classify(case: &TestCase, capture: &ExecutionCapture) -> Verdict {
    // A segfaulting rank can leave bytes in the capture that are not text;
    // nothing below can be trusted in that case.
    if !capture.readable {
        return Verdict::fail(OUTPUT_UNREADABLE);
    }

    if capture.timed_out {
        return if case.expectation.is_timeout() {
            Verdict::pass(TIMEOUT_EXPECTED_AND_FOUND)
        } else {
            Verdict::fail(TIMEOUT_UNEXPECTED)
        };
    }

    match &case.expectation {
        Expectation::TimeoutExpected => Verdict::fail(TIMEOUT_EXPECTED_AND_NOT_FOUND),
        Expectation::Marker { text, line } => match_marker(text, *line, capture),
        Expectation::AnyError { line } => {
            match_marker(crate::models::UNKNOWN_ERROR_MARKER, *line, capture)
        }
    }
}

fn match_marker(marker: &str, locator: LineLocator, capture: &ExecutionCapture) -> Verdict {
    match locator {
        LineLocator::Any => {
            for (index, line) in capture.lines.iter().enumerate() {
                if line.contains(marker) {
                    return Verdict::pass(format!("Match found on line {}", index + 1));
                }
            }
            Verdict::fail(format!("Expected text not found on any line. ({marker})"))
        }
        LineLocator::Line(number) => match capture.line(number) {
            Some(line) if line.contains(marker) => {
                Verdict::pass(format!("Match found on line {number}"))
            }
            Some(line) => Verdict::fail(format!(
                "On line {number}: Expected: {marker} Found: {line}"
            )),
            None => Verdict::fail(format!(
                "Expected to test on line {number}, but the stderr capture has only {} lines",
                capture.line_count()
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;

    fn marker_case(text: &str, line: LineLocator) -> TestCase {
        TestCase::new(
            "test_sample.x",
            Expectation::Marker {
                text: text.to_string(),
                line,
            },
        )
    }

    fn capture(lines: &[&str], timed_out: bool) -> ExecutionCapture {
        ExecutionCapture::from_lines(lines.iter().map(|l| l.to_string()).collect(), timed_out)
    }

    #[test]
    fn test_specific_line_does_not_match_elsewhere() {
        // Marker present on line 2 must not pass a locator pinned to line 1.
        let case = marker_case("END", LineLocator::Line(1));
        let verdict = classify(&case, &capture(&["START", "END", "done"], false));
        assert_eq!(verdict.outcome, Outcome::Failed);
        assert!(verdict.reason.contains("Expected: END"));
        assert!(verdict.reason.contains("Found: START"));
    }

    #[test]
    fn test_wildcard_matches_any_line() {
        let case = marker_case("END", LineLocator::Any);
        let verdict = classify(&case, &capture(&["START", "END", "done"], false));
        assert!(verdict.is_pass());
        assert_eq!(verdict.reason, "Match found on line 2");
    }

    #[test]
    fn test_wildcard_reports_first_match() {
        let case = marker_case("END", LineLocator::Any);
        let verdict = classify(&case, &capture(&["x", "END", "END"], false));
        assert_eq!(verdict.reason, "Match found on line 2");
    }

    #[test]
    fn test_expected_timeout_occurred() {
        let case = TestCase::new("test_init0.x", Expectation::TimeoutExpected);
        let verdict = classify(&case, &capture(&[], true));
        assert!(verdict.is_pass());
        assert_eq!(verdict.reason, TIMEOUT_EXPECTED_AND_FOUND);
    }

    #[test]
    fn test_expected_timeout_missing() {
        let case = TestCase::new("test_init0.x", Expectation::TimeoutExpected);
        let verdict = classify(&case, &capture(&["unrelated text"], false));
        assert_eq!(verdict.outcome, Outcome::Failed);
        assert_eq!(verdict.reason, TIMEOUT_EXPECTED_AND_NOT_FOUND);
    }

    #[test]
    fn test_unexpected_timeout() {
        let case = marker_case("END", LineLocator::Line(1));
        let verdict = classify(&case, &capture(&["END"], true));
        assert_eq!(verdict.outcome, Outcome::Failed);
        assert_eq!(verdict.reason, TIMEOUT_UNEXPECTED);
    }

    #[test]
    fn test_unreadable_takes_precedence() {
        // Readability outranks everything, including an expected timeout.
        let case = TestCase::new("test_init0.x", Expectation::TimeoutExpected);
        let mut unreadable = ExecutionCapture::from_bytes(&[0xff, 0x00], true);
        assert!(!unreadable.readable);
        let verdict = classify(&case, &unreadable);
        assert_eq!(verdict.outcome, Outcome::Failed);
        assert_eq!(verdict.reason, OUTPUT_UNREADABLE);

        unreadable.timed_out = false;
        let verdict = classify(&case, &unreadable);
        assert_eq!(verdict.reason, OUTPUT_UNREADABLE);
    }

    #[test]
    fn test_wildcard_no_match() {
        let case = marker_case("END", LineLocator::Any);
        let verdict = classify(&case, &capture(&["a", "b"], false));
        assert_eq!(verdict.outcome, Outcome::Failed);
        assert_eq!(
            verdict.reason,
            "Expected text not found on any line. (END)"
        );
    }

    #[test]
    fn test_capture_too_short_for_locator() {
        let case = marker_case("END", LineLocator::Line(3));
        let verdict = classify(&case, &capture(&["only one"], false));
        assert_eq!(verdict.outcome, Outcome::Failed);
        assert_eq!(
            verdict.reason,
            "Expected to test on line 3, but the stderr capture has only 1 lines"
        );
    }

    #[test]
    fn test_empty_capture_with_wildcard() {
        let case = marker_case("END", LineLocator::Any);
        let verdict = classify(&case, &capture(&[], false));
        assert_eq!(verdict.outcome, Outcome::Failed);
    }

    #[test]
    fn test_any_error_placeholder_does_not_match_output() {
        let case = TestCase::new(
            "test_cancel0.x",
            Expectation::AnyError {
                line: LineLocator::Any,
            },
        );
        let verdict = classify(&case, &capture(&["some MPI error text"], false));
        assert_eq!(verdict.outcome, Outcome::Failed);
        assert!(verdict.reason.contains("UNKNOWN ERROR MESSAGE EXPECTED"));
    }

    #[test]
    fn test_substring_match_inside_line() {
        let case = marker_case("MPI_ERR_REQUEST: invalid request", LineLocator::Any);
        let verdict = classify(
            &case,
            &capture(
                &["rank 1: MPI_ERR_REQUEST: invalid request (code 19)"],
                false,
            ),
        );
        assert!(verdict.is_pass());
    }

    #[test]
    fn test_classifier_is_deterministic() {
        let case = marker_case("END", LineLocator::Any);
        let input = capture(&["START", "END"], false);
        let first = classify(&case, &input);
        let second = classify(&case, &input);
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.reason, second.reason);
    }
}

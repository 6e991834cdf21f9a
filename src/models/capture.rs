//! Captured test output
//!
//! Holds the stderr lines recorded for one test execution.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// The recorded diagnostic output of one test run.
///
/// A crashing MPI rank can write bytes to stderr that are not valid text; the
/// readability probe happens once, here, so the classifier never touches raw
/// bytes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutionCapture {
    /// Captured stderr lines with trailing whitespace stripped.
    pub lines: Vec<String>,

    /// Whether the timeout supervisor killed the run.
    pub timed_out: bool,

    /// Whether the capture file decoded as text.
    pub readable: bool,
}

impl ExecutionCapture {
    /// Build a capture from the raw bytes of a capture file.
    pub fn from_bytes(bytes: &[u8], timed_out: bool) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self {
                lines: text.lines().map(|l| l.trim_end().to_string()).collect(),
                timed_out,
                readable: true,
            },
            Err(_) => Self {
                lines: Vec::new(),
                timed_out,
                readable: false,
            },
        }
    }

    /// Build a capture from already-decoded lines.
    pub fn from_lines(lines: Vec<String>, timed_out: bool) -> Self {
        Self {
            lines,
            timed_out,
            readable: true,
        }
    }

    /// Fetch a line by its 1-based number.
    pub fn line(&self, number: u32) -> Option<&str> {
        let index = (number as usize).checked_sub(1)?;
        self.lines.get(index).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_text() {
        let capture = ExecutionCapture::from_bytes(b"START  \nEND\n", false);
        assert!(capture.readable);
        assert!(!capture.timed_out);
        assert_eq!(capture.lines, vec!["START", "END"]);
    }

    #[test]
    fn test_from_bytes_binary_garbage() {
        let capture = ExecutionCapture::from_bytes(&[0xff, 0xfe, 0x00, 0x9f], false);
        assert!(!capture.readable);
        assert!(capture.lines.is_empty());
    }

    #[test]
    fn test_from_bytes_empty() {
        let capture = ExecutionCapture::from_bytes(b"", true);
        assert!(capture.readable);
        assert!(capture.timed_out);
        assert_eq!(capture.line_count(), 0);
    }

    #[test]
    fn test_line_is_one_based() {
        let capture = ExecutionCapture::from_bytes(b"first\nsecond\n", false);
        assert_eq!(capture.line(1), Some("first"));
        assert_eq!(capture.line(2), Some("second"));
        assert_eq!(capture.line(3), None);
    }
}

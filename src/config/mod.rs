//! Harness configuration
//!
//! Runtime settings for the launcher, timeouts, and session layout.

mod file;

pub use file::ConfigFile;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration for a harness run.
///
/// Defaults reproduce the environment-tuned constants of the original suite
/// (25 s deadline, 7 s settling delay, 5 pid-lookup retries); every one of
/// them is overridable through the config file or CLI.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Parallel-process launcher executable.
    pub launcher: String,

    /// Number of ranks requested per test.
    pub ranks: u32,

    /// Ranks per node.
    pub npernode: u32,

    /// Directory holding the test executables.
    pub bin_dir: PathBuf,

    /// Per-test execution deadline in seconds.
    pub timeout_secs: u64,

    /// Settling delay after each test, letting leftover launcher processes
    /// terminate before the next test starts.
    pub settle_secs: u64,

    /// Supervisor abort-flag poll interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Bounded retries for the pid lookup by process name.
    pub lookup_retries: u32,

    /// Pause between pid lookups in milliseconds.
    pub lookup_interval_ms: u64,

    /// Directory under which session directories are created.
    pub session_root: PathBuf,

    /// Session directory name prefix; the run timestamp is appended.
    pub session_prefix: String,

    /// Report file name inside the session directory.
    pub report_name: String,

    /// Suffix appended to the test id to name its capture file.
    pub capture_suffix: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            launcher: "mpirun".to_string(),
            ranks: 2,
            npernode: 1,
            bin_dir: PathBuf::from("./bin"),
            timeout_secs: 25,
            settle_secs: 7,
            poll_interval_ms: 250,
            lookup_retries: 5,
            lookup_interval_ms: 200,
            session_root: PathBuf::from("."),
            session_prefix: "results_".to_string(),
            report_name: "report.txt".to_string(),
            capture_suffix: ".stderr".to_string(),
        }
    }
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_launcher(mut self, launcher: impl Into<String>) -> Self {
        self.launcher = launcher.into();
        self
    }

    pub fn with_bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_settle(mut self, secs: u64) -> Self {
        self.settle_secs = secs;
        self
    }

    pub fn with_session_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_root = dir.into();
        self
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.launcher.trim().is_empty() {
            anyhow::bail!("launcher must not be empty");
        }
        if self.ranks == 0 {
            anyhow::bail!("ranks must be positive");
        }
        if self.npernode == 0 {
            anyhow::bail!("npernode must be positive");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be positive");
        }
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_constants() {
        let config = HarnessConfig::default();
        assert_eq!(config.launcher, "mpirun");
        assert_eq!(config.ranks, 2);
        assert_eq!(config.npernode, 1);
        assert_eq!(config.timeout_secs, 25);
        assert_eq!(config.settle_secs, 7);
        assert_eq!(config.lookup_retries, 5);
        assert_eq!(config.session_prefix, "results_");
        assert_eq!(config.report_name, "report.txt");
        assert_eq!(config.capture_suffix, ".stderr");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = HarnessConfig::new()
            .with_launcher("prun")
            .with_bin_dir("/opt/tests")
            .with_timeout(60)
            .with_settle(0);
        assert_eq!(config.launcher, "prun");
        assert_eq!(config.bin_dir, PathBuf::from("/opt/tests"));
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.settle_secs, 0);
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let mut config = HarnessConfig::default();
        config.ranks = 0;
        assert!(config.validate().is_err());

        let mut config = HarnessConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = HarnessConfig::default();
        config.launcher = " ".to_string();
        assert!(config.validate().is_err());
    }
}

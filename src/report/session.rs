//! Report session directory
//!
//! Owns the timestamped output directory of one run: per-test capture files
//! and the final report.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::RunReport;
use crate::config::HarnessConfig;

/// Filesystem layout of one harness run.
pub struct ReportSession {
    dir: PathBuf,
    report_path: PathBuf,
    capture_suffix: String,
}

impl ReportSession {
    /// Create the session directory and the (empty) report file.
    ///
    /// Both are created up front so a filesystem problem aborts the run
    /// before any test executes. Failure here is setup-fatal.
    pub fn create(config: &HarnessConfig) -> Result<Self> {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let dir = config
            .session_root
            .join(format!("{}{stamp}", config.session_prefix));

        fs::create_dir_all(&dir)
            .with_context(|| format!("Could not create output directory: {}", dir.display()))?;

        let report_path = dir.join(&config.report_name);
        fs::File::create(&report_path).with_context(|| {
            format!("Could not create report file: {}", report_path.display())
        })?;

        info!("session directory: {}", dir.display());

        Ok(Self {
            dir,
            report_path,
            capture_suffix: config.capture_suffix.clone(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Capture file path for one test.
    pub fn capture_path(&self, test_id: &str) -> PathBuf {
        self.dir.join(format!("{test_id}{}", self.capture_suffix))
    }

    /// Render and write the finalized report.
    pub fn write_report(&self, report: &RunReport) -> Result<()> {
        fs::write(&self.report_path, report.render()).with_context(|| {
            format!("Could not write report file: {}", self.report_path.display())
        })
    }
}

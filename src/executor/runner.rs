//! Test execution runner
//!
//! Runs one expectation-table entry end to end: capture file, timeout
//! supervision, launcher invocation, classification.

use anyhow::{Context, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::sleep;
use tracing::{debug, error};

use super::supervisor::{SupervisorSettings, TimeoutSupervisor};
use crate::classifier;
use crate::config::HarnessConfig;
use crate::models::{ExecutionCapture, TestCase, Verdict};
use crate::report::ReportSession;

/// Sequential runner for expectation-table entries.
pub struct TestRunner {
    config: HarnessConfig,
}

impl TestRunner {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    fn supervisor_settings(&self) -> SupervisorSettings {
        SupervisorSettings {
            deadline: Duration::from_secs(self.config.timeout_secs),
            poll_interval: Duration::from_millis(self.config.poll_interval_ms),
            lookup_retries: self.config.lookup_retries,
            lookup_interval: Duration::from_millis(self.config.lookup_interval_ms),
        }
    }

    /// Run a single test and classify its captured output.
    ///
    /// The launcher's exit status is deliberately not classified; the
    /// captured stderr stream is the only channel inspected. An error here
    /// means the capture file could not be created or read back, which is
    /// fatal to the whole run.
    pub async fn run_test(&self, case: &TestCase, session: &ReportSession) -> Result<Verdict> {
        let capture_path = session.capture_path(&case.id);
        let capture_file = std::fs::File::create(&capture_path).with_context(|| {
            format!(
                "Could not create capture file: {}",
                capture_path.display()
            )
        })?;

        // The supervisor must be watching before the launcher starts, so a
        // test that never produces output still hits the deadline.
        let supervisor = TimeoutSupervisor::spawn(&case.id, self.supervisor_settings());

        let exe = self.config.bin_dir.join(&case.id);
        let launch = Command::new(&self.config.launcher)
            .arg("-np")
            .arg(self.config.ranks.to_string())
            .arg("--npernode")
            .arg(self.config.npernode.to_string())
            .arg(&exe)
            .stdout(Stdio::null())
            .stderr(Stdio::from(capture_file))
            .status()
            .await;

        match launch {
            Ok(status) => debug!("{}: launcher exited with {status}", case.id),
            Err(e) => error!("{}: failed to launch {}: {e}", case.id, exe.display()),
        }

        // Natural completion stands the supervisor down; after a kill the
        // task has already finished on its own.
        if !supervisor.timed_out() {
            supervisor.abort();
        }
        let timed_out = supervisor.join().await;

        let bytes = std::fs::read(&capture_path).with_context(|| {
            format!("Could not read capture file: {}", capture_path.display())
        })?;
        let capture = ExecutionCapture::from_bytes(&bytes, timed_out);

        Ok(classifier::classify(case, &capture))
    }

    /// Settling delay after a test, letting leftover launcher processes
    /// terminate before the next one starts.
    pub async fn settle(&self) {
        if self.config.settle_secs > 0 {
            debug!("settling for {}s", self.config.settle_secs);
            sleep(Duration::from_secs(self.config.settle_secs)).await;
        }
    }
}

//! Timeout supervision
//!
//! Watches one running test by process name and force-kills it when the
//! deadline elapses before the runner signals completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Tuning for the supervisor loops.
#[derive(Clone, Copy, Debug)]
pub struct SupervisorSettings {
    /// How long the test may run before it is killed.
    pub deadline: Duration,

    /// Interval between abort-flag checks while waiting out the deadline.
    pub poll_interval: Duration,

    /// How many times to retry the pid lookup. Process start is not
    /// synchronized with supervisor start, so the first lookups can miss.
    pub lookup_retries: u32,

    /// Pause between pid lookups.
    pub lookup_interval: Duration,
}

/// Handle held by the runner for the duration of one test.
///
/// Shared state is a single-writer/single-reader handoff: the runner sets
/// `abort`, the supervisor sets `timed_out`, and the runner only reads
/// `timed_out` after joining the task.
pub struct SupervisorHandle {
    timed_out: Arc<AtomicBool>,
    abort: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SupervisorHandle {
    /// Whether the deadline has already fired.
    pub fn timed_out(&self) -> bool {
        self.timed_out.load(Ordering::SeqCst)
    }

    /// Tell the supervisor to stand down without killing anything.
    pub fn abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }

    /// Wait for the supervisor task to finish and return the final
    /// timed-out state.
    pub async fn join(self) -> bool {
        if let Err(e) = self.task.await {
            warn!("timeout supervisor task failed: {e}");
        }
        self.timed_out.load(Ordering::SeqCst)
    }
}

/// Per-test watchdog. The kill issued here is the only path that terminates
/// a runaway test; the runner never kills the process itself.
pub struct TimeoutSupervisor;

impl TimeoutSupervisor {
    /// Spawn the watchdog for a test identified by process name.
    pub fn spawn(process_name: &str, settings: SupervisorSettings) -> SupervisorHandle {
        let timed_out = Arc::new(AtomicBool::new(false));
        let abort = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(supervise(
            process_name.to_string(),
            settings,
            Arc::clone(&timed_out),
            Arc::clone(&abort),
        ));

        SupervisorHandle {
            timed_out,
            abort,
            task,
        }
    }
}

async fn supervise(
    name: String,
    settings: SupervisorSettings,
    timed_out: Arc<AtomicBool>,
    abort: Arc<AtomicBool>,
) {
    let mut pids = find_pids(&name).await;
    let mut attempts = 0;
    while pids.is_empty() && attempts < settings.lookup_retries {
        if abort.load(Ordering::SeqCst) {
            return;
        }
        sleep(settings.lookup_interval).await;
        pids = find_pids(&name).await;
        attempts += 1;
    }

    if pids.is_empty() {
        debug!("no running process matched {name} after {attempts} retries");
    } else {
        debug!("supervising {name}: pids {pids:?}");
    }

    let started = Instant::now();
    while started.elapsed() < settings.deadline {
        if abort.load(Ordering::SeqCst) {
            return;
        }
        sleep(settings.poll_interval).await;
    }

    timed_out.store(true, Ordering::SeqCst);

    if pids.is_empty() {
        warn!("deadline elapsed for {name} but no process was located; nothing to kill");
        return;
    }

    // Every located pid is killed: with one rank per node the lookup can
    // return both ranks, and leaving the second alive wedges the launcher.
    for pid in pids {
        kill_pid(pid).await;
    }
}

/// Locate the pids of a running test via the external process-listing
/// utility, matching against the full command line.
async fn find_pids(name: &str) -> Vec<u32> {
    let output = match Command::new("pgrep").args(["-f", name]).output().await {
        Ok(output) => output,
        Err(e) => {
            warn!("could not run pgrep for {name}: {e}");
            return Vec::new();
        }
    };

    String::from_utf8_lossy(&output.stdout)
        .split_whitespace()
        .filter_map(|pid| pid.parse().ok())
        .collect()
}

async fn kill_pid(pid: u32) {
    match Command::new("kill")
        .args(["-9", &pid.to_string()])
        .output()
        .await
    {
        Ok(output) if output.status.success() => debug!("killed pid {pid}"),
        Ok(output) => warn!("kill -9 {pid} exited with {}", output.status),
        Err(e) => warn!("could not run kill for pid {pid}: {e}"),
    }
}

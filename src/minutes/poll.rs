use crate::openai::{FileBatch, Run};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Bounded exponential-backoff polling
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Wait before the second probe
    pub initial_interval: Duration,
    /// Upper bound for any single wait
    pub max_interval: Duration,
    /// Growth factor between waits (values below 1.0 behave as 1.0)
    pub multiplier: f64,
    /// Total time allowed before giving up; too large to represent means
    /// no deadline
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(5),
            multiplier: 2.0,
            timeout: Duration::from_secs(600),
        }
    }
}

impl PollPolicy {
    pub fn next_interval(&self, current: Duration) -> Duration {
        let grown = current.as_secs_f64() * self.multiplier.max(1.0);
        Duration::from_secs_f64(grown.min(self.max_interval.as_secs_f64()))
    }
}

/// What a single probe observed
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus<T> {
    Pending,
    Completed(T),
    Failed(String),
}

/// How polling ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    Completed(T),
    Failed(String),
    TimedOut,
}

/// Probe until a terminal status or the policy's timeout.
///
/// The first probe runs immediately. Probe errors end polling and are
/// returned as-is.
pub async fn poll_until<T, E, F, Fut>(policy: &PollPolicy, mut probe: F) -> Result<PollOutcome<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollStatus<T>, E>>,
{
    let deadline = Instant::now().checked_add(policy.timeout);
    let mut interval = policy.initial_interval;
    let mut attempt = 0usize;

    loop {
        attempt += 1;
        match probe().await? {
            PollStatus::Completed(value) => return Ok(PollOutcome::Completed(value)),
            PollStatus::Failed(reason) => return Ok(PollOutcome::Failed(reason)),
            PollStatus::Pending => {}
        }

        let wait = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    debug!("Polling timed out after {} attempts", attempt);
                    return Ok(PollOutcome::TimedOut);
                }
                interval.min(deadline - now)
            }
            None => interval,
        };

        tokio::time::sleep(wait).await;
        interval = policy.next_interval(interval);
    }
}

/// Classify a vector store file batch
pub fn batch_status(batch: FileBatch) -> PollStatus<FileBatch> {
    match batch.status.as_str() {
        "completed" => PollStatus::Completed(batch),
        "failed" | "cancelled" => PollStatus::Failed(format!(
            "file batch {} {} ({} of {} files failed)",
            batch.id, batch.status, batch.file_counts.failed, batch.file_counts.total
        )),
        _ => PollStatus::Pending,
    }
}

/// Classify an assistant run
pub fn run_status(run: Run) -> PollStatus<Run> {
    match run.status.as_str() {
        "queued" | "in_progress" | "cancelling" => PollStatus::Pending,
        "completed" => PollStatus::Completed(run),
        other => {
            let reason = match &run.last_error {
                Some(err) => format!("run {} {}: {}", run.id, other, err.message),
                None => format!("run {} {}", run.id, other),
            };
            PollStatus::Failed(reason)
        }
    }
}

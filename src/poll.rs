//! Blocking status polls for long-running resource operations.
//!
//! Creating a dataset, starting a model or preparing a flow returns before the
//! work is done. The caller then describes the resource on a fixed interval
//! until its status leaves the in-progress set.

use crate::error::{CloudAiError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument};

/// One observation of a resource's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub status: String,
    pub message: Option<String>,
}

impl Observation {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }
}

/// Status values a poll recognizes, grouped by meaning.
#[derive(Debug, Clone, Copy)]
pub struct StatusSet {
    pub in_progress: &'static [&'static str],
    pub complete: &'static [&'static str],
    pub failed: &'static [&'static str],
}

/// Polls a describe operation at a fixed interval until a terminal status.
///
/// There is no backoff, retry limit or cancellation. A status outside the
/// known sets is fatal.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    statuses: StatusSet,
    interval: Duration,
}

impl Poller {
    pub const fn new(statuses: StatusSet, interval: Duration) -> Self {
        Self { statuses, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Calls `describe` until the status is complete, failed or unrecognized.
    ///
    /// # Errors
    ///
    /// - `CloudAiError::StatusFailed` for a status in the failed set.
    /// - `CloudAiError::UnexpectedStatus` for a status in no set.
    /// - Any error returned by `describe`, unchanged.
    #[instrument(skip(self, describe), fields(interval = ?self.interval))]
    pub async fn wait<F, Fut>(&self, resource: &str, mut describe: F) -> Result<Observation>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Observation>>,
    {
        loop {
            let observation = describe().await?;
            let status = observation.status.as_str();

            if self.statuses.in_progress.contains(&status) {
                info!(resource, status, "still in progress");
                sleep(self.interval).await;
                continue;
            }
            if self.statuses.complete.contains(&status) {
                info!(resource, status, "reached terminal status");
                return Ok(observation);
            }
            if self.statuses.failed.contains(&status) {
                return Err(CloudAiError::StatusFailed {
                    resource: resource.to_string(),
                    status: observation.status,
                    message: observation.message,
                });
            }
            return Err(CloudAiError::UnexpectedStatus {
                resource: resource.to_string(),
                status: observation.status,
            });
        }
    }
}

/// Polls `exists` at a fixed interval until it reports the resource is gone.
pub async fn wait_until_gone<F, Fut>(resource: &str, interval: Duration, mut exists: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    while exists().await? {
        info!(resource, "waiting for deletion");
        sleep(interval).await;
    }
    info!(resource, "deleted");
    Ok(())
}

/// Polls `exists` at a fixed interval until it reports the resource is present.
pub async fn wait_until_present<F, Fut>(resource: &str, interval: Duration, mut exists: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    while !exists().await? {
        info!(resource, "waiting for resource to exist");
        sleep(interval).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const CREATE: StatusSet = StatusSet {
        in_progress: &["CREATE_IN_PROGRESS"],
        complete: &["CREATE_COMPLETE"],
        failed: &["CREATE_FAILED"],
    };

    fn scripted(statuses: &[&str]) -> Mutex<VecDeque<Observation>> {
        Mutex::new(statuses.iter().map(|s| Observation::new(*s)).collect())
    }

    async fn next(script: &Mutex<VecDeque<Observation>>) -> Result<Observation> {
        Ok(script.lock().unwrap().pop_front().expect("poll ran past script"))
    }

    #[tokio::test(start_paused = true)]
    async fn waits_through_in_progress_then_completes() {
        let script = scripted(&["CREATE_IN_PROGRESS", "CREATE_IN_PROGRESS", "CREATE_COMPLETE"]);
        let poller = Poller::new(CREATE, Duration::from_secs(5));
        let started = tokio::time::Instant::now();

        let done = poller.wait("dataset", || next(&script)).await.unwrap();

        assert_eq!(done.status, "CREATE_COMPLETE");
        assert!(script.lock().unwrap().is_empty());
        assert_eq!(started.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_is_an_error() {
        let script = Mutex::new(VecDeque::from([
            Observation::new("CREATE_IN_PROGRESS"),
            Observation::new("CREATE_FAILED").with_message(Some("bad manifest".into())),
        ]));
        let poller = Poller::new(CREATE, Duration::from_secs(5));

        let err = poller.wait("dataset", || next(&script)).await.unwrap_err();

        match err {
            CloudAiError::StatusFailed { status, message, .. } => {
                assert_eq!(status, "CREATE_FAILED");
                assert_eq!(message.as_deref(), Some("bad manifest"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_status_is_fatal_without_retry() {
        let script = scripted(&["DELETE_IN_PROGRESS", "CREATE_COMPLETE"]);
        let poller = Poller::new(CREATE, Duration::from_secs(5));

        let err = poller.wait("dataset", || next(&script)).await.unwrap_err();

        assert!(matches!(err, CloudAiError::UnexpectedStatus { ref status, .. } if status == "DELETE_IN_PROGRESS"));
        assert_eq!(script.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn describe_errors_propagate() {
        let poller = Poller::new(CREATE, Duration::from_secs(5));

        let err = poller
            .wait("dataset", || async {
                Err::<Observation, _>(CloudAiError::service("TestException", "boom"))
            })
            .await
            .unwrap_err();

        assert_eq!(err.service_code(), Some("TestException"));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_until_gone_stops_when_absent() {
        let remaining = Mutex::new(2);
        let counter = &remaining;

        wait_until_gone("project", Duration::from_secs(5), || async move {
            let mut left = counter.lock().unwrap();
            *left -= 1;
            Ok::<_, CloudAiError>(*left >= 0)
        })
        .await
        .unwrap();

        assert_eq!(*remaining.lock().unwrap(), -1);
    }
}

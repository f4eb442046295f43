//! Scan submission and polling.
//!
//! [`ScanController`] drives one scan at a time through the lifecycle
//! `Idle -> Submitting -> Polling -> {Rendered, TimedOut, Failed}`. The
//! server owns the job state; the controller only submits, observes by
//! polling at a fixed interval, and reports what it saw.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{ApiError, ScanService};
use crate::demo;
use crate::model::{JobStatus, ScanRecord, ScanRequest, ScanType};
use crate::notify::{Notifier, NoticeLevel};

/// How often a running job is polled.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Wall-clock ceiling for a single polling session.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(120);

/// Settle time between starting a demo job and the first status check.
const DEMO_POLL_DELAY: Duration = Duration::from_millis(800);

/// Where the controller currently is in the scan lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Submitting,
    Polling,
    Rendered,
    TimedOut,
    Failed,
}

/// Terminal result of a submit or demo flow.
#[derive(Debug)]
pub enum ScanOutcome {
    /// The job completed; the record carries the full results.
    Completed(ScanRecord),
    /// The job failed server-side; the record carries whatever partial
    /// results exist.
    Failed(ScanRecord),
    /// No terminal status arrived within the polling ceiling.
    TimedOut,
    /// The poll loop was abandoned via [`ScanController::reset`].
    Cancelled,
    /// Canned demo results produced without server involvement.
    Offline(ScanRecord),
}

impl ScanOutcome {
    /// The record to render, if this outcome has one.
    pub fn record(&self) -> Option<&ScanRecord> {
        match self {
            ScanOutcome::Completed(record)
            | ScanOutcome::Failed(record)
            | ScanOutcome::Offline(record) => Some(record),
            ScanOutcome::TimedOut | ScanOutcome::Cancelled => None,
        }
    }
}

pub struct ScanController {
    service: Arc<dyn ScanService>,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
    poll_timeout: Duration,
    phase: ScanPhase,
    current_job: Option<String>,
    cancel: CancellationToken,
}

impl ScanController {
    pub fn new(service: Arc<dyn ScanService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            notifier,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            phase: ScanPhase::Idle,
            current_job: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_poll_settings(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// The job id of the most recent submission, once one was created.
    pub fn current_job(&self) -> Option<&str> {
        self.current_job.as_deref()
    }

    /// Token that aborts the in-flight poll loop when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Submits a scan and polls it to a terminal outcome.
    ///
    /// An empty URL is rejected before any request is issued. Create/start
    /// failures are terminal for the attempt (no retry): the server's
    /// message is surfaced and the controller returns to `Idle`.
    pub async fn submit(&mut self, request: &ScanRequest) -> Result<ScanOutcome> {
        if request.url.trim().is_empty() {
            self.notifier
                .notice(NoticeLevel::Error, "Please enter a URL to scan");
            bail!("scan URL must not be empty");
        }

        self.phase = ScanPhase::Submitting;
        self.notifier.status(Some("Creating scan job..."));
        let job_id = match self.service.create_scan(request).await {
            Ok(job_id) => job_id,
            Err(e) => return Err(self.submit_failed(e)),
        };
        self.current_job = Some(job_id.clone());

        self.notifier.status(Some("Starting scan..."));
        if let Err(e) = self.service.run_scan(&job_id).await {
            return Err(self.submit_failed(e));
        }

        self.notifier.status(Some("Scan in progress..."));
        self.phase = ScanPhase::Polling;
        let outcome = self.poll(&job_id).await;
        self.notifier.status(None);
        Ok(self.finish(outcome))
    }

    /// Runs the demo scan: a real job against the fixed placeholder URL,
    /// falling back to canned local results if the job cannot be created.
    pub async fn demo(&mut self, scan_type: ScanType) -> Result<ScanOutcome> {
        let request =
            ScanRequest::new(demo::DEMO_URL, scan_type).with_name(demo::DEMO_SCAN_NAME);

        self.phase = ScanPhase::Submitting;
        self.notifier.status(Some("Running demo scan..."));
        let job_id = match self.service.create_scan(&request).await {
            Ok(job_id) => job_id,
            Err(e) => {
                warn!("demo job creation failed, falling back to offline results: {e}");
                self.notifier.status(None);
                self.notifier
                    .notice(NoticeLevel::Info, "Showing demo results (offline mode).");
                self.phase = ScanPhase::Rendered;
                return Ok(ScanOutcome::Offline(demo::offline_record(scan_type)));
            }
        };
        self.current_job = Some(job_id.clone());

        // The backend honors its own demo mode; a failed start request is
        // not fatal here.
        if let Err(e) = self.service.run_scan(&job_id).await {
            debug!("demo start request failed, polling anyway: {e}");
        }
        sleep(DEMO_POLL_DELAY).await;

        self.notifier.status(Some("Scan in progress..."));
        self.phase = ScanPhase::Polling;
        let outcome = self.poll(&job_id).await;
        self.notifier.status(None);
        Ok(self.finish(outcome))
    }

    /// The report URL for the current job.
    ///
    /// Rejected with a notice when no job has been submitted yet.
    pub fn report_url(&self) -> Result<String> {
        match &self.current_job {
            Some(job_id) => Ok(self.service.report_url(job_id)),
            None => {
                self.notifier
                    .notice(NoticeLevel::Error, "No completed scan to generate report for");
                bail!("no scan job available for report generation");
            }
        }
    }

    /// Returns the controller to `Idle`, abandoning any in-flight poll.
    pub fn reset(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.current_job = None;
        self.notifier.status(None);
        self.phase = ScanPhase::Idle;
    }

    async fn poll(&self, job_id: &str) -> ScanOutcome {
        let deadline = Instant::now() + self.poll_timeout;
        let cancel = self.cancel.clone();

        loop {
            if Instant::now() >= deadline {
                return ScanOutcome::TimedOut;
            }
            match self.service.fetch_scan(job_id).await {
                Ok(scan) => match scan.status {
                    Some(JobStatus::Completed) => return ScanOutcome::Completed(scan),
                    Some(JobStatus::Failed) => return ScanOutcome::Failed(scan),
                    // pending, running, unknown: not terminal yet
                    _ => {}
                },
                // Transient errors only extend the poll, up to the ceiling.
                Err(e) => debug!("transient poll error for job {job_id}: {e}"),
            }
            tokio::select! {
                _ = cancel.cancelled() => return ScanOutcome::Cancelled,
                _ = sleep(self.poll_interval) => {}
            }
        }
    }

    fn submit_failed(&mut self, error: ApiError) -> anyhow::Error {
        self.notifier.status(None);
        let message = error.user_message("Scan failed to start");
        self.notifier.notice(NoticeLevel::Error, &message);
        warn!("scan submission failed: {error}");
        self.phase = ScanPhase::Idle;
        anyhow::anyhow!(message)
    }

    fn finish(&mut self, outcome: ScanOutcome) -> ScanOutcome {
        match &outcome {
            ScanOutcome::Completed(_) | ScanOutcome::Offline(_) => {
                self.phase = ScanPhase::Rendered;
            }
            ScanOutcome::Failed(_) => {
                self.notifier.notice(
                    NoticeLevel::Error,
                    "Scan failed. Showing any available details.",
                );
                self.phase = ScanPhase::Failed;
            }
            ScanOutcome::TimedOut => {
                self.notifier.notice(
                    NoticeLevel::Error,
                    "Scan timed out. Please try again or use the demo scan.",
                );
                self.phase = ScanPhase::TimedOut;
            }
            ScanOutcome::Cancelled => {
                self.phase = ScanPhase::Idle;
            }
        }
        outcome
    }
}

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::VeoClient;
use crate::error::{Result, VeoError};
use crate::types::{
    GenerationOutcome, GenerationState, GenerationStatus, InitialStatus, ProgressUpdate,
};

/// Display length for the in-progress prompt preview.
const PROMPT_PREVIEW_CHARS: usize = 60;

/// Anything that can answer a batch status read.
///
/// [`VeoClient`] is the production source; tests substitute scripted
/// implementations.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn generation_status(&self) -> Result<GenerationStatus>;
}

#[async_trait]
impl StatusSource for VeoClient {
    async fn generation_status(&self) -> Result<GenerationStatus> {
        VeoClient::generation_status(self).await
    }
}

#[async_trait]
impl<S: StatusSource + ?Sized> StatusSource for Arc<S> {
    async fn generation_status(&self) -> Result<GenerationStatus> {
        (**self).generation_status().await
    }
}

/// Cadence settings for a polling run.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between cycles while the batch is still running.
    pub interval: Duration,
    /// Longer delay applied after a transport or parse failure.
    pub error_backoff: Duration,
    /// Cap on consecutive transport failures before the last error
    /// propagates. `None` retries indefinitely at the backoff cadence.
    pub max_transport_retries: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            error_backoff: Duration::from_millis(5000),
            max_transport_retries: None,
        }
    }
}

/// Drives a status polling loop until the batch reaches a terminal state.
///
/// Cycles are strictly sequential: each one issues a single status
/// request and fully handles the response before the next request is
/// made, so there is never more than one in-flight read and a stale
/// response can never overwrite a newer one.
///
/// An explicit `error` status from the server is terminal and not
/// retried; a transport failure is treated as transient and retried
/// after [`PollConfig::error_backoff`].
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use veogen_rs::{StatusPoller, VeoClient};
///
/// # async fn example() -> veogen_rs::Result<()> {
/// let client = VeoClient::new("http://127.0.0.1:5000");
/// let poller = StatusPoller::new(client);
///
/// let outcome = poller
///     .run(|progress| println!("{}% done", progress.percent()))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct StatusPoller<S> {
    source: S,
    config: PollConfig,
    running: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl<S: StatusSource> StatusPoller<S> {
    /// Create a poller with the default cadence (2 s interval, 5 s
    /// error backoff, unbounded retries).
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: PollConfig::default(),
            running: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Override the polling cadence.
    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether a polling run is currently active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request cancellation; the loop stops at its next cycle boundary
    /// with [`VeoError::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Shareable handle to the cancellation flag, for wiring into
    /// shutdown paths.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Poll until the batch completes or fails, reporting progress each
    /// cycle.
    ///
    /// Starting is idempotent: if a run is already active, this returns
    /// `Ok(None)` without issuing any request. On a terminal status the
    /// loop stops permanently and the outcome is returned.
    pub async fn run<F>(&self, mut on_progress: F) -> Result<Option<GenerationOutcome>>
    where
        F: FnMut(ProgressUpdate),
    {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("poll loop already running, ignoring start");
            return Ok(None);
        }

        let result = self.poll_loop(&mut on_progress).await;
        self.running.store(false, Ordering::SeqCst);
        result.map(Some)
    }

    /// One-shot status read for startup.
    ///
    /// If a batch is mid-flight (e.g. this process restarted while the
    /// server kept working), the caller should resume with [`run`];
    /// if a finished batch left videos behind, they can be rendered
    /// without polling at all.
    ///
    /// [`run`]: StatusPoller::run
    pub async fn check_initial_status(&self) -> Result<InitialStatus> {
        let status = self.source.generation_status().await?;
        Ok(match status.state {
            GenerationState::Processing => InitialStatus::InProgress,
            _ if !status.videos.is_empty() => InitialStatus::Finished(status.videos),
            _ => InitialStatus::Idle,
        })
    }

    async fn poll_loop<F>(&self, on_progress: &mut F) -> Result<GenerationOutcome>
    where
        F: FnMut(ProgressUpdate),
    {
        let mut transport_failures: u32 = 0;

        loop {
            if self.cancel.load(Ordering::Relaxed) {
                return Err(VeoError::Cancelled);
            }

            match self.source.generation_status().await {
                Ok(status) => {
                    transport_failures = 0;
                    match status.state {
                        GenerationState::Completed => {
                            on_progress(ProgressUpdate {
                                completed: status.completed,
                                total: status.total,
                                current_prompt: None,
                            });
                            return Ok(GenerationOutcome::Completed {
                                videos: status.videos,
                            });
                        }
                        GenerationState::Error => {
                            return Ok(GenerationOutcome::Failed {
                                error: "the backend reported a generation failure".into(),
                            });
                        }
                        GenerationState::Idle | GenerationState::Processing => {
                            on_progress(progress_of(&status));
                            tokio::time::sleep(self.config.interval).await;
                        }
                    }
                }
                Err(e) => {
                    transport_failures += 1;
                    if let Some(max) = self.config.max_transport_retries {
                        if transport_failures > max {
                            return Err(e);
                        }
                    }
                    warn!(
                        error = %e,
                        attempt = transport_failures,
                        "status poll failed, retrying after backoff"
                    );
                    tokio::time::sleep(self.config.error_backoff).await;
                }
            }
        }
    }
}

fn progress_of(status: &GenerationStatus) -> ProgressUpdate {
    ProgressUpdate {
        completed: status.completed,
        total: status.total,
        current_prompt: status
            .current_prompt()
            .map(|p| truncate_prompt(p, PROMPT_PREVIEW_CHARS)),
    }
}

/// Cut a prompt down to `max_chars` characters, marking the cut with an
/// ellipsis. Counts characters, not bytes.
fn truncate_prompt(prompt: &str, max_chars: usize) -> String {
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

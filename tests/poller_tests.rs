//! Poll-loop behavior tests against scripted status sources.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use veogen_rs::{
    GenerationOutcome, GenerationState, GenerationStatus, InitialStatus, PollConfig, Result,
    StatusPoller, StatusSource, VeoError, VideoRef,
};

enum Step {
    Status(GenerationStatus),
    Fail,
}

/// Plays back a fixed sequence of status responses, counting requests.
/// Panics if polled past the end of the script (unless configured to
/// repeat a processing status), so a loop that fails to stop fails the
/// test.
struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    requests: AtomicU32,
    repeat_processing_when_empty: bool,
}

impl ScriptedSource {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            requests: AtomicU32::new(0),
            repeat_processing_when_empty: false,
        }
    }

    fn endless_processing() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            requests: AtomicU32::new(0),
            repeat_processing_when_empty: true,
        }
    }

    fn request_count(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn generation_status(&self) -> Result<GenerationStatus> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Status(status)) => Ok(status),
            Some(Step::Fail) => Err(VeoError::InvalidResponse(
                "scripted transport failure".into(),
            )),
            None if self.repeat_processing_when_empty => Ok(processing(1, 100)),
            None => panic!("poller issued a request past the end of the script"),
        }
    }
}

fn videos(n: u32) -> Vec<VideoRef> {
    (1..=n)
        .map(|i| VideoRef {
            prompt: format!("prompt number {}", i),
            filename: format!("video_{}.mp4", i),
            status: "completed".to_string(),
        })
        .collect()
}

fn processing(completed: u32, total: u32) -> GenerationStatus {
    GenerationStatus {
        state: GenerationState::Processing,
        completed,
        total,
        videos: videos(completed),
    }
}

fn completed(total: u32) -> GenerationStatus {
    GenerationStatus {
        state: GenerationState::Completed,
        completed: total,
        total,
        videos: videos(total),
    }
}

fn errored() -> GenerationStatus {
    GenerationStatus {
        state: GenerationState::Error,
        completed: 1,
        total: 3,
        videos: videos(1),
    }
}

#[tokio::test(start_paused = true)]
async fn polls_to_completion_with_ordered_progress() {
    let source = Arc::new(ScriptedSource::new(vec![
        Step::Status(processing(1, 3)),
        Step::Status(processing(2, 3)),
        Step::Status(completed(3)),
    ]));
    let poller = StatusPoller::new(Arc::clone(&source));

    let mut percents = Vec::new();
    let outcome = poller
        .run(|p| percents.push(p.percent()))
        .await
        .unwrap()
        .unwrap();

    match outcome {
        GenerationOutcome::Completed { videos } => assert_eq!(videos.len(), 3),
        other => panic!("Expected Completed, got {:?}", other),
    }
    assert_eq!(percents, vec![33, 66, 100]);
    assert_eq!(source.request_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn transient_failure_retries_after_backoff() {
    let source = ScriptedSource::new(vec![Step::Fail, Step::Status(completed(2))]);
    let poller = StatusPoller::new(source);

    let started = tokio::time::Instant::now();
    let outcome = poller.run(|_| {}).await.unwrap().unwrap();

    assert!(matches!(outcome, GenerationOutcome::Completed { .. }));
    // The second request only went out after the long backoff.
    assert!(started.elapsed() >= Duration::from_millis(5000));
}

#[tokio::test(start_paused = true)]
async fn error_status_is_terminal_and_not_retried() {
    let source = Arc::new(ScriptedSource::new(vec![
        Step::Status(processing(1, 3)),
        Step::Status(errored()),
    ]));
    let poller = StatusPoller::new(Arc::clone(&source));

    let mut completions = 0;
    let outcome = poller
        .run(|p| {
            if p.percent() == 100 {
                completions += 1;
            }
        })
        .await
        .unwrap()
        .unwrap();

    assert!(matches!(outcome, GenerationOutcome::Failed { .. }));
    // No further request after the terminal error, and the success path
    // must not have run.
    assert_eq!(source.request_count(), 2);
    assert_eq!(completions, 0);
}

#[tokio::test(start_paused = true)]
async fn retry_cap_propagates_last_transport_error() {
    let source = ScriptedSource::new(vec![Step::Fail, Step::Fail, Step::Fail]);
    let poller = StatusPoller::new(source).with_config(PollConfig {
        max_transport_retries: Some(2),
        ..PollConfig::default()
    });

    let err = poller.run(|_| {}).await.unwrap_err();
    assert!(matches!(err, VeoError::InvalidResponse(_)));
}

#[tokio::test]
async fn pre_cancelled_run_issues_no_requests() {
    let source = Arc::new(ScriptedSource::endless_processing());
    let poller = StatusPoller::new(Arc::clone(&source));
    poller.cancel();

    let err = poller.run(|_| {}).await.unwrap_err();
    assert!(matches!(err, VeoError::Cancelled));
    assert_eq!(source.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn second_concurrent_run_is_a_noop() {
    let poller = Arc::new(StatusPoller::new(ScriptedSource::endless_processing()));

    let background = {
        let poller = Arc::clone(&poller);
        tokio::spawn(async move { poller.run(|_| {}).await })
    };

    // Let the first run claim the running flag.
    while !poller.is_running() {
        tokio::task::yield_now().await;
    }

    let second = poller.run(|_| {}).await.unwrap();
    assert!(second.is_none());

    poller.cancel();
    let first = background.await.unwrap();
    assert!(matches!(first, Err(VeoError::Cancelled)));
    assert!(!poller.is_running());
}

#[tokio::test]
async fn initial_status_resumes_mid_batch() {
    let source = ScriptedSource::new(vec![Step::Status(processing(2, 5))]);
    let poller = StatusPoller::new(source);

    let initial = poller.check_initial_status().await.unwrap();
    assert!(matches!(initial, InitialStatus::InProgress));
}

#[tokio::test]
async fn initial_status_surfaces_finished_results() {
    let source = ScriptedSource::new(vec![Step::Status(completed(4))]);
    let poller = StatusPoller::new(source);

    match poller.check_initial_status().await.unwrap() {
        InitialStatus::Finished(videos) => assert_eq!(videos.len(), 4),
        other => panic!("Expected Finished, got {:?}", other),
    }
}

#[tokio::test]
async fn initial_status_idle_when_nothing_ran() {
    let source = ScriptedSource::new(vec![Step::Status(GenerationStatus {
        state: GenerationState::Idle,
        completed: 0,
        total: 0,
        videos: Vec::new(),
    })]);
    let poller = StatusPoller::new(source);

    assert!(matches!(
        poller.check_initial_status().await.unwrap(),
        InitialStatus::Idle
    ));
}

//! Progress tracker
//!
//! Polls a project's progress once immediately and then on a fixed interval,
//! counted from the end of the previous request so a slow backend is never
//! hit back-to-back. A request still in flight is abandoned on stop.
//! The poll lives in a spawned task owned by [`ProgressPoll`]: `stop()` ends it
//! gracefully and dropping the handle aborts it, so no timer outlives the view.
//!
//! Error policy:
//! - 404 puts the view in a "not found" state; polling continues and a later
//!   snapshot replaces that state
//! - any other failure is a transient message; the next tick retries
//!
//! When a snapshot reports exactly 100, a single navigation to the project
//! editor is emitted after the redirect delay and the poll ends. Ticks that
//! fall inside the delay still poll. A job that fails below 100 is polled until
//! the caller stops it; [`ProgressView::reports_failure`] lets the shell say so.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chaptercraft_api_client::ApiClient;
use chaptercraft_core::constants::{PROGRESS_FETCH_FAILED, PROGRESS_NOT_FOUND};
use chaptercraft_core::models::{ProcessingStep, ProgressSnapshot};
use chaptercraft_core::{AppResult, ClientConfig};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

use crate::routes::Route;

/// Where snapshots come from.
#[async_trait]
pub trait ProgressSource: Send + Sync + 'static {
    async fn fetch_progress(&self, project_id: &str) -> AppResult<ProgressSnapshot>;
}

#[async_trait]
impl ProgressSource for ApiClient {
    async fn fetch_progress(&self, project_id: &str) -> AppResult<ProgressSnapshot> {
        self.get_progress(project_id).await
    }
}

/// Timing of the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
    pub redirect_delay: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for TrackerConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            redirect_delay: config.redirect_delay(),
        }
    }
}

/// What the tracker displays for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    /// Percentage clamped to 0..=100.
    pub percent: u8,
    /// Width of the progress bar, in percent of the full bar.
    pub bar_width: u8,
    pub current_step: String,
    pub steps: Vec<ProcessingStep>,
    pub complete: bool,
    failed: bool,
}

impl ProgressView {
    pub fn from_snapshot(snapshot: &ProgressSnapshot) -> Self {
        let percent = snapshot.percent();
        Self {
            percent,
            bar_width: percent,
            current_step: snapshot.current_step.clone(),
            steps: snapshot.steps.clone(),
            complete: snapshot.is_complete(),
            failed: snapshot.reports_failure(),
        }
    }

    /// Whether the backend labelled the job as failed.
    pub fn reports_failure(&self) -> bool {
        self.failed
    }

    /// Text bar `columns` wide, e.g. `[#####     ]`.
    pub fn bar(&self, columns: usize) -> String {
        let filled = columns * self.bar_width as usize / 100;
        format!("[{}{}]", "#".repeat(filled), " ".repeat(columns - filled))
    }
}

/// Everything the poll reports, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    Snapshot(ProgressView),
    NotFound(String),
    TransientError(String),
    Navigate(Route),
}

/// Display state derived from the event stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    pub view: Option<ProgressView>,
    pub error: Option<String>,
    pub not_found: bool,
    pub navigate_to: Option<Route>,
}

impl TrackerState {
    pub fn apply(&mut self, event: TrackerEvent) {
        match event {
            TrackerEvent::Snapshot(view) => {
                self.view = Some(view);
                self.error = None;
                self.not_found = false;
            }
            TrackerEvent::NotFound(message) => {
                self.not_found = true;
                self.error = Some(message);
            }
            TrackerEvent::TransientError(message) => self.error = Some(message),
            TrackerEvent::Navigate(route) => self.navigate_to = Some(route),
        }
    }
}

/// Handle to a running progress poll.
pub struct ProgressPoll {
    project_id: String,
    events: mpsc::UnboundedReceiver<TrackerEvent>,
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl ProgressPoll {
    /// Start polling `project_id`. Must be called inside a tokio runtime.
    pub fn start<S: ProgressSource>(source: Arc<S>, project_id: &str, config: TrackerConfig) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let id = project_id.to_string();

        let handle = tokio::spawn(async move {
            poll_loop(source, id, config, events_tx, shutdown_rx).await;
        });

        Self {
            project_id: project_id.to_string(),
            events,
            shutdown_tx,
            handle,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Next event, or `None` once the poll has ended.
    pub async fn next_event(&mut self) -> Option<TrackerEvent> {
        self.events.recv().await
    }

    /// Stop polling and wait for the task to finish.
    pub async fn stop(mut self) {
        if let Err(e) = self.shutdown_tx.send(()).await {
            tracing::debug!(error = %e, "Progress poll already finished");
        }
        if let Err(e) = (&mut self.handle).await {
            tracing::warn!(error = %e, project_id = %self.project_id, "Progress poll task failed");
        }
    }
}

impl Drop for ProgressPoll {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// What woke the poll loop.
enum Wake {
    Tick,
    Fetched(AppResult<ProgressSnapshot>),
    Redirect,
    Shutdown,
}

/// Resolves at the redirect deadline, or never when none is armed.
async fn redirect_due(at: Option<Instant>) {
    match at {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn poll_loop<S: ProgressSource>(
    source: Arc<S>,
    project_id: String,
    config: TrackerConfig,
    events: mpsc::UnboundedSender<TrackerEvent>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    let mut ticker = interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut redirect_at: Option<Instant> = None;

    tracing::info!(
        project_id = %project_id,
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        "Progress tracking started"
    );

    loop {
        let mut wake = tokio::select! {
            _ = ticker.tick() => Wake::Tick,
            _ = redirect_due(redirect_at) => Wake::Redirect,
            _ = shutdown_rx.recv() => Wake::Shutdown,
        };

        // A slow fetch must not hold up stop() or the redirect.
        if let Wake::Tick = wake {
            wake = tokio::select! {
                result = source.fetch_progress(&project_id) => Wake::Fetched(result),
                _ = redirect_due(redirect_at) => Wake::Redirect,
                _ = shutdown_rx.recv() => Wake::Shutdown,
            };
            // Next request a full interval after this one returned.
            ticker.reset();
        }

        match wake {
            Wake::Fetched(result) => {
                let event = match result {
                    Ok(snapshot) => {
                        if snapshot.is_complete() && redirect_at.is_none() {
                            tracing::info!(project_id = %project_id, "Generation complete");
                            redirect_at = Some(Instant::now() + config.redirect_delay);
                        }
                        TrackerEvent::Snapshot(ProgressView::from_snapshot(&snapshot))
                    }
                    Err(e) if e.is_not_found() => {
                        tracing::debug!(project_id = %project_id, "Progress not found");
                        TrackerEvent::NotFound(PROGRESS_NOT_FOUND.to_string())
                    }
                    Err(e) => {
                        tracing::warn!(project_id = %project_id, error = %e, "Failed to fetch progress");
                        TrackerEvent::TransientError(PROGRESS_FETCH_FAILED.to_string())
                    }
                };
                if events.send(event).is_err() {
                    break;
                }
            }
            Wake::Redirect => {
                // Sent once; the loop ends here.
                let _ = events.send(TrackerEvent::Navigate(Route::Project(project_id.clone())));
                break;
            }
            Wake::Shutdown => break,
            Wake::Tick => {}
        }
    }

    tracing::info!(project_id = %project_id, "Progress tracking stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaptercraft_core::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Clone, Copy)]
    enum Reply {
        Progress(i32),
        NotFound,
        Fail,
    }

    /// Replies in order, repeating the last one forever.
    struct ScriptedSource {
        replies: Mutex<Vec<Reply>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(replies: &[Reply]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.to_vec()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProgressSource for ScriptedSource {
        async fn fetch_progress(&self, project_id: &str) -> AppResult<ProgressSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = {
                let mut replies = self.replies.lock().unwrap();
                if replies.len() > 1 {
                    replies.remove(0)
                } else {
                    replies[0]
                }
            };
            match reply {
                Reply::Progress(p) => Ok(ProgressSnapshot {
                    project_id: Some(project_id.to_string()),
                    overall_progress: p,
                    current_step: "Generating content".to_string(),
                    steps: Vec::new(),
                    estimated_completion: None,
                }),
                Reply::NotFound => Err(AppError::NotFound("Progress not found".to_string())),
                Reply::Fail => Err(AppError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
            }
        }
    }

    /// Takes `delay` to answer each request and records when each one started.
    struct SlowSource {
        origin: Instant,
        delay: Duration,
        started: Mutex<Vec<Duration>>,
    }

    impl SlowSource {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                origin: Instant::now(),
                delay,
                started: Mutex::new(Vec::new()),
            })
        }

        fn started(&self) -> Vec<Duration> {
            self.started.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProgressSource for SlowSource {
        async fn fetch_progress(&self, project_id: &str) -> AppResult<ProgressSnapshot> {
            self.started.lock().unwrap().push(self.origin.elapsed());
            tokio::time::sleep(self.delay).await;
            Ok(ProgressSnapshot {
                project_id: Some(project_id.to_string()),
                overall_progress: 10,
                current_step: "Generating content".to_string(),
                steps: Vec::new(),
                estimated_completion: None,
            })
        }
    }

    fn config(redirect_ms: u64) -> TrackerConfig {
        TrackerConfig {
            poll_interval: Duration::from_millis(2_000),
            redirect_delay: Duration::from_millis(redirect_ms),
        }
    }

    fn drain(poll: &mut ProgressPoll) -> Vec<TrackerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = poll.events.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_immediately_then_every_interval() {
        let source = ScriptedSource::new(&[Reply::Progress(10)]);
        let mut poll = ProgressPoll::start(source.clone(), "p-1", config(2_000));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(source.calls(), 1);

        tokio::time::sleep(Duration::from_millis(6_000)).await;
        assert_eq!(source.calls(), 4);
        assert_eq!(drain(&mut poll).len(), 4);

        poll.stop().await;
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigates_once_after_delay() {
        let source = ScriptedSource::new(&[Reply::Progress(40), Reply::Progress(100)]);
        let start = Instant::now();
        let mut poll = ProgressPoll::start(source.clone(), "p-1", config(5_000));

        let mut navigations = Vec::new();
        while let Some(event) = poll.next_event().await {
            if let TrackerEvent::Navigate(route) = event {
                navigations.push((route, start.elapsed()));
            }
        }

        // 100 is seen on the tick at 2s; navigation follows 5s later.
        assert_eq!(navigations.len(), 1);
        let (route, at) = &navigations[0];
        assert_eq!(route, &Route::Project("p-1".to_string()));
        assert!(*at >= Duration::from_millis(7_000) && *at < Duration::from_millis(7_500));
        // Ticks at 4s and 6s still ran inside the delay.
        assert_eq!(source.calls(), 4);

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_then_recovers() {
        let source = ScriptedSource::new(&[Reply::NotFound, Reply::Fail, Reply::Progress(30)]);
        let mut poll = ProgressPoll::start(source.clone(), "p-1", config(2_000));
        let mut state = TrackerState::default();

        let first = poll.next_event().await.unwrap();
        assert_eq!(first, TrackerEvent::NotFound(PROGRESS_NOT_FOUND.to_string()));
        state.apply(first);
        assert!(state.not_found);

        let second = poll.next_event().await.unwrap();
        assert_eq!(
            second,
            TrackerEvent::TransientError(PROGRESS_FETCH_FAILED.to_string())
        );
        state.apply(second);
        assert!(state.not_found);

        state.apply(poll.next_event().await.unwrap());
        assert!(!state.not_found);
        assert_eq!(state.error, None);
        assert_eq!(state.view.as_ref().map(|v| v.percent), Some(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_polling() {
        let source = ScriptedSource::new(&[Reply::Fail]);
        let poll = ProgressPoll::start(source.clone(), "p-1", config(2_000));

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(source.calls(), 2);

        drop(poll);
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_keeps_interval_between_requests() {
        let source = SlowSource::new(Duration::from_secs(5));
        let poll = ProgressPoll::start(source.clone(), "p-1", config(2_000));

        tokio::time::sleep(Duration::from_secs(16)).await;
        let started = source.started();
        assert_eq!(started.len(), 3);
        for pair in started.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(7));
        }

        poll.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_interrupts_request_in_flight() {
        let source = SlowSource::new(Duration::from_secs(30));
        let poll = ProgressPoll::start(source.clone(), "p-1", config(2_000));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.started().len(), 1);

        let before = Instant::now();
        poll.stop().await;
        assert!(before.elapsed() < Duration::from_millis(100));
        assert_eq!(source.started().len(), 1);
    }

    #[test]
    fn test_view_clamps_percentage() {
        let snapshot = |p| ProgressSnapshot {
            project_id: None,
            overall_progress: p,
            current_step: "Failed".to_string(),
            steps: Vec::new(),
            estimated_completion: None,
        };

        let over = ProgressView::from_snapshot(&snapshot(140));
        assert_eq!((over.percent, over.bar_width), (100, 100));
        assert_eq!(over.bar(10), "[##########]");

        let under = ProgressView::from_snapshot(&snapshot(-5));
        assert_eq!((under.percent, under.bar_width), (0, 0));
        assert_eq!(under.bar(4), "[    ]");
        assert!(under.reports_failure());

        let half = ProgressView::from_snapshot(&snapshot(50));
        assert_eq!(half.bar(10), "[#####     ]");
    }
}

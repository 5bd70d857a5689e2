/*!
 * Background translation worker.
 *
 * The worker is a tokio task that owns the engine and runs one job at a time.
 * The host talks to it only through channels:
 * - requests go through a depth-1 `watch` channel, so a newer request replaces
 *   one that has not started yet
 * - events come back over an unbounded `mpsc` channel
 *
 * Every submit makes its job current. Events of any other job are dropped by
 * the worker before sending and again by the handle on receipt, so after
 * `submit` returns the caller never sees events from an older job.
 */

use futures::Stream;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::app_config::Config;
use crate::engine::TranslationEngine;
use crate::errors::{BootstrapError, TranslationError};
use crate::math::{MathCode, MathRenderer};
use crate::tables::DEFAULT_TABLE;
use crate::translation::{
    JobId, JobOutcome, JobTracker, TranslationJob, TranslationOptions, TranslationRequest,
    Translator,
};

/// Event sent from the worker to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Bootstrap finished; sent once
    Ready,
    /// Progress of a chunked job
    Progress { job: JobId, percent: u8 },
    /// Finished translation of a job
    Result { job: JobId, text: String },
    /// A job failed, or bootstrap failed when `job` is `None`
    Error { job: Option<JobId>, message: String },
}

impl WorkerEvent {
    /// Job the event belongs to
    pub fn job(&self) -> Option<JobId> {
        match self {
            Self::Ready => None,
            Self::Progress { job, .. } | Self::Result { job, .. } => Some(*job),
            Self::Error { job, .. } => *job,
        }
    }

    /// Whether this event ends its job
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Result { .. } | Self::Error { .. })
    }
}

/// JSON form of a worker event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum WireEvent {
    Ready,
    Progress { percent: u8 },
    Result { result: String },
    Error { error: String },
}

impl From<&WorkerEvent> for WireEvent {
    fn from(event: &WorkerEvent) -> Self {
        match event {
            WorkerEvent::Ready => Self::Ready,
            WorkerEvent::Progress { percent, .. } => Self::Progress { percent: *percent },
            WorkerEvent::Result { text, .. } => Self::Result {
                result: text.clone(),
            },
            WorkerEvent::Error { message, .. } => Self::Error {
                error: message.clone(),
            },
        }
    }
}

/// Settings the worker applies to every job
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Chunking parameters
    pub options: TranslationOptions,
    /// Table used when a request names none
    pub default_table: String,
    /// Math code used when a request names none
    pub default_math_code: MathCode,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            options: TranslationOptions::default(),
            default_table: DEFAULT_TABLE.to_string(),
            default_math_code: MathCode::default(),
        }
    }
}

impl From<&Config> for WorkerSettings {
    fn from(config: &Config) -> Self {
        Self {
            options: TranslationOptions::from(&config.translation),
            default_table: config.translation.default_table.clone(),
            default_math_code: config.translation.default_math_code,
        }
    }
}

/// Everything a bootstrapped worker owns
pub struct WorkerContext {
    translator: Translator,
    settings: WorkerSettings,
}

impl WorkerContext {
    /// Context over a ready engine
    pub fn new(
        engine: Arc<dyn TranslationEngine>,
        math: Arc<MathRenderer>,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            translator: Translator::new(engine, math, settings.options),
            settings,
        }
    }

    fn accept(&self, id: JobId, request: TranslationRequest) -> TranslationJob {
        TranslationJob::from_request(
            id,
            request,
            &self.settings.default_table,
            self.settings.default_math_code,
        )
    }

    async fn run_job(
        &self,
        job: TranslationJob,
        jobs: &JobTracker,
        events: &mpsc::UnboundedSender<WorkerEvent>,
    ) {
        let id = job.id;
        info!(
            "Starting job {} ({} chars, table {}, math {})",
            id,
            job.text.chars().count(),
            job.table,
            job.math_code
        );

        let emit = |event: WorkerEvent| {
            if jobs.is_current(id) {
                let _ = events.send(event);
            } else {
                debug!("Dropping stale event of job {}", id);
            }
        };

        let outcome = self
            .translator
            .translate(
                &job,
                |percent| emit(WorkerEvent::Progress { job: id, percent }),
                || jobs.is_current(id),
            )
            .await;

        match outcome {
            Ok(JobOutcome::Completed(text)) => emit(WorkerEvent::Result { job: id, text }),
            Ok(JobOutcome::Superseded) => {}
            Err(e) => emit(WorkerEvent::Error {
                job: Some(id),
                message: e.to_string(),
            }),
        }
    }
}

type PendingRequest = Option<(JobId, TranslationRequest)>;

/// Spawns translation workers
pub struct BrailleWorker;

impl BrailleWorker {
    /// Spawn a worker that bootstraps its engine with `init`.
    ///
    /// Requests submitted before bootstrap finishes are held and run once the
    /// worker is ready. A failed bootstrap sends a single `Error` event and
    /// ends the worker.
    pub fn spawn<F>(init: F, math: Arc<MathRenderer>, settings: WorkerSettings) -> WorkerHandle
    where
        F: Future<Output = Result<Arc<dyn TranslationEngine>, BootstrapError>> + Send + 'static,
    {
        let (request_tx, request_rx) = watch::channel::<PendingRequest>(None);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let jobs = Arc::new(JobTracker::new());

        let task = tokio::spawn(run(
            init,
            math,
            settings,
            request_rx,
            event_tx,
            Arc::clone(&jobs),
        ));

        WorkerHandle {
            requests: request_tx,
            events: event_rx,
            jobs,
            task,
        }
    }

    /// Spawn a worker over an engine that is already available
    pub fn with_engine(
        engine: Arc<dyn TranslationEngine>,
        math: Arc<MathRenderer>,
        settings: WorkerSettings,
    ) -> WorkerHandle {
        Self::spawn(async move { Ok(engine) }, math, settings)
    }
}

async fn run<F>(
    init: F,
    math: Arc<MathRenderer>,
    settings: WorkerSettings,
    mut requests: watch::Receiver<PendingRequest>,
    events: mpsc::UnboundedSender<WorkerEvent>,
    jobs: Arc<JobTracker>,
) where
    F: Future<Output = Result<Arc<dyn TranslationEngine>, BootstrapError>> + Send + 'static,
{
    let engine = match init.await {
        Ok(engine) => engine,
        Err(e) => {
            error!("Worker bootstrap failed: {}", e);
            let _ = events.send(WorkerEvent::Error {
                job: None,
                message: e.to_string(),
            });
            return;
        }
    };

    let context = WorkerContext::new(engine, math, settings);
    let _ = events.send(WorkerEvent::Ready);

    while requests.changed().await.is_ok() {
        let pending = requests.borrow_and_update().clone();
        let Some((id, request)) = pending else {
            continue;
        };
        if !jobs.is_current(id) {
            debug!("Skipping job {}, a newer one was submitted", id);
            continue;
        }
        let job = context.accept(id, request);
        context.run_job(job, &jobs, &events).await;
    }

    debug!("Request channel closed, worker stopping");
}

/// Host side of a worker
pub struct WorkerHandle {
    requests: watch::Sender<PendingRequest>,
    events: mpsc::UnboundedReceiver<WorkerEvent>,
    jobs: Arc<JobTracker>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Submit a request, superseding any job still in flight
    pub fn submit(&self, request: TranslationRequest) -> JobId {
        // The id is issued under the slot's write lock, so concurrent submits
        // leave the newest id in the slot
        let mut id = JobId(0);
        self.requests.send_modify(|slot| {
            id = self.jobs.next();
            *slot = Some((id, request));
        });
        debug!("Submitted job {}", id);
        id
    }

    /// The most recently submitted job
    pub fn current_job(&self) -> Option<JobId> {
        self.jobs.current()
    }

    /// Next event for the current job, or a worker-wide event.
    ///
    /// Returns `None` once the worker has stopped and every event was read.
    pub async fn recv(&mut self) -> Option<WorkerEvent> {
        loop {
            let event = self.events.recv().await?;
            match event.job() {
                Some(job) if !self.jobs.is_current(job) => {
                    debug!("Discarding stale event of job {}", job);
                }
                _ => return Some(event),
            }
        }
    }

    /// Submit `request` and wait for its terminal event, forwarding progress
    pub async fn translate(
        &mut self,
        request: TranslationRequest,
        mut on_progress: impl FnMut(u8),
    ) -> Result<String, TranslationError> {
        let id = self.submit(request);
        while let Some(event) = self.recv().await {
            match event {
                WorkerEvent::Ready => {}
                WorkerEvent::Progress { job, percent } if job == id => on_progress(percent),
                WorkerEvent::Result { job, text } if job == id => return Ok(text),
                WorkerEvent::Error { job, message } if job.is_none() || job == Some(id) => {
                    return Err(TranslationError::WorkerFailed(message));
                }
                _ => {}
            }
        }
        Err(TranslationError::WorkerFailed(
            "worker stopped before the job finished".to_string(),
        ))
    }

    /// Turn the event side into a stream; submissions are no longer possible
    pub fn into_stream(self) -> impl Stream<Item = WorkerEvent> {
        futures::stream::unfold(self, |mut handle| async move {
            handle.recv().await.map(|event| (event, handle))
        })
    }

    /// Close the request channel and wait for the worker to finish its current job
    pub async fn shutdown(self) {
        let Self { requests, task, .. } = self;
        drop(requests);
        if let Err(e) = task.await {
            error!("Worker task ended abnormally: {}", e);
        }
    }
}

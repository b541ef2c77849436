//! Job lifecycle management.
//!
//! [`JobManager`] owns the in-memory job registry. `submit` persists the
//! uploaded logo into a job-scoped working directory, creates the job in
//! `pending`, and spawns one supervisor task that runs the pipeline and is
//! the only writer of job state. Callers observe jobs through snapshots
//! (`get`) or through the event bus; they never mutate a job directly.
//!
//! Status machine: `pending -> processing -> (completed | error)`, with
//! both terminal transitions final. Cancellation surfaces as `error` with
//! a "Job cancelled" message, keeping the status set closed.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use brandforge_core::config::{BrandConfig, NormalizedConfig};
use brandforge_core::service::ImageService;
use brandforge_core::types::JobId;
use brandforge_events::{JobEvent, JobEventBus, JobEventKind};
use brandforge_openai::{OpenAiClient, UnconfiguredService};
use brandforge_pipeline::cache::CacheStore;
use brandforge_pipeline::cost::CostInfo;
use brandforge_pipeline::events::{EventSink, PipelineEvent};
use brandforge_pipeline::forge_brand_kit;

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

/// One brand-kit job.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub config: BrandConfig,
    pub logo_path: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
    pub files: Option<Vec<PathBuf>>,
    pub error: Option<String>,
    /// Append-only progress log.
    pub progress: Vec<String>,
    pub cost: CostInfo,
}

struct JobEntry {
    job: Job,
    cancel: CancellationToken,
}

// ---------------------------------------------------------------------------
// JobManager
// ---------------------------------------------------------------------------

/// In-memory job registry plus the shared collaborators every run needs.
///
/// The registry uses a std `RwLock`: every access is a short synchronous
/// critical section (no awaits while holding it), which is what lets the
/// pipeline's synchronous [`EventSink`] apply events directly.
pub struct JobManager {
    jobs: RwLock<HashMap<JobId, JobEntry>>,
    jobs_dir: PathBuf,
    cache: Arc<CacheStore>,
    bus: Arc<JobEventBus>,
    /// Server-level default API key; job configs may override it.
    api_key: Option<String>,
}

impl JobManager {
    pub fn new(
        jobs_dir: PathBuf,
        cache: Arc<CacheStore>,
        bus: Arc<JobEventBus>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            jobs_dir,
            cache,
            bus,
            api_key,
        }
    }

    /// Create a job and launch its pipeline run.
    ///
    /// Validates the configuration and logo bytes first: on failure no job
    /// exists and the error is returned synchronously. On success the job
    /// id is returned immediately while the run proceeds in the background.
    pub async fn submit(
        self: &Arc<Self>,
        logo_bytes: Vec<u8>,
        normalized: NormalizedConfig,
    ) -> AppResult<JobId> {
        if logo_bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded logo is empty".to_string()));
        }

        let id = uuid::Uuid::new_v4();
        let job_dir = self.jobs_dir.join(id.to_string());
        let logo_path = job_dir.join("logo.png");
        let config = normalized.into_config(logo_path.clone(), job_dir.join("output"));
        config.validate()?;

        tokio::fs::create_dir_all(&job_dir)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to create job dir: {e}")))?;
        tokio::fs::write(&logo_path, &logo_bytes)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to persist logo: {e}")))?;

        let job = Job {
            id,
            status: JobStatus::Pending,
            config,
            logo_path,
            output_dir: None,
            manifest_path: None,
            files: None,
            error: None,
            progress: Vec::new(),
            cost: CostInfo::default(),
        };

        let cancel = CancellationToken::new();
        self.jobs
            .write()
            .expect("job registry lock poisoned")
            .insert(id, JobEntry { job, cancel });

        let manager = Arc::clone(self);
        tokio::spawn(async move {
            manager.run_job(id).await;
        });

        tracing::info!(job_id = %id, "Job submitted");
        Ok(id)
    }

    /// Snapshot of a job's current state.
    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.jobs
            .read()
            .expect("job registry lock poisoned")
            .get(id)
            .map(|entry| entry.job.clone())
    }

    /// Trigger a running job's cancellation token.
    ///
    /// Returns false when the job does not exist. Cancelling a terminal
    /// job is a no-op.
    pub fn cancel(&self, id: &JobId) -> bool {
        let jobs = self.jobs.read().expect("job registry lock poisoned");
        match jobs.get(id) {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel a job, drop it from the registry, and delete its working
    /// directory.
    pub async fn remove(&self, id: &JobId) -> bool {
        let removed = {
            let mut jobs = self.jobs.write().expect("job registry lock poisoned");
            jobs.remove(id).map(|entry| {
                entry.cancel.cancel();
            })
        };
        if removed.is_none() {
            return false;
        }

        let job_dir = self.jobs_dir.join(id.to_string());
        if let Err(e) = tokio::fs::remove_dir_all(&job_dir).await {
            tracing::warn!(job_id = %id, error = %e, "Failed to delete job directory");
        }
        tracing::info!(job_id = %id, "Job removed");
        true
    }

    /// Number of jobs currently tracked (any status).
    pub fn job_count(&self) -> usize {
        self.jobs.read().expect("job registry lock poisoned").len()
    }

    // -- supervisor ----------------------------------------------------------

    /// The per-job supervisor: the single writer of this job's state.
    async fn run_job(self: Arc<Self>, id: JobId) {
        let (config, cancel) = {
            let mut jobs = self.jobs.write().expect("job registry lock poisoned");
            let Some(entry) = jobs.get_mut(&id) else {
                tracing::error!(job_id = %id, "Job vanished before its run started");
                return;
            };
            entry.job.status = JobStatus::Processing;
            entry.job.progress.push("Job started...".to_string());
            (entry.job.config.clone(), entry.cancel.clone())
        };
        self.publish(
            id,
            JobEventKind::JobProgress {
                message: "Job started...".to_string(),
            },
        );

        let service = self.service_for(&config);
        let sink: Arc<dyn EventSink> = Arc::new(JobSink {
            manager: Arc::clone(&self),
            id,
        });

        let result =
            forge_brand_kit(config, service, Arc::clone(&self.cache), sink, cancel).await;

        match result {
            Ok(outcome) => {
                {
                    let mut jobs = self.jobs.write().expect("job registry lock poisoned");
                    if let Some(entry) = jobs.get_mut(&id) {
                        if entry.job.status.is_terminal() {
                            return;
                        }
                        entry.job.status = JobStatus::Completed;
                        entry.job.output_dir = Some(outcome.out_dir);
                        entry.job.manifest_path = Some(outcome.manifest_path);
                        entry.job.files = Some(outcome.files);
                        entry.job.cost = outcome.cost;
                        entry.job.progress.push("Job completed!".to_string());
                    }
                }
                tracing::info!(job_id = %id, "Job completed");
                self.publish(id, JobEventKind::JobCompleted);
            }
            Err(e) => {
                let message = e.to_string();
                {
                    let mut jobs = self.jobs.write().expect("job registry lock poisoned");
                    if let Some(entry) = jobs.get_mut(&id) {
                        if entry.job.status.is_terminal() {
                            return;
                        }
                        entry.job.status = JobStatus::Error;
                        entry.job.error = Some(message.clone());
                        entry.job.progress.push(format!("Error: {message}"));
                    }
                }
                tracing::error!(job_id = %id, error = %message, "Job failed");
                self.publish(
                    id,
                    JobEventKind::JobFailed {
                        error: message,
                    },
                );
            }
        }
    }

    /// Pick the image service for a run: the job's own key, the server
    /// default, or a stand-in that fails on first use when neither exists
    /// (dry-run and demo jobs never call it).
    fn service_for(&self, config: &BrandConfig) -> Arc<dyn ImageService> {
        let key = config.api_key.clone().or_else(|| self.api_key.clone());
        match key.and_then(|k| OpenAiClient::new(k).ok()) {
            Some(client) => Arc::new(client),
            None => Arc::new(UnconfiguredService),
        }
    }

    fn apply(&self, id: JobId, event: PipelineEvent) {
        let kind = {
            let mut jobs = self.jobs.write().expect("job registry lock poisoned");
            let Some(entry) = jobs.get_mut(&id) else {
                return;
            };
            match event {
                PipelineEvent::Progress(message) => {
                    entry.job.progress.push(message.clone());
                    JobEventKind::JobProgress { message }
                }
                PipelineEvent::Cost(cost) => {
                    entry.job.cost = cost;
                    JobEventKind::JobCost {
                        cost: serde_json::to_value(cost).unwrap_or(serde_json::Value::Null),
                    }
                }
            }
        };
        self.publish(id, kind);
    }

    fn publish(&self, id: JobId, kind: JobEventKind) {
        self.bus.publish(JobEvent::new(id, kind));
    }
}

/// Relays pipeline events into the job record and onto the event bus.
struct JobSink {
    manager: Arc<JobManager>,
    id: JobId,
}

impl EventSink for JobSink {
    fn emit(&self, event: PipelineEvent) {
        self.manager.apply(self.id, event);
    }
}

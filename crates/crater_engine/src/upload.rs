use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crater_logging::{crater_info, crater_warn};

use crate::{EngineEvent, ServiceError, UploadFailure, UploadProgress, UploadSummary};

/// Receives progress events from the engine.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// One file handed to the ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub title: String,
    pub folder_path: Option<String>,
    pub tags: Vec<String>,
}

impl UploadRequest {
    /// Title defaults to the file name.
    pub fn for_file(path: &Path, folder_path: Option<String>, tags: Vec<String>) -> Self {
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path: path.to_path_buf(),
            title,
            folder_path,
            tags,
        }
    }
}

/// Sends one file to the document-ingestion endpoint.
#[async_trait::async_trait]
pub trait Ingestor: Send + Sync {
    async fn upload(
        &self,
        request: UploadRequest,
        progress: TransferProgress,
    ) -> Result<(), ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadBatch {
    pub files: Vec<PathBuf>,
    pub folder_path: Option<String>,
    pub tags: Vec<String>,
}

/// Ordered files of one batch, the file currently transferring and its
/// progress percentage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    files: Vec<PathBuf>,
    current: usize,
    progress: u8,
    complete: bool,
}

impl UploadJob {
    pub fn new(files: Vec<PathBuf>) -> Self {
        let complete = files.is_empty();
        Self {
            files,
            current: 0,
            progress: 0,
            complete,
        }
    }

    pub fn current_file(&self) -> Option<&Path> {
        if self.complete {
            return None;
        }
        self.files.get(self.current).map(PathBuf::as_path)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn record(&mut self, percent: u8) {
        self.progress = percent.min(100);
    }

    fn settle(&mut self) {
        self.progress = 100;
    }

    /// Moves to the next file, or completes the job after the last one.
    fn advance(&mut self) {
        self.progress = 0;
        if self.current + 1 < self.files.len() {
            self.current += 1;
        } else {
            self.complete = true;
        }
    }

    fn snapshot(&self) -> UploadProgress {
        UploadProgress {
            file_index: self.current,
            file_count: self.files.len(),
            percent: self.progress,
        }
    }
}

type SharedJob = Arc<Mutex<Option<UploadJob>>>;

fn lock(job: &SharedJob) -> MutexGuard<'_, Option<UploadJob>> {
    job.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Progress handle given to an [`Ingestor`] for the file currently
/// transferring. Every change is mirrored to the sink.
#[derive(Clone)]
pub struct TransferProgress {
    job: SharedJob,
    sink: Arc<dyn ProgressSink>,
}

impl TransferProgress {
    fn new(job: SharedJob, sink: Arc<dyn ProgressSink>) -> Self {
        Self { job, sink }
    }

    /// Reports `sent` of `total` bytes as a rounded percentage.
    pub fn report(&self, sent: u64, total: u64) {
        let percent = percent_of(sent, total);
        self.update(|job| job.record(percent));
    }

    /// Copy of the batch state as of now.
    pub fn job(&self) -> Option<UploadJob> {
        lock(&self.job).clone()
    }

    fn update(&self, change: impl FnOnce(&mut UploadJob)) {
        let snapshot = lock(&self.job).as_mut().map(|job| {
            change(job);
            job.snapshot()
        });
        if let Some(snapshot) = snapshot {
            self.sink.emit(EngineEvent::UploadProgress(snapshot));
        }
    }
}

fn percent_of(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (sent as f64 * 100.0 / total as f64).round();
    percent.clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Uploading,
}

/// Read-only view of an orchestrator, usable while a batch runs.
#[derive(Clone, Default)]
pub struct UploadMonitor {
    job: SharedJob,
}

impl UploadMonitor {
    pub fn state(&self) -> OrchestratorState {
        if lock(&self.job).is_some() {
            OrchestratorState::Uploading
        } else {
            OrchestratorState::Idle
        }
    }

    /// The running batch, or `None` when idle.
    pub fn job(&self) -> Option<UploadJob> {
        lock(&self.job).clone()
    }
}

/// Uploads a batch strictly one file at a time.
///
/// A failed file is logged and skipped; the batch always runs to the end and
/// the completion callback fires exactly once.
pub struct UploadOrchestrator {
    ingestor: Arc<dyn Ingestor>,
    sink: Arc<dyn ProgressSink>,
    settle_delay: Duration,
    monitor: UploadMonitor,
}

impl UploadOrchestrator {
    pub fn new(
        ingestor: Arc<dyn Ingestor>,
        sink: Arc<dyn ProgressSink>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            ingestor,
            sink,
            settle_delay,
            monitor: UploadMonitor::default(),
        }
    }

    pub fn state(&self) -> OrchestratorState {
        self.monitor.state()
    }

    pub fn monitor(&self) -> UploadMonitor {
        self.monitor.clone()
    }

    pub async fn run<F>(&mut self, batch: UploadBatch, on_complete: F) -> UploadSummary
    where
        F: FnOnce(&UploadSummary),
    {
        let UploadBatch {
            files,
            folder_path,
            tags,
        } = batch;
        crater_info!("Upload batch started: {} files", files.len());

        *lock(&self.monitor.job) = Some(UploadJob::new(files.clone()));
        let progress = TransferProgress::new(self.monitor.job.clone(), self.sink.clone());
        let mut summary = UploadSummary::default();

        for (index, path) in files.iter().enumerate() {
            let request = UploadRequest::for_file(path, folder_path.clone(), tags.clone());
            progress.update(|job| job.record(0));

            let result = self.ingestor.upload(request, progress.clone()).await;
            summary.attempted += 1;
            match result {
                Ok(()) => crater_info!("Uploaded {} ({}/{})", path.display(), index + 1, files.len()),
                Err(error) => {
                    crater_warn!("Upload failed for {}: {}", path.display(), error);
                    summary.failures.push(UploadFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }

            progress.update(UploadJob::settle);
            if !self.settle_delay.is_zero() {
                tokio::time::sleep(self.settle_delay).await;
            }
            progress.update(UploadJob::advance);
        }

        *lock(&self.monitor.job) = None;
        crater_info!(
            "Upload batch finished: {} attempted, {} failed",
            summary.attempted,
            summary.failures.len()
        );
        on_complete(&summary);
        summary
    }
}

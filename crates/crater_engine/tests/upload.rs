use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use crater_engine::{
    EngineEvent, FailureKind, Ingestor, OrchestratorState, ProgressSink, ServiceError,
    TransferProgress, UploadBatch, UploadMonitor, UploadOrchestrator, UploadProgress,
    UploadRequest,
};
use pretty_assertions::assert_eq;

type Journal = Arc<Mutex<Vec<String>>>;

struct JournalSink {
    journal: Journal,
    events: Mutex<Vec<UploadProgress>>,
}

impl JournalSink {
    fn new(journal: Journal) -> Self {
        Self {
            journal,
            events: Mutex::new(Vec::new()),
        }
    }

    fn progress(&self) -> Vec<UploadProgress> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for JournalSink {
    fn emit(&self, event: EngineEvent) {
        if let EngineEvent::UploadProgress(progress) = event {
            self.journal.lock().unwrap().push(format!(
                "progress {} {}",
                progress.file_index, progress.percent
            ));
            self.events.lock().unwrap().push(progress);
        }
    }
}

/// Reads the orchestrator's monitor every time progress is emitted.
#[derive(Default)]
struct MonitorSink {
    monitor: OnceLock<UploadMonitor>,
    seen: Mutex<Vec<(OrchestratorState, Option<PathBuf>)>>,
}

impl ProgressSink for MonitorSink {
    fn emit(&self, _event: EngineEvent) {
        if let Some(monitor) = self.monitor.get() {
            let current = monitor
                .job()
                .and_then(|job| job.current_file().map(Path::to_path_buf));
            self.seen.lock().unwrap().push((monitor.state(), current));
        }
    }
}

/// Fails every file whose title is listed in `failing`.
struct FakeIngestor {
    failing: Vec<String>,
    journal: Journal,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl FakeIngestor {
    fn new(failing: &[&str], journal: Journal) -> Self {
        Self {
            failing: failing.iter().map(|name| name.to_string()).collect(),
            journal,
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    fn uploaded(&self) -> Vec<String> {
        self.journal
            .lock()
            .unwrap()
            .iter()
            .filter_map(|line| line.strip_prefix("start ").map(ToOwned::to_owned))
            .collect()
    }
}

#[async_trait::async_trait]
impl Ingestor for FakeIngestor {
    async fn upload(
        &self,
        request: UploadRequest,
        progress: TransferProgress,
    ) -> Result<(), ServiceError> {
        let job = progress.job().expect("job is set while uploading");
        assert_eq!(job.current_file(), Some(request.path.as_path()));
        assert_eq!(job.progress(), 0);

        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        self.journal
            .lock()
            .unwrap()
            .push(format!("start {}", request.title));

        progress.report(50, 100);
        tokio::time::sleep(Duration::from_millis(5)).await;

        self.journal
            .lock()
            .unwrap()
            .push(format!("end {}", request.title));
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&request.title) {
            return Err(ServiceError {
                kind: FailureKind::HttpStatus(500),
                message: "ingestion failed".to_string(),
            });
        }
        progress.report(100, 100);
        Ok(())
    }
}

fn batch(names: &[&str]) -> UploadBatch {
    UploadBatch {
        files: names.iter().map(|name| PathBuf::from(format!("/docs/{name}"))).collect(),
        folder_path: None,
        tags: Vec::new(),
    }
}

fn setup(failing: &[&str]) -> (Journal, Arc<FakeIngestor>, Arc<JournalSink>, UploadOrchestrator) {
    crater_logging::initialize_for_tests();
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let ingestor = Arc::new(FakeIngestor::new(failing, journal.clone()));
    let sink = Arc::new(JournalSink::new(journal.clone()));
    let orchestrator = UploadOrchestrator::new(ingestor.clone(), sink.clone(), Duration::ZERO);
    (journal, ingestor, sink, orchestrator)
}

#[tokio::test]
async fn failed_middle_file_does_not_stop_batch() {
    let (journal, ingestor, sink, mut orchestrator) = setup(&["b.pdf"]);
    let completions = AtomicUsize::new(0);

    let summary = orchestrator
        .run(batch(&["a.pdf", "b.pdf", "c.pdf"]), |_| {
            completions.fetch_add(1, Ordering::SeqCst);
            journal.lock().unwrap().push("complete".to_string());
        })
        .await;

    assert_eq!(ingestor.uploaded(), vec!["a.pdf", "b.pdf", "c.pdf"]);
    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].path, PathBuf::from("/docs/b.pdf"));

    let progress = sink.progress();
    for file_index in [0, 2] {
        assert!(progress
            .iter()
            .any(|p| p.file_index == file_index && p.percent == 100));
    }
    assert_eq!(progress.last().map(|p| p.percent), Some(0));

    // Completion comes after the last file settled, not after the failure.
    let journal = journal.lock().unwrap();
    let position = |line: &str| journal.iter().position(|entry| entry == line).unwrap();
    assert_eq!(journal.last().map(String::as_str), Some("complete"));
    assert!(position("end c.pdf") < position("complete"));
    assert!(position("end b.pdf") < position("start c.pdf"));
}

#[tokio::test]
async fn any_single_failure_still_attempts_every_file() {
    let names = ["1.pdf", "2.pdf", "3.pdf", "4.pdf"];
    for failing in names {
        let (_journal, ingestor, sink, mut orchestrator) = setup(&[failing]);
        let completions = AtomicUsize::new(0);

        let summary = orchestrator
            .run(batch(&names), |_| {
                completions.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(ingestor.uploaded().len(), names.len());
        assert_eq!(summary.attempted, names.len());
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(completions.load(Ordering::SeqCst), 1);
        assert_eq!(sink.progress().last().map(|p| p.percent), Some(0));
    }
}

#[tokio::test]
async fn files_upload_one_at_a_time() {
    let (_journal, ingestor, _sink, mut orchestrator) = setup(&[]);

    orchestrator
        .run(batch(&["a.md", "b.md", "c.md", "d.md"]), |_| {})
        .await;

    assert_eq!(ingestor.max_active.load(Ordering::SeqCst), 1);
    let journal = ingestor.journal.lock().unwrap();
    let transfers: Vec<_> = journal
        .iter()
        .filter(|line| line.starts_with("start ") || line.starts_with("end "))
        .cloned()
        .collect();
    assert_eq!(
        transfers,
        vec![
            "start a.md", "end a.md", "start b.md", "end b.md", "start c.md", "end c.md",
            "start d.md", "end d.md",
        ]
    );
}

#[tokio::test]
async fn orchestrator_returns_to_idle() {
    let (_journal, _ingestor, _sink, mut orchestrator) = setup(&["a.pdf"]);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);

    orchestrator.run(batch(&["a.pdf"]), |_| {}).await;

    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn monitor_sees_uploading_while_batch_runs() {
    crater_logging::initialize_for_tests();
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let ingestor = Arc::new(FakeIngestor::new(&[], journal));
    let sink = Arc::new(MonitorSink::default());
    let mut orchestrator = UploadOrchestrator::new(ingestor, sink.clone(), Duration::ZERO);
    let monitor = orchestrator.monitor();
    assert!(sink.monitor.set(monitor.clone()).is_ok());
    assert_eq!(monitor.state(), OrchestratorState::Idle);

    orchestrator.run(batch(&["a.pdf", "b.pdf"]), |_| {}).await;

    let seen = sink.seen.lock().unwrap().clone();
    assert!(!seen.is_empty());
    assert!(seen
        .iter()
        .all(|(state, _)| *state == OrchestratorState::Uploading));
    assert_eq!(seen[0].1.as_deref(), Some(Path::new("/docs/a.pdf")));
    assert!(seen
        .iter()
        .any(|(_, current)| current.as_deref() == Some(Path::new("/docs/b.pdf"))));

    assert_eq!(monitor.state(), OrchestratorState::Idle);
    assert_eq!(monitor.job(), None);
}

#[tokio::test]
async fn settle_delay_follows_each_file() {
    crater_logging::initialize_for_tests();
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let ingestor = Arc::new(FakeIngestor::new(&[], journal.clone()));
    let sink = Arc::new(JournalSink::new(journal));
    let delay = Duration::from_millis(30);
    let mut orchestrator = UploadOrchestrator::new(ingestor, sink, delay);

    let started = Instant::now();
    orchestrator.run(batch(&["a.txt", "b.txt"]), |_| {}).await;

    assert!(started.elapsed() >= delay * 2);
}

#[tokio::test]
async fn empty_batch_completes_once() {
    let (_journal, ingestor, _sink, mut orchestrator) = setup(&[]);
    let completions = AtomicUsize::new(0);

    let summary = orchestrator
        .run(UploadBatch::default(), |_| {
            completions.fetch_add(1, Ordering::SeqCst);
        })
        .await;

    assert_eq!(summary.attempted, 0);
    assert!(ingestor.uploaded().is_empty());
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

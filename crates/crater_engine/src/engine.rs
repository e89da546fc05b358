use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use crater_logging::crater_debug;

use crate::upload::{ChannelProgressSink, ProgressSink, UploadBatch, UploadOrchestrator};
use crate::{
    DocumentGateway, DocumentQuery, EngineError, EngineEvent, GenerationPayload,
    GenerationService, Ingestor, RequestId, ServiceClient, ServiceSettings,
};

enum EngineCommand {
    ResolveIdentity,
    ListDocuments(DocumentQuery),
    Preview {
        request_id: RequestId,
        payload: GenerationPayload,
    },
    Generate {
        request_id: RequestId,
        payload: GenerationPayload,
    },
    Upload(UploadBatch),
}

#[derive(Clone)]
struct Services {
    gateway: Arc<dyn DocumentGateway>,
    generation: Arc<dyn GenerationService>,
    ingestor: Arc<dyn Ingestor>,
    settle_delay: Duration,
}

/// Runs backend requests on a background tokio runtime and hands results back
/// as [`EngineEvent`]s.
///
/// Requests are not cancellable: each runs until it succeeds or fails.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ServiceSettings) -> Result<Self, EngineError> {
        let settle_delay = settings.upload_settle_delay();
        let client = Arc::new(ServiceClient::new(settings)?);
        Self::with_services(client.clone(), client.clone(), client, settle_delay)
    }

    /// Builds an engine over arbitrary collaborators.
    pub fn with_services(
        gateway: Arc<dyn DocumentGateway>,
        generation: Arc<dyn GenerationService>,
        ingestor: Arc<dyn Ingestor>,
        settle_delay: Duration,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let services = Services {
            gateway,
            generation,
            ingestor,
            settle_delay,
        };
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("crater-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let services = services.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(services, command, event_tx).await;
                    });
                }
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn resolve_identity(&self) {
        self.send(EngineCommand::ResolveIdentity);
    }

    pub fn list_documents(&self, query: DocumentQuery) {
        self.send(EngineCommand::ListDocuments(query));
    }

    pub fn preview(&self, request_id: RequestId, payload: GenerationPayload) {
        self.send(EngineCommand::Preview {
            request_id,
            payload,
        });
    }

    pub fn generate(&self, request_id: RequestId, payload: GenerationPayload) {
        self.send(EngineCommand::Generate {
            request_id,
            payload,
        });
    }

    pub fn upload(&self, batch: UploadBatch) {
        self.send(EngineCommand::Upload(batch));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            crater_debug!("Engine thread stopped; command dropped");
        }
    }
}

async fn handle_command(
    services: Services,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::ResolveIdentity => {
            EngineEvent::IdentityResolved(services.gateway.current_identity().await)
        }
        EngineCommand::ListDocuments(query) => {
            EngineEvent::DocumentsListed(services.gateway.list_documents(&query).await)
        }
        EngineCommand::Preview {
            request_id,
            payload,
        } => EngineEvent::PreviewCompleted {
            request_id,
            result: services.generation.preview(&payload).await,
        },
        EngineCommand::Generate {
            request_id,
            payload,
        } => EngineEvent::GenerationCompleted {
            request_id,
            result: services.generation.generate(&payload).await,
        },
        EngineCommand::Upload(batch) => {
            let sink: Arc<dyn ProgressSink> = Arc::new(ChannelProgressSink::new(event_tx.clone()));
            let mut orchestrator =
                UploadOrchestrator::new(services.ingestor, sink, services.settle_delay);
            orchestrator
                .run(batch, |summary| {
                    let _ = event_tx.send(EngineEvent::UploadFinished(summary.clone()));
                })
                .await;
            return;
        }
    };
    let _ = event_tx.send(event);
}

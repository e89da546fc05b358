//! Crater engine: backend clients, upload orchestration and effect execution.
mod client;
mod dto;
mod engine;
mod gateway;
mod generation;
mod ingest;
mod settings;
mod types;
mod upload;

pub use client::ServiceClient;
pub use dto::{
    DocumentQuery, DocumentRecord, GenerationPayload, IdentityRecord, PreviewResponse,
    RecordStatus,
};
pub use engine::EngineHandle;
pub use gateway::DocumentGateway;
pub use generation::GenerationService;
pub use settings::ServiceSettings;
pub use types::{
    EngineError, EngineEvent, FailureKind, RequestId, ServiceError, UploadFailure,
    UploadProgress, UploadSummary,
};
pub use upload::{
    ChannelProgressSink, Ingestor, OrchestratorState, ProgressSink, TransferProgress,
    UploadBatch, UploadJob, UploadMonitor, UploadOrchestrator, UploadRequest,
};

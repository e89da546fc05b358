use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::dto::{DocumentRecord, IdentityRecord, PreviewResponse};

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    IdentityResolved(Result<Option<IdentityRecord>, ServiceError>),
    DocumentsListed(Result<Vec<DocumentRecord>, ServiceError>),
    PreviewCompleted {
        request_id: RequestId,
        result: Result<PreviewResponse, ServiceError>,
    },
    GenerationCompleted {
        request_id: RequestId,
        result: Result<(), ServiceError>,
    },
    UploadProgress(UploadProgress),
    UploadFinished(UploadSummary),
}

/// Progress of the one file currently transferring in an upload batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub file_index: usize,
    pub file_count: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadSummary {
    pub attempted: usize,
    pub failures: Vec<UploadFailure>,
}

impl UploadSummary {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failures.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub path: PathBuf,
    pub error: ServiceError,
}

/// Failure talking to one of the backend collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    HttpStatus(u16),
    MalformedResponse,
    UnsupportedFileType { extension: String },
    TooLarge { max_bytes: u64, actual: u64 },
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::UnsupportedFileType { extension } => {
                write!(f, "unsupported file type '{extension}'")
            }
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "file too large (max {max_bytes}, actual {actual})")
            }
            FailureKind::Io => write!(f, "io error"),
        }
    }
}

/// Failure setting up the engine itself.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid base url '{url}': {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

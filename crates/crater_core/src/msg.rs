use std::path::PathBuf;

use crate::{CreationMode, Document, DocumentId, Identity, PreviewResult, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// App finished booting; resolve who is signed in.
    Startup,
    /// Session gateway answered; `None` means signed out.
    IdentityResolved(Option<Identity>),
    /// Fresh document listing from the gateway.
    DocumentsLoaded(Vec<Document>),
    DocumentsLoadFailed(String),
    /// User clicked Create Content.
    WorkflowOpened,
    MethodChosen(CreationMode),
    SourceToggled(DocumentId),
    PreviewRequested,
    PreviewSucceeded {
        request_id: RequestId,
        result: PreviewResult,
    },
    PreviewFailed {
        request_id: RequestId,
        message: String,
    },
    /// Back from preview to source selection.
    BackToSelection,
    /// Back from source selection to method choice.
    BackToMethod,
    GenerateRequested,
    GenerateSucceeded {
        request_id: RequestId,
    },
    GenerateFailed {
        request_id: RequestId,
        message: String,
    },
    /// User closed the workflow.
    WorkflowCancelled,
    /// User dropped or picked files to ingest.
    UploadSubmitted {
        files: Vec<PathBuf>,
        folder_path: Option<String>,
        tags: Vec<String>,
    },
    /// Orchestrator progress for the file currently transferring.
    UploadProgress {
        file_index: usize,
        file_count: usize,
        percent: u8,
    },
    /// Orchestrator attempted every file in the batch.
    UploadFinished {
        attempted: usize,
        failed: usize,
    },
    /// Render tick.
    Tick,
    NoOp,
}

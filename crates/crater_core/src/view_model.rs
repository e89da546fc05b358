use crate::{CreationMode, DocumentId, DocumentStatus, PreviewResult, WorkflowStep};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub signed_in_as: Option<String>,
    pub documents: Vec<DocumentRowView>,
    pub workflow: Option<WorkflowView>,
    pub upload: UploadView,
    pub notice: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRowView {
    pub id: DocumentId,
    pub title: String,
    pub file_type: String,
    pub folder_path: Option<String>,
    pub status: DocumentStatus,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowView {
    pub step: WorkflowStep,
    pub mode: Option<CreationMode>,
    pub selected: Vec<DocumentId>,
    pub busy: bool,
    pub preview: Option<PreviewResult>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadView {
    pub uploading: bool,
    pub progress: u8,
    /// One-based, for display.
    pub file_number: usize,
    pub file_count: usize,
}

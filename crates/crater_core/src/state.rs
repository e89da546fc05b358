use crate::view_model::{AppViewModel, DocumentRowView, UploadView, WorkflowView};
use crate::{Document, Identity, RequestId, UploadState, WorkflowState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    identity: Option<Identity>,
    documents: Vec<Document>,
    workflow: Option<WorkflowState>,
    upload: UploadState,
    last_request_id: RequestId,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn workflow(&self) -> Option<&WorkflowState> {
        self.workflow.as_ref()
    }

    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    pub fn view(&self) -> AppViewModel {
        let selection = self.workflow.as_ref().map(WorkflowState::selection);
        AppViewModel {
            signed_in_as: self
                .identity
                .as_ref()
                .map(|identity| identity.display_name().to_string()),
            documents: self
                .documents
                .iter()
                .map(|doc| DocumentRowView {
                    id: doc.id.clone(),
                    title: doc.title.clone(),
                    file_type: doc.file_type.clone(),
                    folder_path: doc.folder_path.clone(),
                    status: doc.status,
                    selected: selection.is_some_and(|s| s.contains(&doc.id)),
                })
                .collect(),
            workflow: self.workflow.as_ref().map(|workflow| WorkflowView {
                step: workflow.step(),
                mode: workflow.mode(),
                selected: workflow.selection().to_vec(),
                busy: workflow.is_busy(),
                preview: workflow.preview().cloned(),
                last_error: workflow.last_error().map(ToOwned::to_owned),
            }),
            upload: UploadView {
                uploading: self.upload.is_uploading(),
                progress: self.upload.progress(),
                file_number: self.upload.file_index() + 1,
                file_count: self.upload.file_count(),
            },
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Id the next issued request will carry. Only committed once a request
    /// is actually issued, so rejected actions leave state untouched.
    pub(crate) fn next_request_id(&self) -> RequestId {
        self.last_request_id + 1
    }

    pub(crate) fn commit_request_id(&mut self, request_id: RequestId) {
        self.last_request_id = request_id;
    }

    pub(crate) fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
        self.mark_dirty();
    }

    pub(crate) fn set_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
        self.mark_dirty();
    }

    pub(crate) fn open_workflow(&mut self) {
        self.workflow = Some(WorkflowState::new());
        self.notice = None;
        self.mark_dirty();
    }

    pub(crate) fn close_workflow(&mut self) {
        if self.workflow.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn workflow_mut(&mut self) -> Option<&mut WorkflowState> {
        self.workflow.as_mut()
    }

    pub(crate) fn upload_mut(&mut self) -> &mut UploadState {
        self.dirty = true;
        &mut self.upload
    }
}

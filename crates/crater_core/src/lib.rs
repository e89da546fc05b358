//! Crater core: pure workflow state machine and view-model helpers.
mod document;
mod effect;
mod msg;
mod selection;
mod state;
mod update;
mod upload;
mod view_model;
mod workflow;

pub use document::{Document, DocumentId, DocumentStatus, Identity};
pub use effect::Effect;
pub use msg::Msg;
pub use selection::SelectionSet;
pub use state::AppState;
pub use update::update;
pub use upload::UploadState;
pub use view_model::{AppViewModel, DocumentRowView, UploadView, WorkflowView};
pub use workflow::{
    CreationMode, GenerationRequest, PreviewResult, Rejection, RequestId, WorkflowState,
    WorkflowStep, GENERATION_PROMPT, PREVIEW_PROMPT,
};

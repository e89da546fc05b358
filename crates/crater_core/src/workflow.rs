use std::fmt;

use crate::{DocumentId, SelectionSet};

pub type RequestId = u64;

/// Instruction sent with every preview request.
pub const PREVIEW_PROMPT: &str = "Sketch a comprehensive document built from the selected \
sources: list its main sections in reading order and write one short example passage in \
the intended style.";

/// Instruction sent with every full generation request.
pub const GENERATION_PROMPT: &str = "Write a comprehensive document from the selected \
sources. Organize it into clear sections, cover every major topic the sources discuss, and \
keep every statement grounded in the source material.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStep {
    #[default]
    ChooseMethod,
    SelectSources,
    Preview,
}

/// How the user wants the new content shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationMode {
    /// Match the format of an example document.
    Example,
    /// Follow a pre-built template.
    Template,
}

/// Advisory sample returned by the preview endpoint. Never fed back into
/// generation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewResult {
    /// Proposed section headings, in order.
    pub toc: Vec<String>,
    /// Proposed style, as `(aspect, value)` pairs such as `("tone", "professional")`.
    pub style_guide: Vec<(String, String)>,
    pub example_snippet: Option<String>,
    pub estimated_tokens: Option<u32>,
    pub source_citations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub source_doc_ids: Vec<DocumentId>,
    pub custom_prompt: String,
}

/// Why a workflow action was turned into a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Busy,
    WrongStep(WorkflowStep),
    EmptySelection,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Busy => write!(f, "a request is already outstanding"),
            Rejection::WrongStep(step) => write!(f, "not allowed at step {step:?}"),
            Rejection::EmptySelection => write!(f, "no sources selected"),
        }
    }
}

/// State of one open content-creation workflow.
///
/// Invariants: `Preview` is only reached with a non-empty selection and a
/// stored preview; `in_flight` holds the id of the single outstanding request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowState {
    step: WorkflowStep,
    mode: Option<CreationMode>,
    selection: SelectionSet,
    preview: Option<PreviewResult>,
    in_flight: Option<RequestId>,
    last_error: Option<String>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn mode(&self) -> Option<CreationMode> {
        self.mode
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn preview(&self) -> Option<&PreviewResult> {
        self.preview.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn owns(&self, request_id: RequestId) -> bool {
        self.in_flight == Some(request_id)
    }

    fn expect_idle_at(&self, step: WorkflowStep) -> Result<(), Rejection> {
        if self.is_busy() {
            return Err(Rejection::Busy);
        }
        if self.step != step {
            return Err(Rejection::WrongStep(self.step));
        }
        Ok(())
    }

    pub(crate) fn choose_method(&mut self, mode: CreationMode) -> Result<(), Rejection> {
        self.expect_idle_at(WorkflowStep::ChooseMethod)?;
        self.mode = Some(mode);
        self.selection = SelectionSet::new();
        self.step = WorkflowStep::SelectSources;
        Ok(())
    }

    pub(crate) fn toggle_source(&mut self, id: &str) -> Result<bool, Rejection> {
        self.expect_idle_at(WorkflowStep::SelectSources)?;
        Ok(self.selection.toggle(id))
    }

    pub(crate) fn back_to_method(&mut self) -> Result<(), Rejection> {
        self.expect_idle_at(WorkflowStep::SelectSources)?;
        self.mode = None;
        self.selection = SelectionSet::new();
        self.last_error = None;
        self.step = WorkflowStep::ChooseMethod;
        Ok(())
    }

    pub(crate) fn begin_preview(
        &mut self,
        request_id: RequestId,
    ) -> Result<GenerationRequest, Rejection> {
        self.expect_idle_at(WorkflowStep::SelectSources)?;
        if self.selection.is_empty() {
            return Err(Rejection::EmptySelection);
        }
        self.in_flight = Some(request_id);
        self.last_error = None;
        Ok(GenerationRequest {
            source_doc_ids: self.selection.to_vec(),
            custom_prompt: PREVIEW_PROMPT.to_string(),
        })
    }

    /// Returns false when the response is stale.
    pub(crate) fn complete_preview(&mut self, request_id: RequestId, result: PreviewResult) -> bool {
        if !self.owns(request_id) || self.step != WorkflowStep::SelectSources {
            return false;
        }
        self.in_flight = None;
        self.preview = Some(result);
        self.step = WorkflowStep::Preview;
        true
    }

    pub(crate) fn back_to_selection(&mut self) -> Result<(), Rejection> {
        self.expect_idle_at(WorkflowStep::Preview)?;
        self.preview = None;
        self.last_error = None;
        self.step = WorkflowStep::SelectSources;
        Ok(())
    }

    pub(crate) fn begin_generation(
        &mut self,
        request_id: RequestId,
    ) -> Result<GenerationRequest, Rejection> {
        self.expect_idle_at(WorkflowStep::Preview)?;
        self.in_flight = Some(request_id);
        self.last_error = None;
        Ok(GenerationRequest {
            source_doc_ids: self.selection.to_vec(),
            custom_prompt: GENERATION_PROMPT.to_string(),
        })
    }

    /// Clears the busy flag after a failed preview or generation request.
    /// Step, selection and preview are left as they were.
    pub(crate) fn fail_request(&mut self, request_id: RequestId, message: String) -> bool {
        if !self.owns(request_id) {
            return false;
        }
        self.in_flight = None;
        self.last_error = Some(message);
        true
    }
}

use crater_logging::{crater_debug, crater_info, crater_warn};

use crate::{AppState, Effect, Msg, Rejection, RequestId, WorkflowState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Startup => vec![Effect::ResolveIdentity],
        Msg::IdentityResolved(identity) => {
            let signed_in = identity.is_some();
            state.set_identity(identity);
            if signed_in {
                vec![Effect::RefreshDocuments]
            } else {
                // Nothing is reachable without a session.
                state.close_workflow();
                state.set_documents(Vec::new());
                Vec::new()
            }
        }
        Msg::DocumentsLoaded(documents) => {
            state.set_documents(documents);
            Vec::new()
        }
        Msg::DocumentsLoadFailed(message) => {
            state.set_notice(format!("Could not load documents: {message}"));
            Vec::new()
        }
        Msg::WorkflowOpened => {
            if state.identity().is_none() {
                state.set_notice("Sign in to create content");
            } else if state.workflow().is_none() {
                state.open_workflow();
            }
            Vec::new()
        }
        Msg::MethodChosen(mode) => {
            apply(&mut state, "choose method", |wf| wf.choose_method(mode));
            Vec::new()
        }
        Msg::SourceToggled(id) => {
            // Unlisted ids may only be deselected, e.g. after a refresh dropped them.
            let listed = state.documents().iter().any(|doc| doc.id == id);
            let selected = state
                .workflow()
                .is_some_and(|wf| wf.selection().contains(&id));
            if listed || selected {
                apply(&mut state, "toggle source", |wf| wf.toggle_source(&id));
            } else if state.workflow().is_some() {
                crater_debug!("Ignoring toggle source: unknown document {}", id);
                state.set_notice(format!("Unknown document {id}"));
            }
            Vec::new()
        }
        Msg::BackToMethod => {
            apply(&mut state, "back to method", WorkflowState::back_to_method);
            Vec::new()
        }
        Msg::PreviewRequested => {
            let request_id = state.next_request_id();
            match apply(&mut state, "preview", |wf| wf.begin_preview(request_id)) {
                Some(request) => {
                    state.commit_request_id(request_id);
                    vec![Effect::RequestPreview {
                        request_id,
                        request,
                    }]
                }
                None => Vec::new(),
            }
        }
        Msg::PreviewSucceeded { request_id, result } => {
            let applied = state
                .workflow_mut()
                .is_some_and(|wf| wf.complete_preview(request_id, result));
            settle(&mut state, request_id, applied);
            Vec::new()
        }
        Msg::PreviewFailed {
            request_id,
            message,
        } => {
            let applied = state
                .workflow_mut()
                .is_some_and(|wf| wf.fail_request(request_id, message));
            settle(&mut state, request_id, applied);
            Vec::new()
        }
        Msg::BackToSelection => {
            apply(&mut state, "back to selection", WorkflowState::back_to_selection);
            Vec::new()
        }
        Msg::GenerateRequested => {
            let request_id = state.next_request_id();
            match apply(&mut state, "generate", |wf| wf.begin_generation(request_id)) {
                Some(request) => {
                    state.commit_request_id(request_id);
                    vec![Effect::RequestGeneration {
                        request_id,
                        request,
                    }]
                }
                None => Vec::new(),
            }
        }
        Msg::GenerateSucceeded { request_id } => {
            if state.workflow().is_some_and(|wf| wf.owns(request_id)) {
                crater_info!("Generation {} succeeded; closing workflow", request_id);
                state.close_workflow();
                vec![Effect::RefreshDocuments]
            } else {
                settle(&mut state, request_id, false);
                Vec::new()
            }
        }
        Msg::GenerateFailed {
            request_id,
            message,
        } => {
            let applied = state
                .workflow_mut()
                .is_some_and(|wf| wf.fail_request(request_id, message));
            settle(&mut state, request_id, applied);
            Vec::new()
        }
        Msg::WorkflowCancelled => {
            state.close_workflow();
            Vec::new()
        }
        Msg::UploadSubmitted {
            files,
            folder_path,
            tags,
        } => {
            if state.identity().is_none() {
                state.set_notice("Sign in to upload documents");
                return (state, Vec::new());
            }
            if files.is_empty() || state.upload().is_uploading() {
                return (state, Vec::new());
            }
            state.upload_mut().begin(files.len());
            vec![Effect::StartUpload {
                files,
                folder_path,
                tags,
            }]
        }
        Msg::UploadProgress {
            file_index,
            file_count,
            percent,
        } => {
            if state.upload().is_uploading() && file_count == state.upload().file_count() {
                state.upload_mut().record_progress(file_index, percent);
            }
            Vec::new()
        }
        Msg::UploadFinished { attempted, failed } => {
            if !state.upload().is_uploading() {
                return (state, Vec::new());
            }
            state.upload_mut().finish();
            if failed > 0 {
                state.set_notice(format!(
                    "Uploaded {} of {attempted} files",
                    attempted.saturating_sub(failed)
                ));
            } else {
                state.set_notice(format!("Uploaded {attempted} files"));
            }
            vec![Effect::RefreshDocuments]
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Runs a workflow transition, marking state dirty on success and logging
/// rejections. Without an open workflow every action is a no-op.
fn apply<T>(
    state: &mut AppState,
    action: &str,
    transition: impl FnOnce(&mut WorkflowState) -> Result<T, Rejection>,
) -> Option<T> {
    let Some(workflow) = state.workflow_mut() else {
        crater_debug!("Ignoring {}: no open workflow", action);
        return None;
    };
    match transition(workflow) {
        Ok(value) => {
            state.mark_dirty();
            Some(value)
        }
        Err(rejection) => {
            crater_debug!("Ignoring {}: {}", action, rejection);
            None
        }
    }
}

fn settle(state: &mut AppState, request_id: RequestId, applied: bool) {
    if applied {
        state.mark_dirty();
    } else {
        crater_warn!("Dropping stale response for request {}", request_id);
    }
}

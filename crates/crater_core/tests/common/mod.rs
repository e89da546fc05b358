#![allow(dead_code)]

use std::sync::Once;

use crater_core::{
    update, AppState, CreationMode, Document, DocumentStatus, Effect, Identity, Msg, RequestId,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(crater_logging::initialize_for_tests);
}

pub fn identity() -> Identity {
    Identity {
        user_id: "user-1".to_string(),
        email: "ada@example.com".to_string(),
        name: Some("Ada".to_string()),
    }
}

pub fn document(id: &str) -> Document {
    Document {
        id: id.to_string(),
        title: format!("{id}.pdf"),
        file_type: "pdf".to_string(),
        folder_path: None,
        tags: Vec::new(),
        status: DocumentStatus::Completed,
        created_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

/// Signed-in state with `doc-1`..`doc-3` listed.
pub fn signed_in() -> AppState {
    let (state, _) = update(AppState::new(), Msg::IdentityResolved(Some(identity())));
    let (state, _) = update(
        state,
        Msg::DocumentsLoaded(vec![document("doc-1"), document("doc-2"), document("doc-3")]),
    );
    state
}

/// Workflow open at source selection with `ids` toggled on.
pub fn selecting(ids: &[&str]) -> AppState {
    let (state, _) = update(signed_in(), Msg::WorkflowOpened);
    let (mut state, _) = update(state, Msg::MethodChosen(CreationMode::Example));
    for id in ids {
        state = update(state, Msg::SourceToggled(id.to_string())).0;
    }
    state
}

pub fn preview_request_id(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::RequestPreview { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("preview effect")
}

pub fn generation_request_id(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::RequestGeneration { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("generation effect")
}

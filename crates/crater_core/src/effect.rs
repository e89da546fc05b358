use std::path::PathBuf;

use crate::{GenerationRequest, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ResolveIdentity,
    RefreshDocuments,
    RequestPreview {
        request_id: RequestId,
        request: GenerationRequest,
    },
    RequestGeneration {
        request_id: RequestId,
        request: GenerationRequest,
    },
    StartUpload {
        files: Vec<PathBuf>,
        folder_path: Option<String>,
        tags: Vec<String>,
    },
}

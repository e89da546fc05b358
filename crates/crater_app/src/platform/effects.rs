use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crater_core::{Document, DocumentStatus, Effect, Identity, Msg, PreviewResult};
use crater_engine::{
    DocumentQuery, DocumentRecord, EngineError, EngineEvent, EngineHandle, GenerationPayload,
    IdentityRecord, PreviewResponse, RecordStatus, ServiceSettings, UploadBatch,
};
use crater_logging::{crater_error, crater_info, crater_warn};
use serde_json::Value;

use super::app::AppEvent;

/// Executes core effects on the engine and feeds engine results back as
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ServiceSettings, tx: mpsc::Sender<AppEvent>) -> Result<Self, EngineError> {
        crater_info!("Backend at {}", settings.base_url);
        let engine = EngineHandle::new(settings)
            .inspect_err(|err| crater_error!("Engine setup failed: {}", err))?;
        let runner = Self { engine };
        runner.spawn_event_loop(tx);
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ResolveIdentity => self.engine.resolve_identity(),
                Effect::RefreshDocuments => self.engine.list_documents(DocumentQuery::default()),
                Effect::RequestPreview {
                    request_id,
                    request,
                } => {
                    crater_info!(
                        "Preview #{} from {} sources",
                        request_id,
                        request.source_doc_ids.len()
                    );
                    self.engine.preview(
                        request_id,
                        GenerationPayload {
                            source_doc_ids: request.source_doc_ids,
                            custom_prompt: request.custom_prompt,
                        },
                    );
                }
                Effect::RequestGeneration {
                    request_id,
                    request,
                } => {
                    crater_info!(
                        "Generation #{} from {} sources",
                        request_id,
                        request.source_doc_ids.len()
                    );
                    self.engine.generate(
                        request_id,
                        GenerationPayload {
                            source_doc_ids: request.source_doc_ids,
                            custom_prompt: request.custom_prompt,
                        },
                    );
                }
                Effect::StartUpload {
                    files,
                    folder_path,
                    tags,
                } => self.engine.upload(UploadBatch {
                    files,
                    folder_path,
                    tags,
                }),
            }
        }
    }

    fn spawn_event_loop(&self, tx: mpsc::Sender<AppEvent>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
                continue;
            };
            if tx.send(AppEvent::Msg(event_to_msg(event))).is_err() {
                break;
            }
        });
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::IdentityResolved(Ok(identity)) => {
            Msg::IdentityResolved(identity.map(identity_from_record))
        }
        EngineEvent::IdentityResolved(Err(err)) => {
            // Without a confirmed session, behave as signed out.
            crater_warn!("Could not resolve session: {}", err);
            Msg::IdentityResolved(None)
        }
        EngineEvent::DocumentsListed(Ok(records)) => {
            Msg::DocumentsLoaded(records.into_iter().map(document_from_record).collect())
        }
        EngineEvent::DocumentsListed(Err(err)) => {
            crater_warn!("Document listing failed: {}", err);
            Msg::DocumentsLoadFailed(err.to_string())
        }
        EngineEvent::PreviewCompleted { request_id, result } => match result {
            Ok(response) => Msg::PreviewSucceeded {
                request_id,
                result: preview_from_response(response),
            },
            Err(err) => {
                crater_warn!("Preview #{} failed: {}", request_id, err);
                Msg::PreviewFailed {
                    request_id,
                    message: err.to_string(),
                }
            }
        },
        EngineEvent::GenerationCompleted { request_id, result } => match result {
            Ok(()) => Msg::GenerateSucceeded { request_id },
            Err(err) => {
                crater_warn!("Generation #{} failed: {}", request_id, err);
                Msg::GenerateFailed {
                    request_id,
                    message: err.to_string(),
                }
            }
        },
        EngineEvent::UploadProgress(progress) => Msg::UploadProgress {
            file_index: progress.file_index,
            file_count: progress.file_count,
            percent: progress.percent,
        },
        EngineEvent::UploadFinished(summary) => {
            for failure in &summary.failures {
                crater_warn!("Not uploaded: {} ({})", failure.path.display(), failure.error);
            }
            Msg::UploadFinished {
                attempted: summary.attempted,
                failed: summary.failures.len(),
            }
        }
    }
}

fn identity_from_record(record: IdentityRecord) -> Identity {
    Identity {
        user_id: record.id,
        email: record.email,
        name: record.name,
    }
}

fn document_from_record(record: DocumentRecord) -> Document {
    Document {
        id: record.id,
        title: record.title,
        file_type: record.file_type,
        folder_path: record.folder_path,
        tags: record.tags,
        status: map_status(record.status),
        created_at: record.created_at,
    }
}

fn map_status(status: RecordStatus) -> DocumentStatus {
    match status {
        RecordStatus::Completed => DocumentStatus::Completed,
        RecordStatus::Failed => DocumentStatus::Failed,
        RecordStatus::Uploading | RecordStatus::Processing | RecordStatus::Unknown => {
            DocumentStatus::Pending
        }
    }
}

fn preview_from_response(response: PreviewResponse) -> PreviewResult {
    PreviewResult {
        toc: response.toc.as_ref().map(toc_headings).unwrap_or_default(),
        style_guide: response
            .style_guide
            .as_ref()
            .map(style_entries)
            .unwrap_or_default(),
        example_snippet: response.example_snippet,
        estimated_tokens: response.estimated_tokens,
        source_citations: response.source_citations,
    }
}

/// Headings from `{"sections": [...]}` or a bare list. Sections may be plain
/// strings or objects carrying a `title`/`heading`.
fn toc_headings(toc: &Value) -> Vec<String> {
    let sections = match toc {
        Value::Object(map) => map.get("sections").and_then(Value::as_array),
        Value::Array(list) => Some(list),
        _ => None,
    };
    sections
        .into_iter()
        .flatten()
        .filter_map(|section| match section {
            Value::String(heading) => Some(heading.clone()),
            Value::Object(map) => ["title", "heading", "name"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(ToOwned::to_owned),
            _ => None,
        })
        .collect()
}

fn style_entries(style: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = style else {
        return Vec::new();
    };
    map.iter()
        .map(|(aspect, value)| {
            let value = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (aspect.clone(), value)
        })
        .collect()
}

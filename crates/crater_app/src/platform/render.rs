use std::fmt::Write;

use crater_core::{
    AppViewModel, CreationMode, DocumentRowView, DocumentStatus, UploadView, WorkflowStep,
    WorkflowView,
};

/// Renders the whole view model as plain text, one block per concern.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    match &view.signed_in_as {
        Some(name) => {
            let _ = writeln!(out, "Signed in as {} | Documents: {}", name, view.documents.len());
        }
        None => out.push_str("Signed out\n"),
    }
    for row in &view.documents {
        let _ = writeln!(out, "  {}", format_document_row(row));
    }

    if let Some(workflow) = &view.workflow {
        out.push_str(&render_workflow(workflow));
    }
    if let Some(line) = format_upload(&view.upload) {
        let _ = writeln!(out, "{line}");
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "* {notice}");
    }
    out
}

fn format_document_row(row: &DocumentRowView) -> String {
    let mark = if row.selected { "[x]" } else { "[ ]" };
    let folder = row
        .folder_path
        .as_deref()
        .map(|folder| format!(" in {folder}"))
        .unwrap_or_default();
    format!(
        "{mark} {id}  {title} ({file_type}){folder}  {status}",
        id = row.id,
        title = row.title,
        file_type = row.file_type,
        status = status_label(row.status),
    )
}

fn status_label(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Pending => "Pending",
        DocumentStatus::Completed => "Ready",
        DocumentStatus::Failed => "Failed",
    }
}

fn render_workflow(workflow: &WorkflowView) -> String {
    let mut out = String::new();
    let mode = match workflow.mode {
        Some(CreationMode::Example) => " | Mode: example",
        Some(CreationMode::Template) => " | Mode: template",
        None => "",
    };
    let busy = if workflow.busy { " | Working..." } else { "" };
    let _ = writeln!(
        out,
        "Create content: {}{} | Selected: {}{}",
        step_label(workflow.step),
        mode,
        workflow.selected.len(),
        busy
    );

    if workflow.step == WorkflowStep::Preview {
        if let Some(preview) = &workflow.preview {
            if !preview.toc.is_empty() {
                out.push_str("  Outline:\n");
                for (number, heading) in preview.toc.iter().enumerate() {
                    let _ = writeln!(out, "    {}. {heading}", number + 1);
                }
            }
            if !preview.style_guide.is_empty() {
                let style: Vec<String> = preview
                    .style_guide
                    .iter()
                    .map(|(aspect, value)| format!("{aspect}: {value}"))
                    .collect();
                let _ = writeln!(out, "  Style: {}", style.join(", "));
            }
            if let Some(tokens) = preview.estimated_tokens {
                let _ = writeln!(out, "  Estimated tokens: {tokens}");
            }
            if let Some(snippet) = &preview.example_snippet {
                for line in snippet.lines() {
                    let _ = writeln!(out, "  > {line}");
                }
            }
            if !preview.source_citations.is_empty() {
                let _ = writeln!(out, "  Sources: {}", preview.source_citations.join(", "));
            }
        }
    }
    if let Some(error) = &workflow.last_error {
        let _ = writeln!(out, "  Error: {error}");
    }
    out
}

fn step_label(step: WorkflowStep) -> &'static str {
    match step {
        WorkflowStep::ChooseMethod => "choose a method",
        WorkflowStep::SelectSources => "select sources",
        WorkflowStep::Preview => "preview",
    }
}

fn format_upload(upload: &UploadView) -> Option<String> {
    if !upload.uploading {
        return None;
    }
    let filled = usize::from(upload.progress.min(100)) / 5;
    Some(format!(
        "Uploading file {} of {} [{}{}] {}%",
        upload.file_number,
        upload.file_count,
        "#".repeat(filled),
        "-".repeat(20 - filled),
        upload.progress
    ))
}

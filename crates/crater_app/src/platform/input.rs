use std::path::PathBuf;

use crater_core::{CreationMode, Msg, WorkflowStep};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  open                      start creating content
  mode example|template     choose how the content is shaped
  toggle <doc-id>           add or remove a source document
  preview                   request a preview of the selected sources
  back                      go back one step
  generate                  generate the document
  cancel                    close the workflow
  upload [--folder <path>] [--tags a,b] <file>...
                            upload files to the knowledge base
  refresh                   re-check the session and reload documents
  list                      show the current state
  help                      show this help
  quit                      exit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msg(Msg),
    /// Resolved against the current step by [`back_msg`].
    Back,
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parses a line; `Ok(None)` for blank input.
pub fn parse(line: &str) -> Result<Option<Command>, InputError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "open" | "create" => Command::Msg(Msg::WorkflowOpened),
        "mode" => match rest.as_slice() {
            [mode] if mode.eq_ignore_ascii_case("example") => {
                Command::Msg(Msg::MethodChosen(CreationMode::Example))
            }
            [mode] if mode.eq_ignore_ascii_case("template") => {
                Command::Msg(Msg::MethodChosen(CreationMode::Template))
            }
            _ => return Err(InputError::Usage("mode example|template")),
        },
        "toggle" => match rest.as_slice() {
            [id] => Command::Msg(Msg::SourceToggled(id.to_string())),
            _ => return Err(InputError::Usage("toggle <doc-id>")),
        },
        "preview" => Command::Msg(Msg::PreviewRequested),
        "back" => Command::Back,
        "generate" => Command::Msg(Msg::GenerateRequested),
        "cancel" | "close" => Command::Msg(Msg::WorkflowCancelled),
        "upload" => parse_upload(&rest)?,
        "refresh" => Command::Msg(Msg::Startup),
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

const UPLOAD_USAGE: &str = "upload [--folder <path>] [--tags a,b] <file>...";

fn parse_upload(args: &[&str]) -> Result<Command, InputError> {
    let mut files = Vec::new();
    let mut folder_path = None;
    let mut tags = Vec::new();

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match *arg {
            "--folder" => {
                let folder = args.next().ok_or(InputError::Usage(UPLOAD_USAGE))?;
                folder_path = Some(folder.to_string());
            }
            "--tags" => {
                let list = args.next().ok_or(InputError::Usage(UPLOAD_USAGE))?;
                tags = list
                    .split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(ToOwned::to_owned)
                    .collect();
            }
            file => files.push(PathBuf::from(file)),
        }
    }
    if files.is_empty() {
        return Err(InputError::Usage(UPLOAD_USAGE));
    }

    Ok(Command::Msg(Msg::UploadSubmitted {
        files,
        folder_path,
        tags,
    }))
}

/// `back` leaves the preview for source selection, or source selection for
/// the method choice.
pub fn back_msg(step: Option<WorkflowStep>) -> Option<Msg> {
    match step? {
        WorkflowStep::Preview => Some(Msg::BackToSelection),
        WorkflowStep::SelectSources => Some(Msg::BackToMethod),
        WorkflowStep::ChooseMethod => None,
    }
}

//! Property dispatch: serves a resolved request against the registry.

use std::path::Path;
use std::sync::Arc;

use scriptpad_core::{Document, Location};
use scriptpad_protocol::{
    CaretPosition, Command, DocumentInfo, FileRef, ModifiedState, Payload, Reply, Request,
    ScrollPosition, SelectionRange, Specifier, VisibleLines,
};
use serde_json::Value;

use crate::error::ScriptError;
use crate::property::Property;
use crate::registry::{Editor, Registry};
use crate::resolver::{resolve, ObjectSelector, Target};

type Outcome = Result<Option<Payload>, ScriptError>;

/// Answers requests against a shared registry.
#[derive(Debug, Clone)]
pub struct Service {
    registry: Arc<Registry>,
}

impl Service {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Serves one request. Always produces exactly one reply.
    pub fn handle(&self, request: &Request) -> Reply {
        tracing::debug!("{} {:?}", request.command, request.specifiers);
        let outcome = resolve(request).and_then(|target| self.dispatch(request, &target));
        match outcome {
            Ok(Some(payload)) => Reply::success(payload),
            Ok(None) => Reply::empty(),
            Err(err) => {
                if let ScriptError::Internal(message) = &err {
                    tracing::warn!("{} {:?} failed: {message}", request.command, request.specifiers);
                } else {
                    tracing::debug!("{} {:?} rejected: {err}", request.command, request.specifiers);
                }
                err.into_reply()
            }
        }
    }

    fn dispatch(&self, request: &Request, target: &Target<'_>) -> Outcome {
        if target.object == ObjectSelector::Application {
            return self.dispatch_application(request.command, target);
        }
        let shared = self.registry.lookup(target.object)?;
        let mut editor = shared.lock()?;
        dispatch_editor(&mut editor, request, target)
    }

    fn dispatch_application(&self, command: Command, target: &Target<'_>) -> Outcome {
        match (target.property, command) {
            (Property::Editor, Command::Count) => Ok(Some(count_payload(self.registry.count()?))),
            (Property::Editor, Command::Create) => {
                let name = target
                    .specifier
                    .name
                    .as_deref()
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| ScriptError::bad_value("Editor create needs a name (file path)"))?;
                let index = match self.registry.open(Path::new(name)) {
                    Ok(index) => index as i64,
                    Err(e) => {
                        tracing::warn!("Failed to open {name}: {e:#}");
                        -1
                    }
                };
                Ok(Some(Payload::Int(index)))
            }
            (Property::Suites, Command::Get) => Ok(Some(Payload::List(Property::suites()))),
            (property, command) => Err(ScriptError::not_understood(format!(
                "{property} does not support {command}"
            ))),
        }
    }
}

fn dispatch_editor(editor: &mut Editor, request: &Request, target: &Target<'_>) -> Outcome {
    let spec = target.specifier;
    let doc = &mut editor.document;
    match (target.property, request.command) {
        (Property::Symbol, Command::Get) => Ok(Some(Payload::Text(doc.symbol()))),

        (Property::Selection, Command::Get) => text_payload(doc.selected_text()),
        (Property::Selection, Command::Set) => {
            let start = required_offset(spec.index, "Selection start")?;
            let length = optional_offset(spec.range, "Selection length")?.unwrap_or(0);
            doc.set_selection(start, length).map_err(document_error)?;
            Ok(None)
        }
        (Property::SelectionRange, Command::Get) => {
            let (start, end) = doc.selection_range().map_err(document_error)?;
            Ok(Some(Payload::Selection(SelectionRange {
                start: caret_payload(start),
                end: caret_payload(end),
            })))
        }
        (Property::CaretPosition, Command::Get) => {
            let caret = doc.caret_position().map_err(document_error)?;
            Ok(Some(Payload::Caret(caret_payload(caret))))
        }

        (Property::Line, Command::Get) => {
            let line = required_offset(spec.index, "Line index")?;
            text_payload(doc.line_text(line))
        }
        (Property::Line, Command::Set) => {
            let line = required_offset(spec.index, "Line index")?;
            let text = string_data(request.data.as_ref())?;
            doc.set_line(line, text).map_err(document_error)?;
            Ok(None)
        }
        (Property::Line, Command::Count) => Ok(Some(count_payload(doc.line_count()))),

        (Property::Text, Command::Get) => {
            let start = optional_offset(spec.index, "Text offset")?.unwrap_or(0);
            let length = match optional_offset(spec.range, "Text length")? {
                Some(length) => length,
                None => doc.info().text_length.saturating_sub(start),
            };
            text_payload(doc.text(start, length))
        }
        (Property::Text, Command::Set) => {
            let text = string_data(request.data.as_ref())?;
            set_text(doc, spec, text)?;
            Ok(None)
        }

        (Property::Ref, Command::Get) => {
            let path = doc
                .file_path
                .as_deref()
                .ok_or_else(|| ScriptError::not_found("editor has no file"))?;
            Ok(Some(Payload::Ref(FileRef {
                path: path.to_string_lossy().into_owned(),
            })))
        }

        (Property::Undo, Command::Execute) => {
            doc.undo().map_err(document_error)?;
            Ok(None)
        }
        (Property::Redo, Command::Execute) => {
            doc.redo().map_err(document_error)?;
            Ok(None)
        }
        (Property::Save, Command::Execute) => {
            if doc.file_path.is_none() {
                return Err(ScriptError::not_found("editor has no file to save to"));
            }
            doc.save().map_err(|e| ScriptError::Internal(format!("{e:#}")))?;
            Ok(None)
        }

        (Property::VisibleLines, Command::Get) => {
            let visible = doc.visible_lines();
            Ok(Some(Payload::Visible(VisibleLines {
                first_line: visible.first_line,
                last_line: visible.last_line,
            })))
        }
        (Property::ScrollPosition, Command::Get) => {
            let scroll = doc.scroll_position();
            Ok(Some(Payload::Scroll(ScrollPosition {
                x_offset: scroll.x_offset,
                first_visible_line: scroll.first_visible_line,
            })))
        }
        (Property::ScrollPosition, Command::Set) => {
            let line = int_data(request.data.as_ref())?;
            doc.scroll_to_line(usize::try_from(line.max(1)).unwrap_or(usize::MAX));
            Ok(None)
        }

        (Property::Modified, Command::Get) => {
            let state = doc.history_state();
            Ok(Some(Payload::Modified(ModifiedState {
                modified: state.modified,
                can_undo: state.can_undo,
                can_redo: state.can_redo,
            })))
        }
        (Property::DocumentInfo, Command::Get) => {
            let info = doc.info();
            Ok(Some(Payload::Info(DocumentInfo {
                length: info.length,
                line_count: info.line_count,
                text_length: info.text_length,
            })))
        }

        (property, command) => Err(ScriptError::not_understood(format!(
            "{property} does not support {command}"
        ))),
    }
}

/// Append with no index (or -1), insert with an index, replace with index and range.
fn set_text(doc: &mut Document, spec: &Specifier, text: &str) -> Result<(), ScriptError> {
    match (spec.index, spec.range) {
        (None | Some(-1), None) => doc.append_text(text),
        (Some(index), None) => {
            let offset = required_offset(Some(index), "Text offset")?;
            doc.insert_text(offset, text)
        }
        (index, Some(range)) => {
            let offset = required_offset(index, "Text offset")?;
            let length = required_offset(Some(range), "Text length")?;
            doc.replace_range(offset, length, text)
        }
    }
    .map_err(document_error)
}

fn document_error(err: anyhow::Error) -> ScriptError {
    ScriptError::from_document(&err)
}

fn text_payload(result: anyhow::Result<String>) -> Outcome {
    result.map(|s| Some(Payload::Text(s))).map_err(document_error)
}

fn count_payload(count: usize) -> Payload {
    Payload::Int(i64::try_from(count).unwrap_or(i64::MAX))
}

fn caret_payload(location: Location) -> CaretPosition {
    CaretPosition {
        line: location.position.line + 1,
        column: location.position.col + 1,
        offset: location.offset,
    }
}

fn optional_offset(value: Option<i64>, what: &str) -> Result<Option<usize>, ScriptError> {
    value
        .map(|v| usize::try_from(v).map_err(|_| ScriptError::OutOfRange(format!("{what} {v} is negative"))))
        .transpose()
}

fn required_offset(value: Option<i64>, what: &str) -> Result<usize, ScriptError> {
    optional_offset(value, what)?.ok_or_else(|| ScriptError::bad_value(format!("{what} is required")))
}

fn string_data(data: Option<&Value>) -> Result<&str, ScriptError> {
    match data {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(ScriptError::bad_value(format!("data must be a string, got {other}"))),
        None => Err(ScriptError::bad_value("data is required")),
    }
}

fn int_data(data: Option<&Value>) -> Result<i64, ScriptError> {
    match data {
        Some(value) => value
            .as_i64()
            .ok_or_else(|| ScriptError::bad_value(format!("data must be an integer, got {value}"))),
        None => Err(ScriptError::bad_value("data is required")),
    }
}

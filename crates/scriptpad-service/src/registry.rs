//! Registry of open editors and the selected-editor handle.
//!
//! The editor list sits behind an `RwLock`; each editor has its own `Mutex`
//! so requests for different editors never wait on each other.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use anyhow::Result;
use scriptpad_core::{Document, DocumentOptions};

use crate::error::ScriptError;
use crate::resolver::ObjectSelector;

/// Stable identity of an editor for the lifetime of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorId(u64);

impl std::fmt::Display for EditorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "editor#{}", self.0)
    }
}

/// One open document.
#[derive(Debug)]
pub struct Editor {
    pub id: EditorId,
    pub document: Document,
}

pub type SharedEditor = Arc<Mutex<Editor>>;

#[derive(Default)]
struct Entries {
    editors: Vec<(EditorId, SharedEditor)>,
    selected: Option<EditorId>,
    next_id: u64,
}

/// Owns every open editor.
pub struct Registry {
    entries: RwLock<Entries>,
    options: DocumentOptions,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DocumentOptions::default())
    }
}

impl Registry {
    pub fn new(options: DocumentOptions) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            options,
        }
    }

    /// Opens `path` in a new editor, selects it, and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or the
    /// registry lock is poisoned.
    pub fn open(&self, path: &Path) -> Result<usize> {
        let path = absolute(path);
        let document = Document::open(&path, &self.options)?;
        Ok(self.insert(document)?)
    }

    /// Adds a document as a new editor, selects it, and returns its index.
    ///
    /// # Errors
    ///
    /// `Internal` if the registry lock is poisoned.
    pub fn insert(&self, document: Document) -> Result<usize, ScriptError> {
        let mut entries = self.entries.write()?;
        let id = EditorId(entries.next_id);
        entries.next_id += 1;
        let editor = Editor { id, document };
        entries.editors.push((id, Arc::new(Mutex::new(editor))));
        entries.selected = Some(id);
        let index = entries.editors.len() - 1;
        tracing::info!("Registered {id} at index {index}");
        Ok(index)
    }

    /// Number of open editors.
    ///
    /// # Errors
    ///
    /// `Internal` if the registry lock is poisoned.
    pub fn count(&self) -> Result<usize, ScriptError> {
        Ok(self.entries.read()?.editors.len())
    }

    /// Looks up the editor an object selector addresses.
    ///
    /// # Errors
    ///
    /// `NotFound` if there is no selected editor or no editor at the index;
    /// `Internal` for the application selector or a poisoned lock.
    pub fn lookup(&self, selector: ObjectSelector) -> Result<SharedEditor, ScriptError> {
        let entries = self.entries.read()?;
        match selector {
            ObjectSelector::SelectedEditor => {
                let id = entries
                    .selected
                    .ok_or_else(|| ScriptError::not_found("no editor is selected"))?;
                entries
                    .editors
                    .iter()
                    .find(|(eid, _)| *eid == id)
                    .map(|(_, editor)| Arc::clone(editor))
                    .ok_or_else(|| ScriptError::not_found(format!("{id} is no longer open")))
            }
            ObjectSelector::Editor(index) => entries
                .editors
                .get(index)
                .map(|(_, editor)| Arc::clone(editor))
                .ok_or_else(|| ScriptError::not_found(format!("no editor at index {index}"))),
            ObjectSelector::Application => Err(ScriptError::Internal(
                "application selector does not address an editor".to_string(),
            )),
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

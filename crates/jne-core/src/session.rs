use serde_json::Value;

use crate::fields::{FieldRow, normalize_rows};
use crate::merge::merge_update;
use crate::path::Segment;

/// The currently selected node, as supplied by the selection collaborator:
/// its flattened fields and its path from the document root.
#[derive(Debug, Clone)]
pub struct NodeSelection {
    pub fields: Vec<FieldRow>,
    pub path: Vec<Segment>,
}

/// Holder of the authoritative document text between edits. The core reads
/// and writes through this seam and keeps no document state of its own.
pub trait DocumentStore {
    fn document_text(&self) -> String;
    fn set_document_text(&mut self, text: String);
}

/// Durable record of a committed edit. `has_changes` marks the document
/// dirty for state-tracking collaborators; `skip_update` asks view-refreshing
/// collaborators not to reload from the new contents.
#[derive(Debug, Clone)]
pub struct PersistedUpdate {
    pub contents: String,
    pub has_changes: bool,
    pub skip_update: bool,
}

pub trait PersistSink {
    fn persist(&mut self, update: &PersistedUpdate) -> Result<(), String>;
}

/// Seed the editable text for a freshly selected node.
pub fn begin_edit(selection: &NodeSelection) -> String {
    normalize_rows(&selection.fields)
}

/// Merge edited text back into the stored document and commit the result.
///
/// The merged text is re-parsed before anything is touched; on failure the
/// store and sink are left as they were and the error is returned for the
/// caller to surface. A failed save can never corrupt the stored document.
pub fn save_edit(
    path: &[Segment],
    edited_text: &str,
    store: &mut dyn DocumentStore,
    sink: &mut dyn PersistSink,
) -> Result<(), String> {
    let current = store.document_text();
    let merged = merge_update(&current, path, edited_text);
    serde_json::from_str::<Value>(&merged).map_err(|e| e.to_string())?;
    store.set_document_text(merged.clone());
    sink.persist(&PersistedUpdate {
        contents: merged,
        has_changes: true,
        skip_update: false,
    })
}

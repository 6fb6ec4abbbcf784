//! jne-core: node-level editing of JSON documents
//!
//! This crate focuses on a small, well-factored surface:
//! - Path selectors with a `$["a"][0]` display form and slash-pointer parsing
//! - Flat field projection of one node and its editable text form
//! - Field-level merge of edited text back into the document, creating
//!   missing containers along the path
//! - Edit-session orchestration over document-store/persist collaborators,
//!   plus file-backed stores and zip backup
//!
pub mod fields;
pub mod merge;
pub mod path;
pub mod session;
pub mod store;

// Re-export the node editing API
pub use fields::{FieldKind, FieldRow, FieldScalar, field_rows_at, flatten, normalize_rows};
pub use merge::{merge_update, parse_edited};
pub use path::{Segment, format_path, parse_pointer, value_at};
pub use session::{
    DocumentStore, NodeSelection, PersistSink, PersistedUpdate, begin_edit, save_edit,
};
pub use store::{
    FileStore, MemoryStore, dir_documents, find_json_files, load_document, load_document_text,
    zip_backup_dir, zip_backup_file,
};

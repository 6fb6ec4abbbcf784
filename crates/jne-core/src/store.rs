use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::FileOptions;

use crate::session::{DocumentStore, PersistSink, PersistedUpdate};

/// In-memory document store for callers that hold the text themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    text: String,
}

impl MemoryStore {
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

impl DocumentStore for MemoryStore {
    fn document_text(&self) -> String {
        self.text.clone()
    }
    fn set_document_text(&mut self, text: String) {
        self.text = text;
    }
}

/// Persist sink writing committed documents to a file, optionally
/// zip-archiving the previous contents first. The dirty/refresh flags on the
/// update are advisory for view collaborators and are ignored here.
pub struct FileStore {
    path: PathBuf,
    backup_on_save: bool,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            backup_on_save: false,
        }
    }

    pub fn with_backup(path: PathBuf) -> Self {
        Self {
            path,
            backup_on_save: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistSink for FileStore {
    fn persist(&mut self, update: &PersistedUpdate) -> Result<(), String> {
        if self.backup_on_save && self.path.is_file() {
            zip_backup_file(&self.path).map_err(|e| e.to_string())?;
        }
        fs::write(&self.path, &update.contents).map_err(|e| e.to_string())
    }
}

/// Read a document file as text, validating that it parses as JSON.
pub fn load_document_text(path: &Path) -> Result<String, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str::<Value>(&text).map_err(|e| e.to_string())?;
    Ok(text)
}

pub fn load_document(path: &Path) -> Result<Value, String> {
    let data = fs::read(path).map_err(|e| e.to_string())?;
    serde_json::from_slice(&data).map_err(|e| e.to_string())
}

// Directory helpers
pub fn find_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Ok(rd) = fs::read_dir(dir) {
        for entry in rd.flatten() {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
                out.push(p);
            }
        }
    }
    out.sort();
    out
}

/// Collect every JSON document in a directory into one filename-keyed map.
/// Files that fail to parse are reported inline under an `$error` key.
pub fn dir_documents(dir: &Path) -> Value {
    let mut map = Map::new();
    for f in find_json_files(dir) {
        let name = f
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("file")
            .to_string();
        match load_document(&f) {
            Ok(v) => {
                map.insert(name, v);
            }
            Err(e) => {
                map.insert(name, json!({ "$error": e }));
            }
        }
    }
    Value::Object(map)
}

/// Timestamped zip archive of a single document, written next to it
/// (non-destructive).
pub fn zip_backup_file(path: &Path) -> io::Result<PathBuf> {
    if !path.is_file() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a file"));
    }
    let parent = path.parent().unwrap_or(Path::new("."));
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let dest = parent.join(format!("{}_{}.zip", stem, ts));

    let file = fs::File::create(&dest)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document.json");
    zip.start_file(name, options)?;
    let data = fs::read(path)?;
    zip.write_all(&data)?;
    zip.finish()?;
    Ok(dest)
}

/// Timestamped zip archive of a whole documents directory (non-destructive).
pub fn zip_backup_dir(dir: &Path) -> io::Result<PathBuf> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a directory",
        ));
    }
    let parent = dir.parent().unwrap_or(Path::new("."));
    let name = dir.file_name().and_then(|s| s.to_str()).unwrap_or("docs");
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let dest = parent.join(format!("{}_{}.zip", name, ts));

    let file = fs::File::create(&dest)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| io::Error::other(e.to_string()))?;
        let path = entry.path();
        let rel = match path.strip_prefix(dir) {
            Ok(r) => r,
            Err(_) => continue,
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let name = rel.to_string_lossy().replace('\\', "/");
        if path.is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name, options)?;
            let data = fs::read(path)?;
            zip.write_all(&data)?;
        }
    }
    zip.finish()?;
    Ok(dest)
}

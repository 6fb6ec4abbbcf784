use serde_json::{Map, Value};

use crate::path::Segment;

/// Parse user-edited text. Valid JSON is taken as-is; anything else becomes
/// a raw string value. Malformed input is a fallback semantic, not an error:
/// the editor cannot tell a bare scalar from broken JSON.
pub fn parse_edited(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

// One resolution step. The cursor is coerced to the container kind the
// selector needs (a non-container value occupying the slot is displaced),
// missing object keys are created as null placeholders, and array writes
// past the end pad with nulls. Resolution never fails.
fn child_slot<'a>(cur: &'a mut Value, seg: &Segment) -> &'a mut Value {
    match seg {
        Segment::Key(k) => {
            if !matches!(cur, Value::Object(_)) {
                *cur = Value::Object(Map::new());
            }
            match cur {
                Value::Object(map) => map.entry(k.clone()).or_insert(Value::Null),
                _ => unreachable!(),
            }
        }
        Segment::Index(i) => {
            if !matches!(cur, Value::Array(_)) {
                *cur = Value::Array(Vec::new());
            }
            match cur {
                Value::Array(items) => {
                    if *i >= items.len() {
                        items.resize(i + 1, Value::Null);
                    }
                    &mut items[*i]
                }
                _ => unreachable!(),
            }
        }
    }
}

// Merge-not-replace applies only when both the slot and the edit are
// objects: edited keys with scalar values overwrite, and nested containers
// already at the slot survive even when absent from the edit. Every other
// pairing replaces the slot wholesale.
fn merge_slot(existing: Value, edited: Value) -> Value {
    match (existing, edited) {
        (Value::Object(mut merged), Value::Object(fields)) => {
            for (k, v) in fields {
                if !matches!(v, Value::Object(_) | Value::Array(_)) {
                    merged.insert(k, v);
                }
            }
            Value::Object(merged)
        }
        (_, edited) => edited,
    }
}

/// Splice edited text into the document at `path` and return the updated
/// document text, 2-space indented.
///
/// A document that does not parse comes back unchanged. The empty path
/// replaces the whole tree with the edited value. Missing path segments are
/// created rather than rejected, so a stale selection still lands somewhere.
pub fn merge_update(document_text: &str, path: &[Segment], edited_text: &str) -> String {
    let mut root: Value = match serde_json::from_str(document_text) {
        Ok(v) => v,
        Err(_) => return document_text.to_string(),
    };
    let edited = parse_edited(edited_text);
    if path.is_empty() {
        root = edited;
    } else {
        let mut cur = &mut root;
        for seg in path {
            cur = child_slot(cur, seg);
        }
        let existing = std::mem::take(cur);
        *cur = merge_slot(existing, edited);
    }
    serde_json::to_string_pretty(&root).unwrap_or_else(|_| document_text.to_string())
}

use std::fmt;

use serde_json::{Map, Value};

use crate::path::{Segment, format_path, value_at};

/// Scalar payload of one flattened field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldScalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
}

impl From<&FieldScalar> for Value {
    fn from(v: &FieldScalar) -> Self {
        match v {
            FieldScalar::Int(n) => Value::Number((*n).into()),
            FieldScalar::Bool(b) => Value::Bool(*b),
            FieldScalar::Str(s) => Value::String(s.clone()),
            FieldScalar::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldScalar::Null => Value::Null,
        }
    }
}

// Bare text form as shown in a single-value editor: strings unquoted.
impl fmt::Display for FieldScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldScalar::Int(n) => write!(f, "{}", n),
            FieldScalar::Float(x) => write!(f, "{}", x),
            FieldScalar::Bool(b) => write!(f, "{}", b),
            FieldScalar::Str(s) => f.write_str(s),
            FieldScalar::Null => f.write_str("null"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

fn kind_of(v: &Value) -> FieldKind {
    match v {
        Value::Null => FieldKind::Null,
        Value::Bool(_) => FieldKind::Bool,
        Value::Number(_) => FieldKind::Number,
        Value::String(_) => FieldKind::String,
        Value::Array(_) => FieldKind::Array,
        Value::Object(_) => FieldKind::Object,
    }
}

/// One direct child of a node, flattened to a key/value/kind triple.
///
/// Array- and object-kinded rows are structural markers: their nested content
/// lives in the document, `value` is `Null`, and `len` carries the child
/// count for display. Rows keep the insertion order of the source node.
#[derive(Debug, Clone)]
pub struct FieldRow {
    pub key: Option<String>,
    pub value: FieldScalar,
    pub kind: FieldKind,
    pub len: Option<usize>,
}

fn scalar_of(v: &Value) -> Option<FieldScalar> {
    match v {
        Value::Null => Some(FieldScalar::Null),
        Value::Bool(b) => Some(FieldScalar::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(FieldScalar::Int(i))
            } else {
                n.as_f64().map(FieldScalar::Float)
            }
        }
        Value::String(s) => Some(FieldScalar::Str(s.clone())),
        _ => None,
    }
}

fn row_for(key: Option<String>, v: &Value) -> FieldRow {
    let len = match v {
        Value::Array(a) => Some(a.len()),
        Value::Object(m) => Some(m.len()),
        _ => None,
    };
    FieldRow {
        key,
        value: scalar_of(v).unwrap_or(FieldScalar::Null),
        kind: kind_of(v),
        len,
    }
}

/// Flatten the direct children of `node` into field rows, in document order.
/// Objects yield keyed rows, arrays yield unkeyed element rows, and a scalar
/// node yields a single unkeyed row.
pub fn flatten(node: &Value) -> Vec<FieldRow> {
    match node {
        Value::Object(map) => map.iter().map(|(k, v)| row_for(Some(k.clone()), v)).collect(),
        Value::Array(items) => items.iter().map(|v| row_for(None, v)).collect(),
        other => vec![row_for(None, other)],
    }
}

/// Field rows of the node at `path`, or an error if the path does not exist.
pub fn field_rows_at(root: &Value, path: &[Segment]) -> Result<Vec<FieldRow>, String> {
    let node =
        value_at(root, path).ok_or_else(|| format!("path not found: {}", format_path(path)))?;
    Ok(flatten(node))
}

/// Render rows as editable text.
///
/// No rows give `{}`, a single unkeyed row gives the bare scalar text, and
/// anything else gives an indented object of the scalar fields. Container
/// rows carry no editable value here; the surrounding view shows their
/// content as separate nodes, so they are skipped, as are unkeyed rows.
pub fn normalize_rows(rows: &[FieldRow]) -> String {
    if rows.is_empty() {
        return "{}".to_string();
    }
    if rows.len() == 1 && rows[0].key.is_none() {
        return rows[0].value.to_string();
    }
    let mut map = Map::new();
    for row in rows {
        if matches!(row.kind, FieldKind::Array | FieldKind::Object) {
            continue;
        }
        if let Some(k) = &row.key {
            map.insert(k.clone(), Value::from(&row.value));
        }
    }
    serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_else(|_| "{}".to_string())
}

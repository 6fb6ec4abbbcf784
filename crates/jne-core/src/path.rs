use std::fmt::Write as _;

use serde_json::Value;

/// One selector in a node path: an object key or an array index, root to
/// target. The empty slice addresses the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl From<&str> for Segment {
    fn from(s: &str) -> Self {
        Segment::Key(s.to_string())
    }
}

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Segment::Index(i)
    }
}

/// Render a path in the display notation shown above a node: `$["a"][0]`.
/// The empty path is the document root, `$`.
pub fn format_path(path: &[Segment]) -> String {
    let mut out = String::from("$");
    for seg in path {
        match seg {
            Segment::Key(k) => {
                write!(&mut out, "[\"{}\"]", k).ok();
            }
            Segment::Index(i) => {
                write!(&mut out, "[{}]", i).ok();
            }
        }
    }
    out
}

/// Parse slash-pointer notation (`/customer/0/id`) into path segments.
/// All-digit tokens address array indices; `~1` and `~0` unescape to `/`
/// and `~`. The empty string and `/` both address the root.
pub fn parse_pointer(s: &str) -> Result<Vec<Segment>, String> {
    if s.is_empty() || s == "/" {
        return Ok(Vec::new());
    }
    let Some(rest) = s.strip_prefix('/') else {
        return Err(format!("pointer must start with '/': {}", s));
    };
    let mut out = Vec::new();
    for tok in rest.split('/') {
        if !tok.is_empty() && tok.bytes().all(|b| b.is_ascii_digit()) {
            match tok.parse::<usize>() {
                Ok(i) => out.push(Segment::Index(i)),
                Err(_) => out.push(Segment::Key(unescape_token(tok))),
            }
        } else {
            out.push(Segment::Key(unescape_token(tok)));
        }
    }
    Ok(out)
}

fn unescape_token(tok: &str) -> String {
    let s = tok.replace("~1", "/");
    s.replace("~0", "~")
}

/// Read-only lookup of the node at `path`. No containers are created.
pub fn value_at<'a>(root: &'a Value, path: &[Segment]) -> Option<&'a Value> {
    let mut cur = root;
    for seg in path {
        cur = match seg {
            Segment::Key(k) => cur.as_object()?.get(k)?,
            Segment::Index(i) => cur.as_array()?.get(*i)?,
        };
    }
    Some(cur)
}

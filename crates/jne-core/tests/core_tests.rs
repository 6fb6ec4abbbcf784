use jne_core::{
    DocumentStore as _, FieldKind, FieldRow, FieldScalar, Segment, field_rows_at, flatten,
    format_path, merge_update, normalize_rows, parse_edited, parse_pointer, value_at,
};
use serde_json::json;

fn key(k: &str) -> Segment {
    Segment::Key(k.to_string())
}

#[test]
fn format_path_display_notation() {
    assert_eq!(format_path(&[]), "$");
    let path = [key("customer"), Segment::Index(0), key("id")];
    assert_eq!(format_path(&path), "$[\"customer\"][0][\"id\"]");
}

#[test]
fn normalize_empty_rows_is_empty_object() {
    assert_eq!(normalize_rows(&[]), "{}");
}

#[test]
fn normalize_single_unkeyed_row_is_bare_scalar() {
    let rows = [FieldRow {
        key: None,
        value: FieldScalar::Str("hello".to_string()),
        kind: FieldKind::String,
        len: None,
    }];
    assert_eq!(normalize_rows(&rows), "hello");

    let rows = [FieldRow {
        key: None,
        value: FieldScalar::Int(42),
        kind: FieldKind::Number,
        len: None,
    }];
    assert_eq!(normalize_rows(&rows), "42");
}

#[test]
fn normalize_keyed_rows_skips_containers() {
    let rows = [
        FieldRow {
            key: Some("a".to_string()),
            value: FieldScalar::Int(1),
            kind: FieldKind::Number,
            len: None,
        },
        FieldRow {
            key: Some("nested".to_string()),
            value: FieldScalar::Null,
            kind: FieldKind::Object,
            len: Some(2),
        },
        FieldRow {
            key: Some("b".to_string()),
            value: FieldScalar::Bool(true),
            kind: FieldKind::Bool,
            len: None,
        },
    ];
    let text = normalize_rows(&rows);
    let reparsed: serde_json::Value = serde_json::from_str(&text).expect("normalized text");
    assert_eq!(reparsed, json!({"a": 1, "b": true}));
    // 2-space indentation
    assert!(text.contains("\n  \"a\": 1"));
}

#[test]
fn flatten_projects_direct_children() {
    let doc = json!({"a": 1, "xs": [1, 2], "s": "hi"});
    let rows = flatten(&doc);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].key.as_deref(), Some("a"));
    assert_eq!(rows[0].value, FieldScalar::Int(1));
    assert_eq!(rows[1].kind, FieldKind::Array);
    assert_eq!(rows[1].len, Some(2));
    assert_eq!(rows[2].value, FieldScalar::Str("hi".to_string()));

    // scalar node projects to a single unkeyed row
    let rows = flatten(&json!("leaf"));
    assert_eq!(rows.len(), 1);
    assert!(rows[0].key.is_none());

    // array node projects to unkeyed element rows
    let rows = flatten(&json!([1, {"x": 2}]));
    assert_eq!(rows.len(), 2);
    assert!(rows[0].key.is_none());
    assert_eq!(rows[1].kind, FieldKind::Object);
}

#[test]
fn field_rows_at_reports_missing_path() {
    let doc = json!({"a": {"b": 1}});
    let rows = field_rows_at(&doc, &[key("a")]).expect("rows");
    assert_eq!(rows.len(), 1);
    let err = field_rows_at(&doc, &[key("zzz")]).unwrap_err();
    assert!(err.contains("$[\"zzz\"]"));
}

#[test]
fn pointer_parse_tokens() {
    assert_eq!(parse_pointer("").unwrap(), vec![]);
    assert_eq!(parse_pointer("/").unwrap(), vec![]);
    assert_eq!(
        parse_pointer("/customer/0/id").unwrap(),
        vec![key("customer"), Segment::Index(0), key("id")]
    );
    assert_eq!(
        parse_pointer("/a~1b/~0c").unwrap(),
        vec![key("a/b"), key("~c")]
    );
    assert!(parse_pointer("customer/0").is_err());
}

#[test]
fn value_at_walks_without_creating() {
    let doc = json!({"x": {"ys": [{"id": 7}]}});
    let v = value_at(&doc, &[key("x"), key("ys"), Segment::Index(0), key("id")]);
    assert_eq!(v, Some(&json!(7)));
    assert_eq!(value_at(&doc, &[key("x"), Segment::Index(0)]), None);
    assert_eq!(value_at(&doc, &[]), Some(&doc));
}

#[test]
fn parse_edited_falls_back_to_raw_string() {
    assert_eq!(parse_edited("{\"a\": 1}"), json!({"a": 1}));
    assert_eq!(parse_edited("42"), json!(42));
    assert_eq!(parse_edited("not { json"), json!("not { json"));
}

#[test]
fn merge_preserves_untouched_nested_fields() {
    let doc = r#"{"x": {"a": 1, "nested": {"z": 9}}}"#;
    let out = merge_update(doc, &[key("x")], r#"{"a": 2}"#);
    let v: serde_json::Value = serde_json::from_str(&out).expect("merged");
    assert_eq!(v["x"]["a"], json!(2));
    assert_eq!(v["x"]["nested"]["z"], json!(9));
}

#[test]
fn merge_replaces_whole_document_at_root() {
    let out = merge_update(r#"{"a":1}"#, &[], r#"{"b":2}"#);
    let v: serde_json::Value = serde_json::from_str(&out).expect("merged");
    assert_eq!(v, json!({"b": 2}));
}

#[test]
fn merge_creates_missing_containers() {
    let out = merge_update("{}", &[key("p"), key("q")], r#"{"v":1}"#);
    let v: serde_json::Value = serde_json::from_str(&out).expect("merged");
    assert_eq!(v, json!({"p": {"q": {"v": 1}}}));
}

#[test]
fn merge_index_selector_creates_array() {
    let out = merge_update("{}", &[key("a"), Segment::Index(0)], r#"{"v":1}"#);
    let v: serde_json::Value = serde_json::from_str(&out).expect("merged");
    assert_eq!(v, json!({"a": [{"v": 1}]}));
}

#[test]
fn merge_array_write_past_end_pads_with_null() {
    let out = merge_update(r#"{"xs":[1]}"#, &[key("xs"), Segment::Index(3)], "9");
    let v: serde_json::Value = serde_json::from_str(&out).expect("merged");
    assert_eq!(v["xs"], json!([1, null, null, 9]));
}

#[test]
fn merge_scalar_slot_replaced_wholesale() {
    let out = merge_update(r#"{"a":1}"#, &[key("a")], r#"{"b":2}"#);
    let v: serde_json::Value = serde_json::from_str(&out).expect("merged");
    assert_eq!(v["a"], json!({"b": 2}));
}

#[test]
fn merge_unparseable_edit_becomes_string_replacement() {
    let out = merge_update(r#"{"a":{"b":1}}"#, &[key("a")], "oops not json");
    let v: serde_json::Value = serde_json::from_str(&out).expect("merged");
    assert_eq!(v["a"], json!("oops not json"));
}

#[test]
fn merge_malformed_document_is_identity() {
    let doc = "this is not json {{{";
    let out = merge_update(doc, &[key("a")], r#"{"b":2}"#);
    assert_eq!(out, doc);
}

#[test]
fn roundtrip_unchanged_edit_is_identity() {
    let doc0 = r#"{"x": {"a": 1, "nested": {"z": 9}, "s": "hi"}, "other": [1, 2]}"#;
    let path = [key("x")];
    // First merge to get a canonically serialized document
    let doc1 = merge_update(doc0, &path, r#"{"a": 1}"#);
    let v1: serde_json::Value = serde_json::from_str(&doc1).expect("doc1");
    // Re-read the node, normalize, and merge the unchanged text back
    let rows = field_rows_at(&v1, &path).expect("rows");
    let text = normalize_rows(&rows);
    let doc2 = merge_update(&doc1, &path, &text);
    let v2: serde_json::Value = serde_json::from_str(&doc2).expect("doc2");
    assert_eq!(v1, v2);
}

#[test]
fn session_save_commits_and_persists() {
    use jne_core::{MemoryStore, PersistSink, PersistedUpdate, save_edit};

    #[derive(Default)]
    struct CaptureSink {
        updates: Vec<PersistedUpdate>,
    }
    impl PersistSink for CaptureSink {
        fn persist(&mut self, update: &PersistedUpdate) -> Result<(), String> {
            self.updates.push(update.clone());
            Ok(())
        }
    }

    let mut store = MemoryStore::new(r#"{"x": {"a": 1, "nested": {"z": 9}}}"#.to_string());
    let mut sink = CaptureSink::default();
    save_edit(&[key("x")], r#"{"a": 2}"#, &mut store, &mut sink).expect("save");

    let v: serde_json::Value = serde_json::from_str(&store.document_text()).expect("stored");
    assert_eq!(v["x"]["a"], json!(2));
    assert_eq!(v["x"]["nested"]["z"], json!(9));
    assert_eq!(sink.updates.len(), 1);
    assert_eq!(sink.updates[0].contents, store.document_text());
    assert!(sink.updates[0].has_changes);
    assert!(!sink.updates[0].skip_update);
}

#[test]
fn session_rejects_unparseable_document() {
    use jne_core::{MemoryStore, PersistSink, PersistedUpdate, save_edit};

    struct FailSink;
    impl PersistSink for FailSink {
        fn persist(&mut self, _update: &PersistedUpdate) -> Result<(), String> {
            panic!("persist must not run for a rejected save");
        }
    }

    let mut store = MemoryStore::new("not a document".to_string());
    let mut sink = FailSink;
    let res = save_edit(&[key("x")], r#"{"a": 2}"#, &mut store, &mut sink);
    assert!(res.is_err());
    assert_eq!(store.document_text(), "not a document");
}

#[test]
fn file_store_persists_and_backs_up() {
    use jne_core::{FileStore, PersistSink, PersistedUpdate};

    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("doc.json");
    std::fs::write(&p, r#"{"a":1}"#).unwrap();

    let mut sink = FileStore::with_backup(p.clone());
    sink.persist(&PersistedUpdate {
        contents: r#"{"a":2}"#.to_string(),
        has_changes: true,
        skip_update: false,
    })
    .expect("persist");

    assert_eq!(std::fs::read_to_string(&p).unwrap(), r#"{"a":2}"#);
    let zips: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("zip"))
        .collect();
    assert_eq!(zips.len(), 1);
}

#[test]
fn find_json_files_sorted() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.json"), "{}").unwrap();
    std::fs::write(dir.path().join("a.json"), "{}").unwrap();
    std::fs::write(dir.path().join("c.txt"), "x").unwrap();
    let files = jne_core::find_json_files(dir.path());
    let names: Vec<_> = files
        .iter()
        .filter_map(|p| p.file_name().and_then(|s| s.to_str()))
        .collect();
    assert_eq!(names, vec!["a.json", "b.json"]);
}

#[test]
fn dir_documents_reports_parse_errors_inline() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("good.json"), r#"{"a":1}"#).unwrap();
    std::fs::write(dir.path().join("bad.json"), "nope {").unwrap();
    let map = jne_core::dir_documents(dir.path());
    assert_eq!(map["good.json"], json!({"a": 1}));
    assert!(map["bad.json"]["$error"].is_string());
}

#[test]
fn zip_backup_of_documents_dir() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    std::fs::create_dir_all(docs.join("sub")).unwrap();
    std::fs::write(docs.join("a.json"), r#"{"a":1}"#).unwrap();
    std::fs::write(docs.join("sub/b.json"), r#"{"b":2}"#).unwrap();
    let zip = jne_core::zip_backup_dir(&docs).unwrap();
    assert!(zip.exists());
}

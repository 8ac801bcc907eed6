//! Occurrence document loader.

use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;
use slicefix_occurrences::{OccurrenceLoadError, load_occurrences, parse_document};
use std::fs;
use tempfile::TempDir;

fn input_dir(temp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp.path().join("imports")).expect("utf8 path")
}

fn write_doc(dir: &Utf8PathBuf, name: &str, contents: &str) {
    fs::create_dir_all(dir).expect("mkdir");
    fs::write(dir.join(name), contents).expect("write");
}

fn valid_doc() -> &'static str {
    r#"{
        "schema": "slicefix.occurrences.v1",
        "occurrences": [
            {
                "file": "/proj/src/entities/User/ui/A.ts",
                "specifier": "@/entities/User/ui/B/B",
                "names": ["B"],
                "span": { "start": 24, "end": 46 },
                "line": 1
            }
        ]
    }"#
}

#[test]
fn missing_dir_yields_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let docs = load_occurrences(&input_dir(&temp)).expect("load");
    assert!(docs.is_empty());
}

#[test]
fn single_document_is_parsed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = input_dir(&temp);
    write_doc(&dir, "user.imports.json", valid_doc());

    let docs = load_occurrences(&dir).expect("load");
    assert_eq!(docs.len(), 1);
    let doc = docs[0].document.as_ref().expect("parsed");
    assert_eq!(doc.occurrences.len(), 1);
    assert_eq!(doc.occurrences[0].names, vec!["B".to_string()]);
    assert_eq!(doc.occurrences[0].span.map(|s| s.len()), Some(22));
    assert_eq!(docs[0].occurrence_count(), 1);
}

#[test]
fn file_input_is_loaded_directly() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = input_dir(&temp);
    write_doc(&dir, "custom-name.json", valid_doc());

    let docs = load_occurrences(&dir.join("custom-name.json")).expect("load");
    assert_eq!(docs.len(), 1);
    assert!(docs[0].document.is_ok());
}

#[test]
fn only_imports_json_files_are_picked_up() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = input_dir(&temp);
    write_doc(&dir, "a.imports.json", valid_doc());
    write_doc(&dir, "notes.json", valid_doc());
    write_doc(&dir.join("nested"), "b.imports.json", valid_doc());

    let docs = load_occurrences(&dir).expect("load");
    assert_eq!(docs.len(), 1);
    assert!(docs[0].path.as_str().ends_with("a.imports.json"));
}

#[test]
fn documents_are_sorted_by_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = input_dir(&temp);
    for name in ["zebra", "alpha", "middle"] {
        write_doc(&dir, &format!("{name}.imports.json"), valid_doc());
    }

    let docs = load_occurrences(&dir).expect("load");
    let names: Vec<&str> = docs.iter().filter_map(|d| d.path.file_name()).collect();
    assert_eq!(
        names,
        ["alpha.imports.json", "middle.imports.json", "zebra.imports.json"]
    );
}

#[test]
fn corrupt_document_is_collected_without_failing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = input_dir(&temp);
    write_doc(&dir, "good.imports.json", valid_doc());
    write_doc(&dir, "bad.imports.json", "{ not valid json }}}");

    let docs = load_occurrences(&dir).expect("load");
    assert_eq!(docs.len(), 2);
    assert!(matches!(docs[0].document, Err(OccurrenceLoadError::Json { .. })));
    assert!(docs[1].document.is_ok());
    assert_eq!(docs[0].occurrence_count(), 0);
}

#[test]
fn unreadable_document_yields_io_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = input_dir(&temp);
    fs::create_dir_all(dir.join("weird.imports.json")).expect("mkdir");

    let docs = load_occurrences(&dir).expect("load");
    assert_eq!(docs.len(), 1);
    assert!(matches!(docs[0].document, Err(OccurrenceLoadError::Io { .. })));
}

#[test]
fn empty_object_is_an_empty_document() {
    let doc = parse_document("{}").expect("tolerant");
    assert!(doc.occurrences.is_empty());
    assert_eq!(doc.schema, "slicefix.occurrences.v1");
}

#[test]
fn extra_fields_are_tolerated() {
    let doc = parse_document(
        r#"{
            "producer": "eslint-bridge",
            "custom": { "anything": "goes" },
            "occurrences": [
                { "file": "a.ts", "specifier": "b", "kind": "import", "extra": 1 }
            ]
        }"#,
    )
    .expect("tolerant");
    assert_eq!(doc.producer.as_deref(), Some("eslint-bridge"));
    assert!(doc.occurrences[0].span.is_none());
    assert!(doc.occurrences[0].names.is_empty());
}

#[test]
fn occurrence_without_specifier_is_rejected() {
    assert!(matches!(
        parse_document(r#"{ "occurrences": [ { "file": "a.ts" } ] }"#),
        Err(OccurrenceLoadError::Json { .. })
    ));
    assert!(matches!(
        parse_document("null"),
        Err(OccurrenceLoadError::Json { .. })
    ));
    assert!(matches!(parse_document(""), Err(OccurrenceLoadError::Json { .. })));
}

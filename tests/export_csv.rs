use std::fs;

use datastore_export::contract::Document;
use datastore_export::export::{
    export_csv, write_scratch_json, ExportOutcome, EMPTY_DATASTORE_MESSAGE,
};
use datastore_export::flatten::{flatten_document, tabulate};
use serde_json::json;
use tempfile::tempdir;

fn doc(value: serde_json::Value) -> Document {
    serde_json::from_value(value).expect("valid document")
}

fn read_csv(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("CSV should open");
    let headers = reader
        .headers()
        .expect("CSV should have headers")
        .iter()
        .map(str::to_owned)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("valid record").iter().map(str::to_owned).collect())
        .collect();
    (headers, rows)
}

#[test]
fn test_export_flattens_nested_fields_into_underscore_columns() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("export.csv");
    let docs = vec![
        doc(json!({ "content": { "uri": "http://a" }, "id": "1" })),
        doc(json!({ "content": { "uri": "http://b", "mimeType": "text/html" }, "id": "2", "parentDocumentId": "p2" })),
    ];

    let outcome = export_csv(&docs, &out).expect("export should succeed");
    assert_eq!(
        outcome,
        ExportOutcome::Written {
            path: out.clone(),
            rows: 2,
            columns: 4,
        }
    );

    let (headers, rows) = read_csv(&out);
    assert_eq!(
        headers,
        vec!["content_uri", "id", "content_mimeType", "parentDocumentId"]
    );
    assert_eq!(rows.len(), docs.len());
    assert_eq!(rows[0], vec!["http://a", "1", "", ""]);
    assert_eq!(rows[1], vec!["http://b", "2", "text/html", "p2"]);
}

#[test]
fn test_export_quotes_every_field() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("quoted.csv");
    let docs = vec![doc(json!({ "id": "1", "title": "plain" }))];

    export_csv(&docs, &out).expect("export should succeed");

    let raw = fs::read_to_string(&out).unwrap();
    let mut lines = raw.lines();
    assert_eq!(lines.next(), Some("\"id\",\"title\""));
    assert_eq!(lines.next(), Some("\"1\",\"plain\""));
}

#[test]
fn test_export_values_with_commas_round_trip() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("commas.csv");
    let tricky = "Smith, John \"JJ\"";
    let docs = vec![doc(json!({ "id": "1", "structData": { "author": tricky } }))];

    export_csv(&docs, &out).expect("export should succeed");

    let raw = fs::read_to_string(&out).unwrap();
    assert!(raw.contains("\"Smith, John \"\"JJ\"\"\""), "got: {raw}");
    let (headers, rows) = read_csv(&out);
    assert_eq!(headers, vec!["id", "structData_author"]);
    assert_eq!(rows[0][1], tricky);
}

#[test]
fn test_export_empty_collection_writes_nothing() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("empty.csv");

    let outcome = export_csv(&[], &out).expect("empty export is not an error");

    assert_eq!(outcome, ExportOutcome::EmptyResult);
    assert!(!out.exists(), "No CSV should be written for zero documents");
    let message = outcome.to_string();
    assert_eq!(message, EMPTY_DATASTORE_MESSAGE);
    assert!(message.contains("not finished indexing"));
    assert!(message.contains("failed indexing"));
    assert!(message.contains("without advanced indexing"));
    assert!(message.contains("4 hours"));
}

#[test]
fn test_export_creates_missing_parent_directories() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("nested/dir/export.csv");
    let docs = vec![doc(json!({ "id": "1" }))];

    export_csv(&docs, &out).expect("export should succeed");
    assert!(out.exists());
}

#[test]
fn test_flatten_renders_arrays_numbers_and_nulls() {
    let d = doc(json!({
        "id": "1",
        "structData": { "tags": ["a", "b"], "rank": 3, "published": true, "summary": null, "empty": {} }
    }));

    let cells = flatten_document(&d);

    assert_eq!(
        cells,
        vec![
            ("id".to_string(), "1".to_string()),
            ("structData_tags".to_string(), "[\"a\",\"b\"]".to_string()),
            ("structData_rank".to_string(), "3".to_string()),
            ("structData_published".to_string(), "true".to_string()),
            ("structData_summary".to_string(), String::new()),
        ]
    );
}

#[test]
fn test_tabulate_header_is_union_of_flattened_keys() {
    let docs = vec![
        doc(json!({ "id": "1", "a": { "x": 1 } })),
        doc(json!({ "id": "2", "b": "y" })),
        doc(json!({ "a": { "x": 2, "z": 3 } })),
    ];

    let table = tabulate(&docs);

    assert_eq!(table.headers, vec!["id", "a_x", "b", "a_z"]);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[2], vec!["", "2", "", "3"]);
}

#[test]
fn test_scratch_json_is_a_valid_array_without_trailing_comma() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("all-datastore-documents.txt");
    let docs = vec![
        doc(json!({ "id": "1", "content": { "uri": "http://a" } })),
        doc(json!({ "id": "2" })),
    ];

    write_scratch_json(&docs, &path).expect("scratch write should succeed");

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with('['));
    assert!(text.ends_with("}]"), "no trailing comma expected, got: {text}");
    assert_eq!(text.lines().count(), 2);
    let parsed: Vec<Document> = serde_json::from_str(&text).expect("scratch file is valid JSON");
    assert_eq!(parsed, docs);
}

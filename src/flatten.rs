//! Flattening of nested documents into a single-level table.
//!
//! Nested objects are walked depth-first and their key paths joined with `_`, so
//! `{"content": {"uri": "..."}}` becomes the column `content_uri`. Arrays are kept
//! whole as compact JSON text. The header is the union of all flattened keys in
//! first-seen order; documents missing a column get an empty cell.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::contract::Document;

pub const SEPARATOR: &str = "_";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Flattened `(column, cell)` pairs of one document, in key order.
pub fn flatten_document(document: &Document) -> Vec<(String, String)> {
    let mut cells = Vec::new();
    walk(None, document.fields(), &mut cells);
    cells
}

fn walk(prefix: Option<&str>, fields: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, value) in fields {
        let column = match prefix {
            Some(p) => format!("{p}{SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) => walk(Some(&column), inner, out),
            leaf => out.push((column, render_cell(leaf))),
        }
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn tabulate(documents: &[Document]) -> Table {
    let mut headers: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    let flattened: Vec<Vec<(String, String)>> = documents.iter().map(flatten_document).collect();
    for cells in &flattened {
        for (column, _) in cells {
            if !positions.contains_key(column) {
                positions.insert(column.clone(), headers.len());
                headers.push(column.clone());
            }
        }
    }

    let rows = flattened
        .into_iter()
        .map(|cells| {
            let mut row = vec![String::new(); headers.len()];
            for (column, cell) in cells {
                if let Some(&idx) = positions.get(&column) {
                    row[idx] = cell;
                }
            }
            row
        })
        .collect();

    Table { headers, rows }
}

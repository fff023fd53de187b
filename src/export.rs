//! CSV export of a fetched document collection.
//!
//! The whole collection is flattened in memory before anything is written, so an
//! interrupted run never leaves a partial CSV behind. An empty collection is not an
//! error: no file is written and [`ExportOutcome::EmptyResult`] explains why the data
//! store may have returned nothing.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::config::DatastoreConfig;
use crate::contract::{Document, ExportError};
use crate::flatten::tabulate;

pub const EMPTY_DATASTORE_MESSAGE: &str = "No docs found.

It's likely one of the following issues:
  [1] Your data store is not finished indexing.
  [2] Your data store failed indexing.
  [3] Your data store is for website data without advanced indexing.

If you just added your data store, it can take up to 4 hours before it will become available.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written {
        path: PathBuf,
        rows: usize,
        columns: usize,
    },
    /// The data store returned no documents; nothing was written.
    EmptyResult,
}

impl fmt::Display for ExportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportOutcome::Written {
                path,
                rows,
                columns,
            } => write!(
                f,
                "Exported {rows} documents ({columns} columns) to {}",
                path.display()
            ),
            ExportOutcome::EmptyResult => f.write_str(EMPTY_DATASTORE_MESSAGE),
        }
    }
}

/// `<output_dir>/datastore-<project>-<location>-<datastore>.csv`
pub fn default_destination(datastore: &DatastoreConfig, output_dir: &Path) -> PathBuf {
    output_dir.join(datastore.csv_file_name())
}

fn ensure_parent_dir(path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                error!(error = ?e, path = %parent.display(), "Failed to create output directory");
                e
            })?;
            debug!(path = %parent.display(), "Created output directory");
        }
    }
    Ok(())
}

/// Write one CSV row per document, every field quoted.
pub fn export_csv(
    documents: &[Document],
    destination: &Path,
) -> Result<ExportOutcome, ExportError> {
    if documents.is_empty() {
        warn!(path = %destination.display(), "No documents to export, skipping CSV");
        return Ok(ExportOutcome::EmptyResult);
    }

    let table = tabulate(documents);
    debug!(
        rows = table.rows.len(),
        columns = table.headers.len(),
        "Flattened documents into table"
    );

    ensure_parent_dir(destination)?;
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_path(destination)
        .map_err(|e| {
            error!(error = ?e, path = %destination.display(), "Failed to create CSV file");
            e
        })?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(
        path = %destination.display(),
        rows = table.rows.len(),
        columns = table.headers.len(),
        "Wrote CSV export"
    );
    Ok(ExportOutcome::Written {
        path: destination.to_path_buf(),
        rows: table.rows.len(),
        columns: table.headers.len(),
    })
}

/// Write all documents as one JSON array text, one document per line.
///
/// This is a scratch artifact for inspection, not a checkpoint: nothing reads it back.
pub fn write_scratch_json(documents: &[Document], path: &Path) -> Result<(), ExportError> {
    ensure_parent_dir(path)?;
    let mut file = fs::File::create(path).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to create scratch JSON file");
        e
    })?;

    file.write_all(b"[")?;
    for (i, document) in documents.iter().enumerate() {
        if i > 0 {
            file.write_all(b",\n")?;
        }
        serde_json::to_writer(&mut file, document)?;
    }
    file.write_all(b"]")?;
    file.flush()?;

    info!(
        path = %path.display(),
        documents = documents.len(),
        "Wrote scratch JSON"
    );
    Ok(())
}

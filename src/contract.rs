//! # contract: shared data types and seams for the export pipeline
//!
//! This module defines the remote-facing interface of the crate:
//! - [`Document`] and [`DocumentPage`], the records returned by the listing API
//! - [`DocumentLister`], the single remote operation the paginator depends on
//! - [`Throttle`], the pause inserted between consecutive listing calls
//! - [`ListError`] and [`ExportError`], the fatal error taxonomy
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`, so `MockDocumentLister` and `MockThrottle`
//!   are available to integration tests through the `test-export-mocks` feature.
//!
//! ## Adding New Listing Backends
//! - Implement [`DocumentLister`] for the backend.
//! - Map transport, status and decoding failures onto [`ListError`]; callers never retry.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One indexed record of a data store.
///
/// The remote representation is kept as-is (key order included) so that every
/// attribute reaches the flattener. Only the identifiers and the content locator
/// have typed accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn parent_document_id(&self) -> Option<&str> {
        self.0.get("parentDocumentId").and_then(Value::as_str)
    }

    /// Content locator (`content.uri`), if the document carries one.
    pub fn content_uri(&self) -> Option<&str> {
        self.0
            .get("content")
            .and_then(|c| c.get("uri"))
            .and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Document(fields)
    }
}

/// One response of the listing operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl DocumentPage {
    /// The continuation cursor. An empty token means there are no further pages.
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Parameters of a single listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub page_size: u32,
    pub page_token: Option<String>,
}

impl ListRequest {
    pub fn first(page_size: u32) -> Self {
        Self {
            page_size,
            page_token: None,
        }
    }

    pub fn after(page_size: u32, page_token: String) -> Self {
        Self {
            page_size,
            page_token: Some(page_token),
        }
    }
}

/// Fatal failures of the remote listing operation. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("DATASTORE_ACCESS_TOKEN environment variable not set")]
    MissingCredentials,
    #[error("transport error calling the document listing API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("document listing API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode document listing response: {0}")]
    Decode(String),
}

/// Failures while writing export artifacts to disk.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON serialisation error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The remote paginated document-listing operation.
///
/// Implemented by the HTTP client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DocumentLister: Send + Sync {
    /// Fetch one page of documents.
    async fn list_documents(&self, req: ListRequest) -> Result<DocumentPage, ListError>;
}

/// Client-side rate limiter applied between consecutive listing calls.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn pause(&self, interval: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioThrottle;

#[async_trait]
impl Throttle for TokioThrottle {
    async fn pause(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

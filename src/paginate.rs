//! Paginated bulk retrieval of every document in a data store.
//!
//! [`fetch_all`] drives a [`DocumentLister`] from the first page until a response
//! carries no continuation cursor, pausing through a [`Throttle`] between calls.
//! The pause is a fixed client-side rate limit, not a backoff: it never changes
//! with load or errors, and errors are never retried.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::{ExportSettings, DEFAULT_PAGE_SIZE, DEFAULT_RATE_LIMIT_MS};
use crate::contract::{Document, DocumentLister, ListError, ListRequest, Throttle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: u32,
    pub interval: Duration,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            interval: Duration::from_millis(DEFAULT_RATE_LIMIT_MS),
        }
    }
}

impl From<&ExportSettings> for Pagination {
    fn from(settings: &ExportSettings) -> Self {
        Self {
            page_size: settings.page_size,
            interval: settings.rate_limit,
        }
    }
}

/// Fetch every document, in the order the API returns them.
///
/// The throttle is paused exactly once between each pair of consecutive pages and
/// never after the last one. The first failing call aborts the whole fetch.
pub async fn fetch_all<L, T>(
    lister: &L,
    throttle: &T,
    pagination: &Pagination,
) -> Result<Vec<Document>, ListError>
where
    L: DocumentLister + ?Sized,
    T: Throttle + ?Sized,
{
    let mut documents: Vec<Document> = Vec::new();
    let mut request = ListRequest::first(pagination.page_size);
    let mut page_number = 0usize;

    loop {
        page_number += 1;
        let page = match lister.list_documents(request).await {
            Ok(page) => page,
            Err(e) => {
                error!(page = page_number, error = %e, "Listing documents failed");
                return Err(e);
            }
        };

        let next_token = page.continuation().map(str::to_owned);
        let received = page.documents.len();
        documents.extend(page.documents);
        info!(
            page = page_number,
            documents = received,
            total = documents.len(),
            "Fetched page of documents"
        );

        match next_token {
            Some(token) => {
                debug!(
                    interval_ms = pagination.interval.as_millis() as u64,
                    "More pages available, pausing before next call"
                );
                throttle.pause(pagination.interval).await;
                request = ListRequest::after(pagination.page_size, token);
            }
            None => break,
        }
    }

    info!(
        pages = page_number,
        total = documents.len(),
        "Fetched all documents"
    );
    Ok(documents)
}

//! Lookups over an already-fetched document collection.
//!
//! Every helper is a pure function of its inputs and returns a typed result; the
//! CLI decides how to print it.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::contract::Document;

/// Size attributed to each indexed page of an advanced website data store.
pub const BYTES_PER_WEBSITE_PAGE: u64 = 500_000;

pub const NO_WEBSITE_URLS_MESSAGE: &str =
    "No urls found. Make sure this data store is for websites with advanced indexing.";

const SIZE_SUFFIXES: [&str; 8] = ["kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

fn website_url() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://").expect("website url pattern is valid"))
}

/// Content locator of every document, in collection order.
///
/// Documents without a locator yield an empty string so positions line up.
pub fn list_indexed_urls(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|d| d.content_uri().unwrap_or_default().to_string())
        .collect()
}

/// URLs containing `needle` (case-sensitive substring).
pub fn search_url<S: AsRef<str>>(urls: &[S], needle: &str) -> Vec<String> {
    let matches: Vec<String> = urls
        .iter()
        .filter(|url| url.as_ref().contains(needle))
        .map(|url| url.as_ref().to_owned())
        .collect();
    debug!(needle, matches = matches.len(), "Searched indexed urls");
    matches
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocIdLookup {
    Found(Vec<Document>),
    NotFound { target: String },
}

impl fmt::Display for DocIdLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocIdLookup::Found(docs) => write!(f, "Found {} document(s)", docs.len()),
            DocIdLookup::NotFound { target } => {
                write!(f, "Document not found for provided Doc ID: `{target}`")
            }
        }
    }
}

/// Documents whose parent-document id equals `target` exactly.
pub fn search_doc_id(target: &str, documents: &[Document]) -> DocIdLookup {
    let found: Vec<Document> = documents
        .iter()
        .filter(|d| d.parent_document_id() == Some(target))
        .cloned()
        .collect();
    info!(doc_id = target, matches = found.len(), "Searched documents by parent id");
    if found.is_empty() {
        DocIdLookup::NotFound {
            target: target.to_string(),
        }
    } else {
        DocIdLookup::Found(found)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeEstimate {
    Estimated {
        pages: usize,
        bytes: u64,
        human: String,
    },
    NoWebsiteUrls,
}

impl fmt::Display for SizeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeEstimate::Estimated { human, .. } => {
                write!(f, "Estimated data store size: {human}")
            }
            SizeEstimate::NoWebsiteUrls => f.write_str(NO_WEBSITE_URLS_MESSAGE),
        }
    }
}

/// Estimate the size of an advanced website data store from its indexed URLs.
pub fn estimate_size<S: AsRef<str>>(urls: &[S]) -> SizeEstimate {
    estimate_size_with(urls, BYTES_PER_WEBSITE_PAGE)
}

pub fn estimate_size_with<S: AsRef<str>>(urls: &[S], bytes_per_page: u64) -> SizeEstimate {
    let pages = urls
        .iter()
        .filter(|url| website_url().is_match(url.as_ref()))
        .count();
    if pages == 0 {
        info!(candidates = urls.len(), "No website urls to estimate size from");
        return SizeEstimate::NoWebsiteUrls;
    }

    // Saturates: a huge --bytes-per-page must not wrap into a small size.
    let bytes = (pages as u64).saturating_mul(bytes_per_page);
    let human = natural_size(bytes);
    info!(pages, bytes, size = %human, "Estimated data store size");
    SizeEstimate::Estimated {
        pages,
        bytes,
        human,
    }
}

pub fn estimate_size_for_documents(documents: &[Document], bytes_per_page: u64) -> SizeEstimate {
    estimate_size_with(&list_indexed_urls(documents), bytes_per_page)
}

/// Human-readable size in decimal units, e.g. `1.5 MB`.
pub fn natural_size(bytes: u64) -> String {
    const BASE: f64 = 1000.0;
    if bytes == 1 {
        return "1 Byte".to_string();
    }
    if bytes < 1000 {
        return format!("{bytes} Bytes");
    }

    let value = bytes as f64;
    let mut unit = BASE;
    for suffix in SIZE_SUFFIXES {
        unit *= BASE;
        if value < unit {
            return format!("{:.1} {suffix}", BASE * value / unit);
        }
    }
    format!("{:.1} {}", BASE * value / unit, SIZE_SUFFIXES[SIZE_SUFFIXES.len() - 1])
}

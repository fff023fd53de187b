use datastore_export::contract::Document;
use datastore_export::query::{
    estimate_size, estimate_size_for_documents, estimate_size_with, list_indexed_urls,
    natural_size, search_doc_id, search_url, DocIdLookup, SizeEstimate, BYTES_PER_WEBSITE_PAGE,
    NO_WEBSITE_URLS_MESSAGE,
};
use serde_json::json;

fn doc(value: serde_json::Value) -> Document {
    serde_json::from_value(value).expect("valid document")
}

#[test]
fn test_list_indexed_urls_preserves_order() {
    let docs = vec![
        doc(json!({ "id": "1", "content": { "uri": "https://b.example/2" } })),
        doc(json!({ "id": "2" })),
        doc(json!({ "id": "3", "content": { "uri": "gs://bucket/file.pdf" } })),
    ];

    assert_eq!(
        list_indexed_urls(&docs),
        vec!["https://b.example/2", "", "gs://bucket/file.pdf"]
    );
}

#[test]
fn test_search_url_matches_substring() {
    let urls = vec!["http://a/x".to_string(), "http://b/y".to_string()];

    assert_eq!(search_url(&urls, "a"), vec!["http://a/x"]);
    assert!(search_url(&urls, "zzz").is_empty());
}

#[test]
fn test_search_url_is_case_sensitive() {
    let urls = ["https://Example.com/Page", "https://example.com/page"];

    assert_eq!(search_url(&urls, "Page"), vec!["https://Example.com/Page"]);
}

#[test]
fn test_search_doc_id_reports_exact_parent_matches() {
    let docs = vec![
        doc(json!({ "id": "d1", "parentDocumentId": "p1" })),
        doc(json!({ "id": "d2", "parentDocumentId": "p2" })),
        doc(json!({ "id": "d3", "parentDocumentId": "p22" })),
    ];

    match search_doc_id("p2", &docs) {
        DocIdLookup::Found(found) => {
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].id(), Some("d2"));
        }
        other => panic!("Expected a match, got {other:?}"),
    }

    let miss = search_doc_id("p9", &docs);
    assert_eq!(
        miss,
        DocIdLookup::NotFound {
            target: "p9".to_string()
        }
    );
    assert_eq!(
        miss.to_string(),
        "Document not found for provided Doc ID: `p9`"
    );
}

#[test]
fn test_estimate_size_counts_only_website_urls() {
    let urls = [
        "http://example.com/a",
        "https://example.com/b",
        "https://example.com/c",
        "gs://bucket/file.pdf",
    ];

    let estimate = estimate_size(&urls);

    assert_eq!(
        estimate,
        SizeEstimate::Estimated {
            pages: 3,
            bytes: 3 * BYTES_PER_WEBSITE_PAGE,
            human: "1.5 MB".to_string(),
        }
    );
    assert_eq!(estimate.to_string(), "Estimated data store size: 1.5 MB");
}

#[test]
fn test_estimate_size_without_website_urls_reports_diagnostic() {
    let urls = ["gs://bucket/a.pdf", ""];

    let estimate = estimate_size(&urls);

    assert_eq!(estimate, SizeEstimate::NoWebsiteUrls);
    assert_eq!(estimate.to_string(), NO_WEBSITE_URLS_MESSAGE);
    assert_eq!(estimate_size::<&str>(&[]), SizeEstimate::NoWebsiteUrls);
}

#[test]
fn test_estimate_size_honours_bytes_per_page_override() {
    let urls = ["https://a", "https://b"];

    match estimate_size_with(&urls, 1_000) {
        SizeEstimate::Estimated { bytes, human, .. } => {
            assert_eq!(bytes, 2_000);
            assert_eq!(human, "2.0 kB");
        }
        other => panic!("Expected an estimate, got {other:?}"),
    }
}

#[test]
fn test_estimate_size_saturates_instead_of_overflowing() {
    let urls = ["https://a", "https://b"];

    match estimate_size_with(&urls, u64::MAX) {
        SizeEstimate::Estimated { pages, bytes, human } => {
            assert_eq!(pages, 2);
            assert_eq!(bytes, u64::MAX);
            assert_eq!(human, "18.4 EB");
        }
        other => panic!("Expected an estimate, got {other:?}"),
    }
}

#[test]
fn test_estimate_size_for_documents_uses_content_uris() {
    let docs: Vec<Document> = (0..4600)
        .map(|i| {
            doc(json!({
                "id": i.to_string(),
                "content": { "uri": format!("https://site/{i}") }
            }))
        })
        .collect();

    match estimate_size_for_documents(&docs, BYTES_PER_WEBSITE_PAGE) {
        SizeEstimate::Estimated { pages, human, .. } => {
            assert_eq!(pages, 4600);
            assert_eq!(human, "2.3 GB");
        }
        other => panic!("Expected an estimate, got {other:?}"),
    }
}

#[test]
fn test_natural_size_uses_decimal_units() {
    assert_eq!(natural_size(0), "0 Bytes");
    assert_eq!(natural_size(1), "1 Byte");
    assert_eq!(natural_size(999), "999 Bytes");
    assert_eq!(natural_size(1_000), "1.0 kB");
    assert_eq!(natural_size(500_000), "500.0 kB");
    assert_eq!(natural_size(1_500_000), "1.5 MB");
    assert_eq!(natural_size(2_300_000_000), "2.3 GB");
    assert_eq!(natural_size(7_000_000_000_000), "7.0 TB");
}

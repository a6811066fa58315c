use super::*;
use scentmap_core::places::{Location, SignatureScent, VisitInfo};

fn test_client(base_url: &str) -> FirestoreClient {
    FirestoreClient::with_base_url("demo", 30, base_url)
        .expect("client construction should not fail")
}

fn draft(name: &str) -> HotplaceDestination {
    HotplaceDestination {
        id: String::new(),
        name: name.to_string(),
        category: Category::Cafe,
        location: Location {
            region: "서울".into(),
            address: "서울".into(),
            coordinates: None,
        },
        description: String::new(),
        special_feature: String::new(),
        atmosphere: String::new(),
        signature_scent: SignatureScent {
            name: String::new(),
            notes: vec![],
            experience: String::new(),
        },
        visit_info: VisitInfo::default(),
        transportation: String::new(),
        related_fragrance: None,
        images: vec![],
        tags: vec![],
        featured: false,
        enhanced_data: None,
    }
}

#[test]
fn url_builds_collection_path() {
    let client = test_client("https://firestore.googleapis.com/v1");
    let url = client.url(&["documents", HOTPLACES], &[]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/hotplaces"
    );
}

#[test]
fn url_strips_trailing_slash_and_appends_key_first() {
    let client = test_client("https://firestore.googleapis.com/v1/").with_api_key("k");
    let url = client
        .url(&["documents", HOTPLACES], &[("pageSize", "300")])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/hotplaces?key=k&pageSize=300"
    );
}

#[test]
fn url_encodes_document_ids() {
    let client = test_client("http://localhost:8080");
    let url = client
        .url(&["documents", HOTPLACES, "a b/c"], &[])
        .unwrap();
    assert!(
        url.as_str().ends_with("/documents/hotplaces/a%20b%2Fc"),
        "document id should be a single encoded segment: {url}"
    );
}

#[test]
fn run_query_url_keeps_colon() {
    let client = test_client("http://localhost:8080");
    let url = client.url(&["documents:runQuery"], &[]).unwrap();
    assert!(url.as_str().ends_with("/databases/(default)/documents:runQuery"));
}

#[test]
fn rejects_non_hierarchical_base_url() {
    let result = FirestoreClient::with_base_url("demo", 30, "mailto:someone");
    assert!(matches!(result, Err(StoreError::InvalidBaseUrl(_))));
}

#[test]
fn decode_place_takes_id_from_document_name() {
    let doc: Document = serde_json::from_value(serde_json::json!({
        "name": "projects/demo/databases/(default)/documents/hotplaces/xyz",
        "fields": {
            "name": { "stringValue": "Aya Coffee" },
            "category": { "stringValue": "cafe" },
            "location": { "mapValue": { "fields": {
                "region": { "stringValue": "서울" },
                "address": { "stringValue": "서울 강남구" }
            }}},
            "description": { "stringValue": "d" },
            "specialFeature": { "stringValue": "f" },
            "atmosphere": { "stringValue": "a" },
            "signatureScent": { "mapValue": { "fields": {
                "name": { "stringValue": "Roasted Excellence" }
            }}}
        }
    }))
    .unwrap();
    let place = decode_place(&doc).expect("decode");
    assert_eq!(place.id, "xyz");
    assert!(place.tags.is_empty());
}

#[test]
fn decode_or_skip_drops_unknown_category() {
    let doc: Document = serde_json::from_value(serde_json::json!({
        "name": "projects/demo/databases/(default)/documents/hotplaces/bad",
        "fields": { "name": { "stringValue": "X" }, "category": { "stringValue": "bar" } }
    }))
    .unwrap();
    assert!(decode_or_skip(&doc).is_none());
}

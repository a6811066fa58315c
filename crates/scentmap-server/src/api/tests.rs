use axum::body::{to_bytes, Body};
use axum::http::Request;
use scentmap_curator::GeminiClient;
use scentmap_payments::TossClient;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const COLLECTION_PATH: &str = "/projects/demo/databases/(default)/documents/hotplaces";
const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn place_doc(id: &str, name: &str, category: &str, region: &str, featured: bool) -> Value {
    json!({
        "name": format!("projects/demo/databases/(default)/documents/hotplaces/{id}"),
        "fields": {
            "name": { "stringValue": name },
            "category": { "stringValue": category },
            "location": { "mapValue": { "fields": {
                "region": { "stringValue": region },
                "address": { "stringValue": format!("{region} 어딘가") }
            }}},
            "description": { "stringValue": "설명" },
            "specialFeature": { "stringValue": "특징" },
            "atmosphere": { "stringValue": "조용함" },
            "signatureScent": { "mapValue": { "fields": {
                "name": { "stringValue": "Scent" },
                "notes": { "arrayValue": { "values": [{ "stringValue": "시트러스" }] } }
            }}},
            "featured": { "booleanValue": featured }
        }
    })
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                place_doc("a", "연남 찻집", "cafe", "서울", true),
                place_doc("b", "성수 갤러리", "gallery", "서울", false),
                place_doc("c", "협재 해변", "nature", "제주", true),
            ]
        })))
        .mount(server)
        .await;
}

fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
}

struct Harness {
    firestore: MockServer,
    upstream: MockServer,
}

impl Harness {
    async fn start() -> Self {
        Self {
            firestore: MockServer::start().await,
            upstream: MockServer::start().await,
        }
    }

    fn state(&self, with_gemini: bool, with_toss: bool) -> AppState {
        let store = FirestoreClient::with_base_url("demo", 5, &self.firestore.uri())
            .expect("store client");
        let gemini = with_gemini.then(|| {
            GeminiClient::with_base_url(
                "test-key",
                "gemini-test",
                5,
                &format!("{}/v1beta", self.upstream.uri()),
            )
            .expect("gemini client")
            .with_retry(0, 0)
        });
        let toss = with_toss.then(|| {
            TossClient::with_base_url("test_sk_demo", 5, &self.upstream.uri()).expect("toss client")
        });
        AppState {
            catalog: CatalogCache::new(store.clone(), Duration::ZERO),
            store,
            gemini,
            toss,
            batch: BatchOptions {
                only_failed: false,
                check_only: false,
                batch_size: 2,
                batch_delay: Duration::ZERO,
            },
        }
    }

    fn app(&self, with_gemini: bool, with_toss: bool) -> Router {
        build_app(
            self.state(with_gemini, with_toss),
            AuthState::with_keys(["admin-key".to_owned()]),
            default_rate_limit_state(),
        )
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: &Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("unprocessable", StatusCode::UNPROCESSABLE_ENTITY),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("upstream_error", StatusCode::BAD_GATEWAY),
        ("not_configured", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, expected) in cases {
        let response = ApiError::new("req-1", code, "boom").into_response();
        assert_eq!(response.status(), expected, "code {code}");
    }
}

#[test]
fn payment_rejection_keeps_gateway_status_and_code() {
    let error = PaymentError::Rejected {
        status: 403,
        code: "REJECT_CARD_COMPANY".to_owned(),
        message: "카드사 거절".to_owned(),
    };
    let api_error = map_payment_error("req-1".to_owned(), &error);
    assert_eq!(api_error.error.code, "REJECT_CARD_COMPANY");
    assert_eq!(api_error.into_response().status(), StatusCode::FORBIDDEN);
}

#[test]
fn quota_errors_surface_as_rate_limited() {
    let api_error = map_curator_error(
        "req-1".to_owned(),
        &CuratorError::QuotaExceeded("quota".to_owned()),
    );
    assert_eq!(api_error.error.code, "rate_limited");
}

#[tokio::test]
async fn health_reports_degraded_when_store_is_down() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&h.firestore)
        .await;

    let (status, json) = send(h.app(false, false), get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["data"]["status"], "degraded");
}

#[tokio::test]
async fn list_places_applies_filters_and_keyword() {
    let h = Harness::start().await;
    mount_catalog(&h.firestore).await;

    let (status, json) = send(
        h.app(false, false),
        get("/api/v1/places?province=%EC%84%9C%EC%9A%B8&categories=cafe,gallery&q=%EC%B0%BB%EC%A7%91"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    let places = json["data"]["places"].as_array().expect("places array");
    assert_eq!(places.len(), 1);
    assert_eq!(places[0]["name"], "연남 찻집");
    assert_eq!(json["data"]["stats"]["total"], 1);
    assert_eq!(json["data"]["has_active_filters"], true);
}

#[tokio::test]
async fn list_places_without_filters_returns_catalog() {
    let h = Harness::start().await;
    mount_catalog(&h.firestore).await;

    let (status, json) = send(h.app(false, false), get("/api/v1/places")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["places"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["data"]["stats"]["featured"], 2);
    assert_eq!(json["data"]["has_active_filters"], false);
}

#[tokio::test]
async fn unknown_category_is_rejected_with_request_id() {
    let h = Harness::start().await;
    mount_catalog(&h.firestore).await;

    let req = Request::builder()
        .uri("/api/v1/places?categories=bar")
        .header("x-request-id", "req-abc")
        .body(Body::empty())
        .expect("request");
    let (status, json) = send(h.app(false, false), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["meta"]["request_id"], "req-abc");
}

#[tokio::test]
async fn search_endpoint_accepts_filter_body() {
    let h = Harness::start().await;
    mount_catalog(&h.firestore).await;

    let body = json!({ "filters": { "features": { "featured": true } } });
    let (status, json) = send(
        h.app(false, false),
        post_json("/api/v1/places/search", &body, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json["data"]["places"]
        .as_array()
        .expect("places array")
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, vec!["연남 찻집", "협재 해변"]);
}

#[tokio::test]
async fn get_place_returns_404_for_unknown_id() {
    let h = Harness::start().await;
    mount_catalog(&h.firestore).await;

    let (status, json) = send(h.app(false, false), get("/api/v1/places/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");

    let (status, json) = send(h.app(false, false), get("/api/v1/places/c")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "협재 해변");
}

#[tokio::test]
async fn admin_routes_require_bearer_token() {
    let h = Harness::start().await;
    let body = json!({ "naturalLanguageData": "연남동 찻집" });

    let (status, json) = send(h.app(true, false), post_json("/api/v1/convert", &body, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "unauthorized");

    let (status, _) = send(
        h.app(true, false),
        post_json("/api/v1/convert", &body, Some("wrong-key")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn convert_requires_text_and_gemini_key() {
    let h = Harness::start().await;

    let (status, json) = send(
        h.app(true, false),
        post_json(
            "/api/v1/convert",
            &json!({ "naturalLanguageData": "   " }),
            Some("admin-key"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");

    let (status, json) = send(
        h.app(false, false),
        post_json(
            "/api/v1/convert",
            &json!({ "naturalLanguageData": "연남동 찻집" }),
            Some("admin-key"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "not_configured");
}

#[tokio::test]
async fn convert_imports_accepted_places() {
    let h = Harness::start().await;
    let candidates = json!([
        {
            "name": "연남 찻집",
            "category": "cafe",
            "location": {
                "region": "서울",
                "address": "서울 마포구 연남동",
                "coordinates": { "lat": 37.56, "lng": 126.92 }
            },
            "description": "작은 찻집",
            "specialFeature": "블렌딩 차",
            "atmosphere": "조용함",
            "signatureScent": { "name": "Morning Tea", "notes": ["녹차"], "experience": "차분함" },
            "visitInfo": { "openingHours": "10:00-20:00", "bestTime": "오전", "tips": "창가 자리" },
            "transportation": "홍대입구역 도보 10분",
            "images": [],
            "tags": ["차"],
            "featured": false
        },
        { "name": "이름만 있음" }
    ]);
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(gemini_reply(&format!("```json\n{candidates}\n```")))
        .mount(&h.upstream)
        .await;
    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/hotplaces/new1"
        })))
        .expect(1)
        .mount(&h.firestore)
        .await;

    let (status, json) = send(
        h.app(true, false),
        post_json(
            "/api/v1/convert",
            &json!({ "naturalLanguageData": "연남동 찻집 소개", "import": true }),
            Some("admin-key"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["places"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["data"]["importedIds"], json!(["new1"]));
    assert_eq!(json["data"]["warnings"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn convert_with_no_valid_candidates_is_unprocessable() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(gemini_reply(r#"[{ "name": "불완전" }]"#))
        .mount(&h.upstream)
        .await;

    let (status, json) = send(
        h.app(true, false),
        post_json(
            "/api/v1/convert",
            &json!({ "naturalLanguageData": "불완전한 설명" }),
            Some("admin-key"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "unprocessable");
    assert_eq!(json["error"]["details"][0]["name"], "불완전");
}

#[tokio::test]
async fn enhance_place_reports_unknown_id() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{COLLECTION_PATH}/missing")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.firestore)
        .await;

    let (status, json) = send(
        h.app(true, false),
        post_json(
            "/api/v1/enhance-place",
            &json!({ "placeId": "missing" }),
            Some("admin-key"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn batch_enhance_check_only_counts_targets() {
    let h = Harness::start().await;
    mount_catalog(&h.firestore).await;

    let (status, json) = send(
        h.app(true, false),
        post_json(
            "/api/v1/batch-enhance",
            &json!({ "checkOnly": true }),
            Some("admin-key"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["totalToProcess"], 3);
    assert_eq!(json["data"]["totalProcessed"], 0);
}

#[tokio::test]
async fn payment_confirmation_without_secret_is_not_configured() {
    let h = Harness::start().await;
    let body = json!({ "paymentKey": "pk", "orderId": "order-1", "amount": 1000 });

    let (status, json) = send(
        h.app(false, false),
        post_json("/api/v1/payments/confirm", &body, None),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "not_configured");
}

#[tokio::test]
async fn payment_missing_params_is_bad_request() {
    let h = Harness::start().await;
    let body = json!({ "paymentKey": "pk", "amount": 1000 });

    let (status, json) = send(
        h.app(false, true),
        post_json("/api/v1/payments/confirm", &body, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]["message"]
        .as_str()
        .is_some_and(|m| m.contains("orderId")));
}

#[tokio::test]
async fn payment_params_are_checked_before_gateway_configuration() {
    let h = Harness::start().await;
    let body = json!({ "orderId": "order-1", "amount": 1000 });

    let (status, json) = send(
        h.app(false, false),
        post_json("/api/v1/payments/confirm", &body, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json["error"]["message"]
        .as_str()
        .is_some_and(|m| m.contains("paymentKey")));
}

#[tokio::test]
async fn payment_rejection_passes_gateway_status_through() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payments/confirm"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "REJECT_CARD_COMPANY",
            "message": "카드사에서 거절했습니다."
        })))
        .mount(&h.upstream)
        .await;

    let body = json!({ "paymentKey": "pk", "orderId": "order-1", "amount": 1000 });
    let (status, json) = send(
        h.app(false, true),
        post_json("/api/v1/payments/confirm", &body, None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["code"], "REJECT_CARD_COMPANY");
    assert_eq!(json["error"]["message"], "카드사에서 거절했습니다.");
}

// HTTP round trips through the full router (services + stores)

use agro_records::api::{router, AppState};
use agro_records::{MemoryStore, ReportLabels, SqliteStore, Store};
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn memory_app() -> Router {
    router(AppState::new(MemoryStore::new(), ReportLabels::default()))
}

fn sqlite_app() -> Router {
    router(AppState::new(
        SqliteStore::open_in_memory().unwrap(),
        ReportLabels::default(),
    ))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_producer(app: &Router, document: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/producers",
        Some(json!({"name": "João Silva", "document": document})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn create_farm(app: &Router, producer_id: &str, state: &str, areas: (f64, f64, f64)) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/farms",
        Some(json!({
            "name": "Fazenda Boa Esperança",
            "state": state,
            "city": "Sorriso",
            "totalArea": areas.0,
            "arableArea": areas.1,
            "vegetationArea": areas.2,
            "producerId": producer_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_health() {
    let app = memory_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_producer_document_is_formatted_and_unique() {
    let app = memory_app();

    let producer = create_producer(&app, "12345678909").await;
    assert_eq!(producer["document"], "123.456.789-09");

    let (status, body) = send(
        &app,
        Method::POST,
        "/producers",
        Some(json!({"name": "Outro", "document": "123.456.789-09"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["statusCode"], 409);
    assert_eq!(body["path"], "/producers");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_invalid_document_is_bad_request() {
    let app = memory_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/producers",
        Some(json!({"name": "A", "document": "11111111111"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = memory_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/harvests",
        Some(json!({"name": "Safra", "harvestYear": "not a year"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["path"], "/harvests");
}

#[tokio::test]
async fn test_farm_area_rule() {
    let app = memory_app();
    let producer = create_producer(&app, "52998224725").await;
    let producer_id = producer["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/farms",
        Some(json!({
            "name": "Grande",
            "state": "MT",
            "city": "Sorriso",
            "totalArea": 1000.0,
            "arableArea": 800.0,
            "vegetationArea": 300.0,
            "producerId": producer_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let farm = create_farm(&app, producer_id, "MT", (1000.0, 600.0, 400.0)).await;
    let farm_id = farm["id"].as_str().unwrap();

    // Partial update merged with stored areas: 700 + 400 > 1000
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/farms/{farm_id}"),
        Some(json!({"arableArea": 700.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/farms/{farm_id}"),
        Some(json!({"arableArea": 500.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["arableArea"], 500.0);
    assert_eq!(body["vegetationArea"], 400.0);
}

#[tokio::test]
async fn test_farm_delete_lifecycle() {
    let app = sqlite_app();
    let producer = create_producer(&app, "02405315076").await;
    let farm = create_farm(&app, producer["id"].as_str().unwrap(), "GO", (50.0, 20.0, 20.0)).await;
    let uri = format!("/farms/{}", farm["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::DELETE, "/farms/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusCode"], 404);
}

#[tokio::test]
async fn test_farms_of_unknown_producer() {
    let app = memory_app();
    let (status, _) = send(&app, Method::GET, "/farms/producer/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_harvest_patch_and_cultures() {
    let app = sqlite_app();
    let producer = create_producer(&app, "12345678000195").await;
    let farm = create_farm(&app, producer["id"].as_str().unwrap(), "PR", (100.0, 70.0, 30.0)).await;
    let farm_id = farm["id"].as_str().unwrap();

    let (status, harvest) = send(
        &app,
        Method::POST,
        "/harvests",
        Some(json!({"name": "Safra 2024", "harvestYear": 2024})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let harvest_id = harvest["id"].as_str().unwrap();

    let (status, patched) = send(
        &app,
        Method::PATCH,
        &format!("/harvests/{harvest_id}"),
        Some(json!({"name": "Safra 24/25"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["harvestYear"], 2024);

    let (status, _) = send(
        &app,
        Method::POST,
        "/planted-cultures",
        Some(json!({"name": "Soja", "area": 0.0, "farmId": farm_id, "harvestId": harvest_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/planted-cultures",
        Some(json!({"name": "Soja", "area": 40.0, "farmId": farm_id, "harvestId": harvest_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, list) = send(
        &app,
        Method::GET,
        &format!("/planted-cultures/farm/{farm_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, list) = send(
        &app,
        Method::GET,
        &format!("/planted-cultures/harvest/{harvest_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["name"], "Soja");
}

async fn check_reports(app: Router) {
    let producer = create_producer(&app, "12345678909").await;
    let producer_id = producer["id"].as_str().unwrap();
    let a = create_farm(&app, producer_id, "SP", (1000.0, 600.0, 400.0)).await;
    let b = create_farm(&app, producer_id, "SP", (200.0, 100.0, 50.0)).await;
    create_farm(&app, producer_id, "BA", (300.0, 200.0, 100.0)).await;

    let (_, harvest) = send(
        &app,
        Method::POST,
        "/harvests",
        Some(json!({"name": "Safra 2024", "harvestYear": 2024})),
    )
    .await;
    for farm in [&a, &a, &b] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/planted-cultures",
            Some(json!({
                "name": "Milho",
                "area": 5.0,
                "farmId": farm["id"],
                "harvestId": harvest["id"],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, summary) = send(&app, Method::GET, "/farms/reports/total", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalFarms"], 3);
    assert_eq!(summary["totalArea"], 1500.0);
    assert_eq!(summary["metrics"]["farmsByState"][0], json!({"name": "BA", "value": 1}));

    let (_, totals) = send(&app, Method::GET, "/farms/reports/total-area", None).await;
    assert_eq!(totals["totalArableArea"], 900.0);
    assert_eq!(totals["unit"], "hectares");

    let (_, by_state) = send(&app, Method::GET, "/farms/reports/by-state", None).await;
    assert_eq!(by_state, json!({"labels": ["BA", "SP"], "data": [1.0, 2.0]}));

    // Milho planted three times on two farms
    let (_, by_culture) = send(&app, Method::GET, "/farms/reports/by-culture", None).await;
    assert_eq!(by_culture, json!({"labels": ["Milho"], "data": [2.0]}));

    let (_, soil) = send(&app, Method::GET, "/farms/reports/soil", None).await;
    assert_eq!(soil["labels"], json!(["Arable Area", "Vegetation Area"]));
    assert_eq!(soil["data"], json!([900.0, 550.0]));
}

#[tokio::test]
async fn test_reports_memory() {
    check_reports(memory_app()).await;
}

#[tokio::test]
async fn test_reports_sqlite() {
    check_reports(sqlite_app()).await;
}

#[tokio::test]
async fn test_producer_with_farms_cannot_be_deleted() {
    // Farms reference their producer; both stores refuse the dangling delete
    async fn check<S: Store + Send + 'static>(store: S) {
        let app = router(AppState::new(store, ReportLabels::default()));
        let producer = create_producer(&app, "52998224725").await;
        let id = producer["id"].as_str().unwrap();
        create_farm(&app, id, "RS", (10.0, 5.0, 5.0)).await;

        let (status, body) = send(&app, Method::DELETE, &format!("/producers/{id}"), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");

        let (status, _) = send(&app, Method::GET, &format!("/producers/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    check(MemoryStore::new()).await;
    check(SqliteStore::open_in_memory().unwrap()).await;
}

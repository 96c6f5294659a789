//! End-to-end API tests: requests through the router, envelopes out.
//!
//! The API folds every failure into `{"status":"error",...}` with HTTP 200;
//! these tests pin that contract.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use material_registry::{app, apply_migrations, AppState, MaterialStore};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

async fn setup(pool: &PgPool) -> (Router, i64) {
    apply_migrations(pool).await.unwrap();
    let supplier = MaterialStore::create_supplier(pool, "API Test Supplier", None)
        .await
        .unwrap();
    (app(AppState { pool: pool.clone() }), supplier.id)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

fn material_body(code: &str, material_type: &str, buy_price: f64, supplier_id: i64) -> Value {
    json!({
        "material_code": code,
        "name": format!("{} material", code),
        "material_type": material_type,
        "buy_price": buy_price,
        "supplier_id": supplier_id
    })
}

#[sqlx::test(migrations = false)]
async fn post_then_get_denormalizes_supplier(pool: PgPool) {
    let (router, supplier) = setup(&pool).await;

    let (status, body) = send(
        &router,
        with_json(
            "POST",
            "/api/materials",
            json!({
                "material_code": "M100",
                "name": "X",
                "material_type": "cotton",
                "buy_price": 120,
                "supplier_id": supplier
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let id = body["id"].as_i64().unwrap();
    assert!(id > 0);

    let (status, body) = send(&router, get("/api/materials")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let data = body["data"].as_array().unwrap();
    let found = data.iter().find(|m| m["id"] == json!(id)).unwrap();
    assert_eq!(found["material_code"], "M100");
    assert_eq!(found["material_type"], "cotton");
    assert_eq!(found["supplier_id"], json!(supplier));
    assert_eq!(found["supplier_name"], "API Test Supplier");
}

#[sqlx::test(migrations = false)]
async fn get_filters_by_material_type(pool: PgPool) {
    let (router, supplier) = setup(&pool).await;
    for (code, kind) in [("F1", "fabric"), ("F2", "fabric"), ("J1", "jeans")] {
        let (_, body) = send(
            &router,
            with_json("POST", "/api/materials", material_body(code, kind, 200.0, supplier)),
        )
        .await;
        assert_eq!(body["status"], "success");
    }

    let (status, body) = send(&router, get("/api/materials?material_type=fabric")).await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|m| m["material_type"] == "fabric"));
}

#[sqlx::test(migrations = false)]
async fn get_rejects_unknown_material_type(pool: PgPool) {
    let (router, _) = setup(&pool).await;
    let (status, body) = send(&router, get("/api/materials?material_type=silk")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
}

#[sqlx::test(migrations = false)]
async fn post_below_floor_returns_error_and_persists_nothing(pool: PgPool) {
    let (router, supplier) = setup(&pool).await;
    let (status, body) = send(
        &router,
        with_json("POST", "/api/materials", material_body("M200", "jeans", 50.0, supplier)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("100"));

    let (_, body) = send(&router, get("/api/materials")).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = false)]
async fn post_missing_field_returns_error(pool: PgPool) {
    let (router, _) = setup(&pool).await;
    let (status, body) = send(
        &router,
        with_json("POST", "/api/materials", json!({"material_code": "M201"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("required"));
}

#[sqlx::test(migrations = false)]
async fn post_duplicate_code_returns_error(pool: PgPool) {
    let (router, supplier) = setup(&pool).await;
    let first = material_body("M202", "fabric", 150.0, supplier);
    let (_, body) = send(&router, with_json("POST", "/api/materials", first.clone())).await;
    assert_eq!(body["status"], "success");

    let (status, body) = send(&router, with_json("POST", "/api/materials", first)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
}

#[sqlx::test(migrations = false)]
async fn put_partial_update_keeps_other_fields(pool: PgPool) {
    let (router, supplier) = setup(&pool).await;
    let (_, body) = send(
        &router,
        with_json("POST", "/api/materials", material_body("M300", "jeans", 150.0, supplier)),
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        with_json("PUT", &format!("/api/materials/{}", id), json!({"name": "Updated"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (_, body) = send(&router, get("/api/materials")).await;
    let data = body["data"].as_array().unwrap();
    let row = data.iter().find(|m| m["id"] == json!(id)).unwrap();
    assert_eq!(row["name"], "Updated");
    assert_eq!(row["buy_price"], json!(150.0));
    assert_eq!(row["material_code"], "M300");
}

#[sqlx::test(migrations = false)]
async fn put_unknown_id_returns_error(pool: PgPool) {
    let (router, _) = setup(&pool).await;
    let (status, body) = send(
        &router,
        with_json("PUT", "/api/materials/9999", json!({"name": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "material not found");
}

#[sqlx::test(migrations = false)]
async fn delete_then_delete_again(pool: PgPool) {
    let (router, supplier) = setup(&pool).await;
    let (_, body) = send(
        &router,
        with_json("POST", "/api/materials", material_body("M400", "cotton", 110.0, supplier)),
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let uri = format!("/api/materials/{}", id);
    let (status, body) = send(
        &router,
        Request::builder()
            .method("DELETE")
            .uri(uri.as_str())
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (status, body) = send(
        &router,
        Request::builder()
            .method("DELETE")
            .uri(uri.as_str())
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "material not found");
}

#[sqlx::test(migrations = false)]
async fn non_numeric_id_returns_error_envelope(pool: PgPool) {
    let (router, _) = setup(&pool).await;
    let (status, body) = send(
        &router,
        Request::builder()
            .method("DELETE")
            .uri("/api/materials/abc")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
}

#[sqlx::test(migrations = false)]
async fn health_and_ready(pool: PgPool) {
    let (router, _) = setup(&pool).await;
    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&router, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}

//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use spendwise_core::db::Database;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    setup_with_db(Database::in_memory().unwrap())
}

fn setup_with_db(db: Database) -> Router {
    let config = ServerConfig {
        require_auth: false,
        ..Default::default()
    };
    create_router(db, config)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_as(owner: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(DEFAULT_OWNER_HEADER, owner)
        .body(Body::empty())
        .unwrap()
}

fn send_json(owner: &str, method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(DEFAULT_OWNER_HEADER, owner)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn delete_as(owner: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(DEFAULT_OWNER_HEADER, owner)
        .body(Body::empty())
        .unwrap()
}

async fn add_expense(app: &Router, owner: &str, category: &str, amount: f64, date: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(send_json(
            owner,
            "POST",
            "/api/expenses",
            serde_json::json!({
                "amount": amount,
                "category": category,
                "date": date,
                "paymentMethod": "upi"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    get_body_json(response).await["id"].as_i64().unwrap()
}

async fn set_budget(app: &Router, owner: &str, category: &str, limit: f64) -> StatusCode {
    app.clone()
        .oneshot(send_json(
            owner,
            "POST",
            "/api/budgets",
            serde_json::json!({
                "category": category,
                "monthlyLimit": limit,
                "month": 3,
                "year": 2024
            }),
        ))
        .await
        .unwrap()
        .status()
}

// ========== Analytics API Tests ==========

#[tokio::test]
async fn test_monthly_summary_empty() {
    let app = setup_test_app();

    let response = app
        .oneshot(get_as("alice", "/api/analytics/monthly-summary?month=3&year=2024"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["totalSpent"], 0.0);
    assert_eq!(json["totalExpenses"], 0);
    assert_eq!(json["avgExpense"], 0.0);
}

#[tokio::test]
async fn test_period_parameters_are_validated() {
    let app = setup_test_app();

    for uri in [
        "/api/analytics/monthly-summary",
        "/api/analytics/monthly-summary?month=3",
        "/api/analytics/category-breakdown?month=13&year=2024",
        "/api/analytics/top-category?month=0&year=2024",
        "/api/analytics/month-comparison?month=march&year=2024",
        "/api/budgets?year=2024",
        "/api/insights?month=3&year=99999",
    ] {
        let response = app.clone().oneshot(get_as("alice", uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let json = get_body_json(response).await;
        assert!(json["error"].as_str().unwrap().starts_with("Invalid request"));
    }
}

#[tokio::test]
async fn test_summary_and_breakdown() {
    let app = setup_test_app();
    add_expense(&app, "alice", "Food", 400.0, "2024-03-05").await;
    add_expense(&app, "alice", "Travel", 100.0, "2024-03-06").await;
    add_expense(&app, "alice", "Food", 999.0, "2024-04-01").await;
    add_expense(&app, "bob", "Food", 50.0, "2024-03-05").await;

    let response = app
        .clone()
        .oneshot(get_as("alice", "/api/analytics/monthly-summary?month=3&year=2024"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["totalSpent"], 500.0);
    assert_eq!(json["totalExpenses"], 2);
    assert_eq!(json["avgExpense"], 250.0);

    let response = app
        .clone()
        .oneshot(get_as("alice", "/api/analytics/category-breakdown?month=3&year=2024"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["category"], "Food");
    assert_eq!(rows[0]["totalSpent"], 400.0);
    assert_eq!(rows[1]["category"], "Travel");

    let response = app
        .oneshot(get_as("alice", "/api/analytics/top-category?month=3&year=2024"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["category"], "Food");
    assert_eq!(json["totalSpent"], 400.0);
}

#[tokio::test]
async fn test_top_category_empty_object() {
    let app = setup_test_app();

    let response = app
        .oneshot(get_as("alice", "/api/analytics/top-category?month=3&year=2024"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json, serde_json::json!({}));
}

#[tokio::test]
async fn test_month_comparison() {
    let app = setup_test_app();
    add_expense(&app, "alice", "Food", 200.0, "2024-02-10").await;
    add_expense(&app, "alice", "Food", 100.0, "2024-03-10").await;

    let response = app
        .oneshot(get_as("alice", "/api/analytics/month-comparison?month=3&year=2024"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["currentMonth"], 100.0);
    assert_eq!(json["previousMonth"], 200.0);
    assert_eq!(json["percentageChange"], -50.0);
}

// ========== Budget API Tests ==========

#[tokio::test]
async fn test_budget_upsert_and_usage() {
    let app = setup_test_app();
    add_expense(&app, "alice", "Food", 85.0, "2024-03-05").await;

    assert_eq!(set_budget(&app, "alice", "Food", 50.0).await, StatusCode::CREATED);
    assert_eq!(set_budget(&app, "alice", "Food", 100.0).await, StatusCode::CREATED);

    let response = app
        .oneshot(get_as("alice", "/api/budgets?month=3&year=2024"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let budgets = json.as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["category"], "Food");
    assert_eq!(budgets[0]["limit"], 100.0);
    assert_eq!(budgets[0]["spent"], 85.0);
    assert_eq!(budgets[0]["percentageUsed"], 85.0);
    assert_eq!(budgets[0]["alert"], "near");
}

#[tokio::test]
async fn test_budget_rejects_bad_input() {
    let app = setup_test_app();

    assert_eq!(
        set_budget(&app, "alice", "Food", 0.0).await,
        StatusCode::BAD_REQUEST
    );

    let response = app
        .clone()
        .oneshot(send_json(
            "alice",
            "POST",
            "/api/budgets",
            serde_json::json!({"category": "Food", "monthlyLimit": 10, "month": 13, "year": 2024}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/budgets")
                .header(DEFAULT_OWNER_HEADER, "alice")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_stored_budget_reported_inline() {
    let db = Database::in_memory().unwrap();
    {
        let conn = db.conn().unwrap();
        conn.execute(
            "INSERT INTO budgets (owner_id, category, monthly_limit, month, year) VALUES ('alice', 'Travel', -5, 3, 2024)",
            [],
        )
        .unwrap();
    }
    let app = setup_with_db(db);

    let response = app
        .oneshot(get_as("alice", "/api/budgets?month=3&year=2024"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json[0]["category"], "Travel");
    assert_eq!(json[0]["limit"], -5.0);
    assert!(json[0]["error"].as_str().is_some());
}

#[tokio::test]
async fn test_budget_delete_ownership() {
    let db = Database::in_memory().unwrap();
    let budget = db
        .upsert_budget(
            "alice",
            &spendwise_core::NewBudget {
                category: "Food".into(),
                monthly_limit: 100.0,
                month: 3,
                year: 2024,
            },
        )
        .unwrap();
    let app = setup_with_db(db);

    let uri = format!("/api/budgets/{}", budget.id);
    let response = app.clone().oneshot(delete_as("bob", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(delete_as("alice", "/api/budgets/9999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(delete_as("alice", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["success"], true);
}

// ========== Insight API Tests ==========

#[tokio::test]
async fn test_insights() {
    let app = setup_test_app();
    add_expense(&app, "alice", "Food", 400.0, "2024-03-05").await;
    add_expense(&app, "alice", "Travel", 100.0, "2024-03-06").await;

    let response = app
        .oneshot(get_as("alice", "/api/insights?month=3&year=2024"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["month"], 3);
    assert_eq!(json["year"], 2024);
    let insights = json["insights"].as_array().unwrap();
    assert_eq!(insights.len(), 2);
    assert_eq!(insights[0]["severity"], "info");
    assert_eq!(insights[0]["kind"], "top_category");
    assert_eq!(
        insights[0]["text"],
        "Your highest spending category is Food, accounting for 80.0% of your total expenses."
    );
    assert_eq!(insights[1]["kind"], "category_concentration");
}

#[tokio::test]
async fn test_insights_empty_for_new_owner() {
    let app = setup_test_app();

    let response = app
        .oneshot(get_as("newcomer", "/api/insights?month=3&year=2024"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["insights"].as_array().unwrap().is_empty());
}

// ========== Expense API Tests ==========

#[tokio::test]
async fn test_expense_crud_and_ownership() {
    let app = setup_test_app();
    let id = add_expense(&app, "alice", "Food", 10.0, "2024-03-05").await;
    let uri = format!("/api/expenses/{}", id);

    let response = app
        .clone()
        .oneshot(send_json("bob", "PUT", &uri, serde_json::json!({"amount": 1.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(send_json(
            "alice",
            "PUT",
            "/api/expenses/9999",
            serde_json::json!({"amount": 1.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(send_json(
            "alice",
            "PUT",
            &uri,
            serde_json::json!({"amount": 12.5, "category": "Groceries"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 12.5);
    assert_eq!(json["category"], "Groceries");
    assert_eq!(json["paymentMethod"], "upi");

    let response = app.clone().oneshot(delete_as("bob", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.clone().oneshot(delete_as("alice", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(delete_as("alice", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_expenses_filters() {
    let app = setup_test_app();
    add_expense(&app, "alice", "Food", 1.0, "2024-02-28").await;
    add_expense(&app, "alice", "Food", 2.0, "2024-03-01").await;
    add_expense(&app, "alice", "Travel", 3.0, "2024-03-15").await;
    add_expense(&app, "bob", "Food", 4.0, "2024-03-15").await;

    let response = app
        .clone()
        .oneshot(get_as("alice", "/api/expenses"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let amounts: Vec<f64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["amount"].as_f64().unwrap())
        .collect();
    assert_eq!(amounts, vec![3.0, 2.0, 1.0]);

    // Month alone is ignored; the filter needs both
    let response = app
        .clone()
        .oneshot(get_as("alice", "/api/expenses?month=3"))
        .await
        .unwrap();
    assert_eq!(get_body_json(response).await.as_array().unwrap().len(), 3);

    let response = app
        .oneshot(get_as(
            "alice",
            "/api/expenses?month=3&year=2024&category=Food",
        ))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["amount"], 2.0);
}

#[tokio::test]
async fn test_create_expense_validation() {
    let app = setup_test_app();

    for body in [
        serde_json::json!({"amount": -5.0, "category": "Food"}),
        serde_json::json!({"amount": 5.0, "category": ""}),
        serde_json::json!({"amount": 5.0, "category": "Food", "paymentMethod": "cheque"}),
        serde_json::json!({"amount": 5.0, "category": "Food", "date": "yesterday"}),
        serde_json::json!({"category": "Food"}),
    ] {
        let response = app
            .clone()
            .oneshot(send_json("alice", "POST", "/api/expenses", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
    }
}

// ========== Audit API Tests ==========

#[tokio::test]
async fn test_audit_log_scoped_to_owner() {
    let app = setup_test_app();
    add_expense(&app, "alice", "Food", 10.0, "2024-03-05").await;
    set_budget(&app, "alice", "Food", 100.0).await;
    add_expense(&app, "bob", "Food", 10.0, "2024-03-05").await;

    let response = app
        .oneshot(get_as("alice", "/api/audit?limit=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["owner_id"] == "alice"));
}

// ========== Auth & Error Tests ==========

#[tokio::test]
async fn test_auth_required_without_identity() {
    let config = ServerConfig {
        require_auth: true,
        ..Default::default()
    };
    let app = create_router(Database::in_memory().unwrap(), config);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/insights?month=3&year=2024")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get_as("alice", "/api/insights?month=3&year=2024"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_key_resolves_owner() {
    let db = Database::in_memory().unwrap();
    db.create_expense(
        "svc-owner",
        &spendwise_core::NewExpense::new(
            42.0,
            "Bills",
            chrono::DateTime::parse_from_rfc3339("2024-03-02T10:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        ),
    )
    .unwrap();
    let config = ServerConfig {
        require_auth: true,
        api_keys: parse_api_keys("s3cret:svc-owner"),
        ..Default::default()
    };
    let app = create_router(db, config);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/analytics/monthly-summary?month=3&year=2024")
                .header("authorization", "Bearer s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["totalSpent"], 42.0);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/analytics/monthly-summary?month=3&year=2024")
                .header("authorization", "Bearer wrong!")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_no_auth_defaults_to_local_owner() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/expenses")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"amount": 5, "category": "Food"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(get_body_json(response).await["ownerId"], LOCAL_OWNER);
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app
        .oneshot(get_as("alice", "/api/analytics/monthly-summary?month=3&year=2024"))
        .await
        .unwrap();
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}

#[test]
fn test_parse_api_keys() {
    let keys = parse_api_keys(" k1:alice , bad-entry, :nobody, k2:bob ");
    assert_eq!(
        keys,
        vec![
            ApiKey {
                key: "k1".into(),
                owner: "alice".into()
            },
            ApiKey {
                key: "k2".into(),
                owner: "bob".into()
            },
        ]
    );
    assert_eq!(owner_for_api_key("k2", &keys), Some("bob"));
    assert_eq!(owner_for_api_key("k3", &keys), None);
}

#[test]
fn test_error_status_mapping() {
    let cases = [
        (
            spendwise_core::Error::InvalidRequest("month".into()),
            StatusCode::BAD_REQUEST,
        ),
        (
            spendwise_core::Error::NotFound("x".into()),
            StatusCode::NOT_FOUND,
        ),
        (
            spendwise_core::Error::Forbidden("x".into()),
            StatusCode::FORBIDDEN,
        ),
        (
            spendwise_core::Error::StoreUnavailable("pool timed out".into()),
            StatusCode::SERVICE_UNAVAILABLE,
        ),
        (
            spendwise_core::Error::Io(std::io::Error::other("disk full")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(AppError::from(err).status(), expected);
    }
}

#[test]
fn test_internal_errors_are_sanitized() {
    let err = AppError::from(spendwise_core::Error::Io(std::io::Error::other(
        "/var/db/secret.db: permission denied",
    )));
    assert_eq!(err.message, "An internal error occurred");
    assert!(err.internal.is_some());

    let err = AppError::from(spendwise_core::Error::StoreUnavailable(
        "/var/db/secret.db locked".into(),
    ));
    assert!(!err.message.contains("secret"));
}

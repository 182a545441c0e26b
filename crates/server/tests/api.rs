use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{JwtKeys, ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    let keys = JwtKeys::new("test-secret", Duration::from_secs(600));
    router(ServerState::new(engine, keys))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

async fn signup_and_login(app: &Router, username: &str) -> String {
    let credentials = json!({ "username": username, "password": "hunter22" });
    let (status, _) = send(
        app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(credentials.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, Method::POST, "/api/v1/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], username);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn hello_is_public() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/hello", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/accounts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Method::GET, "/api/v1/budget", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let other = JwtKeys::new("other-secret", Duration::from_secs(600))
        .sign(uuid::Uuid::new_v4())
        .unwrap();
    let (status, _) = send(&app, Method::GET, "/api/v1/accounts", Some(&other), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let app = app().await;
    signup_and_login(&app, "alice").await;

    let (status, wrong) = send(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "username": "alice", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, unknown) = send(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "username": "mallory", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["error"], "incorrect username or password");
    assert_eq!(wrong, unknown);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({ "username": "alice", "password": "again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn account_crud_round_trip() {
    let app = app().await;
    let token = signup_and_login(&app, "alice").await;
    let token = Some(token.as_str());

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/accounts",
        token,
        Some(json!({
            "account_name": "Main",
            "account_type": "Credit Card",
            "initial_balance": "100.50"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["balance"], "100.50");
    assert_eq!(created["account_type"], "Credit Card");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/accounts/{id}"),
        token,
        Some(json!({ "account_name": "Everyday" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["account_name"], "Everyday");
    assert_eq!(updated["account_type"], "Credit Card");

    let (status, list) = send(&app, Method::GET, "/api/v1/accounts", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/accounts/{id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, list) = send(&app, Method::GET, "/api/v1/accounts", token, None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_input_is_a_bad_request() {
    let app = app().await;
    let token = signup_and_login(&app, "alice").await;
    let token = Some(token.as_str());

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/accounts/not-a-uuid",
        token,
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/accounts",
        token,
        Some(json!({ "account_type": "Checking" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/groups",
        token,
        Some(json!({ "group_name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        token,
        Some(json!({
            "amount": "ten",
            "tx_description": "x",
            "tx_date": "2024-03-01T00:00:00Z",
            "account_id": uuid::Uuid::new_v4()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn other_users_see_forbidden_or_not_found() {
    let app = app().await;
    let alice = signup_and_login(&app, "alice").await;
    let bob = signup_and_login(&app, "bob").await;

    let (_, category) = send(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(&alice),
        Some(json!({ "category_name": "Groceries", "budget": "400.00" })),
    )
    .await;
    let id = category["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/categories/{id}"),
        Some(&bob),
        Some(json!({ "category_name": "Mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.get("category_name").is_none());

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/categories/{}", uuid::Uuid::new_v4()),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, Method::GET, "/api/v1/categories", Some(&bob), None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn transactions_feed_the_budget() {
    let app = app().await;
    let token = signup_and_login(&app, "alice").await;
    let token = Some(token.as_str());

    let (_, account) = send(
        &app,
        Method::POST,
        "/api/v1/accounts",
        token,
        Some(json!({ "account_name": "Main", "account_type": "Checking" })),
    )
    .await;
    let (_, group) = send(
        &app,
        Method::POST,
        "/api/v1/groups",
        token,
        Some(json!({ "group_name": "Household" })),
    )
    .await;
    let (_, category) = send(
        &app,
        Method::POST,
        "/api/v1/categories",
        token,
        Some(json!({
            "category_name": "Groceries",
            "budget": "400.00",
            "group_id": group["id"]
        })),
    )
    .await;
    assert_eq!(category["group_name"], "Household");

    let (status, tx) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        token,
        Some(json!({
            "amount": 350.0,
            "tx_description": "weekly shop",
            "tx_date": chrono::Utc::now(),
            "account_id": account["id"],
            "category_id": category["id"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["amount"], "350.00");
    assert_eq!(tx["account_name"], "Main");
    assert_eq!(tx["posted"], false);

    let (status, budget) = send(&app, Method::GET, "/api/v1/budget", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(budget["groups"][0]["total_spent"], "350.00");
    assert_eq!(budget["groups"][0]["total_remaining"], "50.00");
    assert_eq!(budget["grand_total_remaining"], "50.00");

    let category_id = category["id"].as_str().unwrap();
    let (status, by_category) = send(
        &app,
        Method::GET,
        &format!("/api/v1/categories/{category_id}/transactions"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_category.as_array().unwrap().len(), 1);

    let tx_id = tx["id"].as_str().unwrap();
    let (status, cleared) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/transactions/{tx_id}"),
        token,
        Some(json!({ "category_id": null, "posted": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["category_id"], Value::Null);
    assert_eq!(cleared["posted"], true);
    assert_eq!(cleared["tx_description"], "weekly shop");

    let (_, budget) = send(&app, Method::GET, "/api/v1/budget", token, None).await;
    assert_eq!(budget["grand_total_spent"], "0.00");
}

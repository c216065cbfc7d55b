mod common;

use axum::http::{Method, StatusCode};
use sea_orm::EntityTrait;
use serde_json::json;

use common::{body_json, location, TestApp};
use northwind::entities::Customer;

fn bonap() -> serde_json::Value {
    json!({
        "customer_id": "BONAP",
        "company_name": "Bon app'",
        "contact_name": "Laurence Lebihan",
        "address": "12, rue des Bouchers",
        "city": "Marseille",
        "postal_code": "13008",
        "country": "France",
        "phone": "91.24.45.40"
    })
}

#[tokio::test]
async fn lists_all_customers_or_one_country() {
    let app = TestApp::new().await;

    let all = body_json(app.get("/api/customers").await).await;
    assert_eq!(all.as_array().map(Vec::len), Some(6));

    let response = app.get("/api/customers?country=Germany").await;
    assert_eq!(response.status(), StatusCode::OK);
    let german = body_json(response).await;
    let ids: Vec<&str> = german
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["customer_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["ALFKI", "BLAUS"]);

    // Country match is exact
    let none = body_json(app.get("/api/customers?country=germany").await).await;
    assert_eq!(none.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn get_upper_cases_the_route_id() {
    let app = TestApp::new().await;

    let response = app.get("/api/customers/alfki").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["customer_id"], "ALFKI");
    assert_eq!(body["company_name"], "Alfreds Futterkiste");

    let missing = app.get("/api/customers/ZZZZZ").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let error = body_json(missing).await;
    assert_eq!(error["error"], "Not Found");
    assert!(error["request_id"].is_string());
}

#[tokio::test]
async fn create_returns_location_and_body() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/api/customers", Some(bonap()))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(location(&response), Some("/api/customers/BONAP"));
    let body = body_json(response).await;
    assert_eq!(body["city"], "Marseille");

    let fetched = app.get("/api/customers/BONAP").await;
    assert_eq!(fetched.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_rejects_invalid_fields() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/customers",
            Some(json!({"customer_id": "bon", "company_name": ""})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"customer_id"));
    assert!(fields.contains(&"company_name"));
}

#[tokio::test]
async fn duplicate_create_conflicts_and_keeps_original() {
    let app = TestApp::new().await;

    let mut duplicate = bonap();
    duplicate["customer_id"] = json!("ALFKI");
    duplicate["company_name"] = json!("Impostor GmbH");

    let response = app
        .request(Method::POST, "/api/customers", Some(duplicate))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let original = Customer::find_by_id("ALFKI".to_string())
        .one(&*app.state.db)
        .await
        .expect("query customer")
        .expect("customer should exist");
    assert_eq!(original.company_name, "Alfreds Futterkiste");
}

#[tokio::test]
async fn update_checks_ids_then_existence() {
    let app = TestApp::new().await;

    // Route and body disagree
    let mut body = bonap();
    body["customer_id"] = json!("ANTON");
    let response = app
        .request(Method::PUT, "/api/customers/ANATR", Some(body.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Absent
    let response = app
        .request(Method::PUT, "/api/customers/BONAP", Some(bonap()))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Lower-case route id is normalized before the comparison
    body["company_name"] = json!("Antonio Moreno Taquería II");
    let response = app
        .request(Method::PUT, "/api/customers/anton", Some(body))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["company_name"], "Antonio Moreno Taquería II");
    assert_eq!(updated["city"], "Marseille");
}

#[tokio::test]
async fn delete_is_restricted_by_orders() {
    let app = TestApp::new().await;

    let response = app.request(Method::DELETE, "/api/customers/ALFKI", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(app.get("/api/customers/ALFKI").await.status(), StatusCode::OK);

    let response = app.request(Method::DELETE, "/api/customers/BERGS", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        app.get("/api/customers/BERGS").await.status(),
        StatusCode::NOT_FOUND
    );

    let response = app.request(Method::DELETE, "/api/customers/BERGS", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orders_endpoint_returns_related_rows_only() {
    let app = TestApp::new().await;

    let orders = body_json(app.get("/api/customers/ALFKI/orders").await).await;
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o["customer_id"] == "ALFKI"));

    let empty = body_json(app.get("/api/customers/BLAUS/orders").await).await;
    assert_eq!(empty.as_array().map(Vec::len), Some(0));

    let missing = app.get("/api/customers/ZZZZZ/orders").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_details_by_order() {
    let app = TestApp::new().await;

    let orders = body_json(app.get("/api/customers/ANATR/orders").await).await;
    let order_id = orders[0]["order_id"].as_i64().unwrap();

    let response = app.get(&format!("/api/orders/{}/details", order_id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let lines = body_json(response).await;
    let lines = lines.as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l["order_id"].as_i64() == Some(order_id)));

    assert_eq!(
        app.get("/api/orders/999999/details").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn health_reports_store_up() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = body_json(response).await;
    assert_eq!(body["status"], "up");
}

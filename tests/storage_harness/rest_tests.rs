//! REST integration test macro for product stores.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that drive
//! a `ProductStore` through full REST round-trips:
//! JSON → HTTP request → validation → service → store → HTTP response → JSON.
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_rest_create`: POST 201 with the derived `updatedPrice`
//! - `test_rest_create_then_get`: stored fields equal submitted fields
//! - `test_rest_update`: PUT 200, re-priced, `createdAt` unchanged
//! - `test_rest_update_is_idempotent`: same PUT twice, same state
//! - `test_rest_delete`: DELETE 200, then GET 404
//!
//! ## List
//! - `test_rest_search_pagination`: 12 matches, page 2 of limit 5
//! - `test_rest_list_filters_and_sort`
//!
//! ## Errors
//! - validation, malformed ids, unknown ids, unmatched routes
#[macro_export]
macro_rules! rest_integration_tests {
    ($store_factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use catalog::core::store::ProductStore;
            use serde_json::{Value, json};
            use std::sync::Arc;

            async fn make_server() -> TestServer {
                let store = $store_factory;
                let store: Arc<dyn ProductStore> = Arc::new(store);
                TestServer::new(storage_harness::build_test_router(store))
            }

            async fn create(server: &TestServer, body: Value) -> Value {
                let response = server.post("/api/products").json(&body).await;
                response.assert_status(StatusCode::CREATED);
                response.json::<Value>()["data"].clone()
            }

            // ==============================================================
            // CRUD
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create() {
                let server = make_server().await;

                let response = server
                    .post("/api/products")
                    .json(&json!({
                        "name": "Widget",
                        "price": 100,
                        "discount": 25,
                        "image": "http://x/y.png"
                    }))
                    .await;

                response.assert_status(StatusCode::CREATED);

                let body: Value = response.json();
                assert_eq!(body["success"], true);
                let data = &body["data"];
                assert_eq!(data["updatedPrice"], 75.0);
                assert_eq!(data["creator"], "Unknown");
                assert_eq!(data["description"], "");
                assert_eq!(data["stock"], 0);
                uuid::Uuid::parse_str(data["id"].as_str().unwrap()).unwrap();
            }

            #[tokio::test]
            async fn test_rest_create_ignores_client_owned_price() {
                let server = make_server().await;

                let data = create(
                    &server,
                    json!({
                        "name": "Widget",
                        "price": 80,
                        "discount": 50,
                        "updatedPrice": 1,
                        "image": "http://x/y.png"
                    }),
                )
                .await;

                assert_eq!(data["updatedPrice"], 40.0);
            }

            #[tokio::test]
            async fn test_rest_create_from_form_strings() {
                let server = make_server().await;

                let data = create(
                    &server,
                    json!({
                        "name": "  Lamp  ",
                        "price": "19.99",
                        "discount": "",
                        "stock": "3",
                        "creator": "",
                        "image": "https://shop.example/lamp.png"
                    }),
                )
                .await;

                assert_eq!(data["name"], "Lamp");
                assert_eq!(data["price"], 19.99);
                assert_eq!(data["discount"], 0.0);
                assert_eq!(data["updatedPrice"], 19.99);
                assert_eq!(data["stock"], 3);
                assert_eq!(data["creator"], "Unknown");
            }

            #[tokio::test]
            async fn test_rest_create_then_get() {
                let server = make_server().await;

                let created = create(
                    &server,
                    json!({
                        "name": "Oak chair",
                        "price": 120.5,
                        "discount": 10,
                        "image": "data:image/png;base64,iVBORw0KGgo=",
                        "creator": "Woodworks",
                        "description": "Solid oak",
                        "stock": 4
                    }),
                )
                .await;
                let id = created["id"].as_str().unwrap();

                let response = server.get(&format!("/api/products/{}", id)).await;
                response.assert_status(StatusCode::OK);

                let fetched = response.json::<Value>()["data"].clone();
                for field in ["id", "name", "price", "discount", "updatedPrice", "image", "creator", "description", "stock"] {
                    assert_eq!(fetched[field], created[field], "field {}", field);
                }
                assert_eq!(fetched["updatedPrice"], 108.45);
            }

            #[tokio::test]
            async fn test_rest_update() {
                let server = make_server().await;
                let created = create(&server, payload("Widget", 100.0)).await;
                let id = created["id"].as_str().unwrap();

                let response = server
                    .put(&format!("/api/products/{}", id))
                    .json(&json!({ "discount": 10 }))
                    .await;

                response.assert_status(StatusCode::OK);
                let data = response.json::<Value>()["data"].clone();
                assert_eq!(data["name"], "Widget");
                assert_eq!(data["price"], 100.0);
                assert_eq!(data["discount"], 10.0);
                assert_eq!(data["updatedPrice"], 90.0);
                assert_eq!(data["createdAt"], created["createdAt"]);
            }

            #[tokio::test]
            async fn test_rest_update_is_idempotent() {
                let server = make_server().await;
                let created = create(&server, payload("Widget", 50.0)).await;
                let path = format!("/api/products/{}", created["id"].as_str().unwrap());
                let patch = json!({ "price": 60, "discount": 15, "stock": 2 });

                let first = server.put(&path).json(&patch).await.json::<Value>()["data"].clone();
                let second = server.put(&path).json(&patch).await.json::<Value>()["data"].clone();

                for field in ["id", "name", "price", "discount", "updatedPrice", "image", "creator", "description", "stock", "createdAt"] {
                    assert_eq!(first[field], second[field], "field {}", field);
                }
                assert_eq!(second["updatedPrice"], 51.0);
            }

            #[tokio::test]
            async fn test_rest_delete() {
                let server = make_server().await;
                let created = create(&server, payload("Widget", 10.0)).await;
                let id = created["id"].as_str().unwrap();

                let response = server.delete(&format!("/api/products/{}", id)).await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                assert_eq!(body["success"], true);
                assert_eq!(body["message"], "Product deleted");
                assert_eq!(body["data"]["id"], id);

                server
                    .get(&format!("/api/products/{}", id))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // List
            // ==============================================================

            #[tokio::test]
            async fn test_rest_search_pagination() {
                let server = make_server().await;
                for i in 0..12 {
                    create(&server, payload(&format!("Widget {}", i), 10.0 + i as f64)).await;
                }
                create(&server, payload("Lamp", 5.0)).await;

                let response = server.get("/api/products?search=widget&page=2&limit=5").await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                assert_eq!(body["data"].as_array().unwrap().len(), 5);
                assert_eq!(body["count"], 5);
                assert_eq!(body["total"], 12);
                assert_eq!(body["pagination"]["pages"], 3);
                assert_eq!(body["pagination"]["page"], 2);
                assert_eq!(body["pagination"]["hasNext"], true);
                assert_eq!(body["pagination"]["hasPrev"], true);
            }

            #[tokio::test]
            async fn test_rest_list_filters_and_sort() {
                let server = make_server().await;
                for (name, price, creator) in [
                    ("Alpha", 30.0, "Acme"),
                    ("Bravo", 10.0, "Acme"),
                    ("Charlie", 20.0, "Globex"),
                ] {
                    let mut body = payload(name, price);
                    body["creator"] = json!(creator);
                    create(&server, body).await;
                }

                let response = server
                    .get("/api/products?creator=Acme&minPrice=5&maxPrice=30&sortBy=price&sortOrder=asc")
                    .await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                let names: Vec<&str> = body["data"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|p| p["name"].as_str().unwrap())
                    .collect();
                assert_eq!(names, vec!["Bravo", "Alpha"]);
                assert_eq!(body["pagination"]["hasNext"], false);
            }

            #[tokio::test]
            async fn test_rest_list_page_past_the_end() {
                let server = make_server().await;
                for i in 0..3 {
                    create(&server, payload(&format!("Widget {}", i), 10.0)).await;
                }

                let response = server
                    .get(&format!("/api/products?page={}&limit=2", u64::MAX))
                    .await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                assert_eq!(body["count"], 0);
                assert!(body["data"].as_array().unwrap().is_empty());
                assert_eq!(body["total"], 3);
                assert_eq!(body["pagination"]["pages"], 2);
                assert_eq!(body["pagination"]["page"], u64::MAX);
                assert_eq!(body["pagination"]["hasNext"], false);
            }

            #[tokio::test]
            async fn test_rest_list_empty() {
                let server = make_server().await;

                let body: Value = server.get("/api/products").await.json();
                assert_eq!(body["success"], true);
                assert_eq!(body["total"], 0);
                assert_eq!(body["pagination"]["pages"], 0);
                assert_eq!(body["pagination"]["limit"], 10);
            }

            // ==============================================================
            // Errors
            // ==============================================================

            #[tokio::test]
            async fn test_rest_validation_error_lists_fields() {
                let server = make_server().await;

                let response = server
                    .post("/api/products")
                    .json(&json!({ "price": 0, "discount": 101, "image": "ftp://x" }))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["success"], false);
                let fields: Vec<&str> = body["errors"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|e| e["field"].as_str().unwrap())
                    .collect();
                assert_eq!(fields, vec!["name", "price", "discount", "image"]);
            }

            #[tokio::test]
            async fn test_rest_price_boundaries() {
                let server = make_server().await;

                server
                    .post("/api/products")
                    .json(&payload("Cheap", 0.01))
                    .await
                    .assert_status(StatusCode::CREATED);
                server
                    .post("/api/products")
                    .json(&payload("Free", 0.0))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);

                let mut full_discount = payload("Giveaway", 10.0);
                full_discount["discount"] = json!(100);
                let data = create(&server, full_discount).await;
                assert_eq!(data["updatedPrice"], 0.0);
            }

            #[tokio::test]
            async fn test_rest_update_rejects_invalid_values() {
                let server = make_server().await;
                let created = create(&server, payload("Widget", 10.0)).await;
                let path = format!("/api/products/{}", created["id"].as_str().unwrap());

                server
                    .put(&path)
                    .json(&json!({ "name": null }))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
                server
                    .put(&path)
                    .json(&json!({ "discount": 101 }))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_rest_malformed_json() {
                let server = make_server().await;

                let response = server
                    .post("/api/products")
                    .content_type("application/json")
                    .text("{ not json")
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                assert_eq!(response.json::<Value>()["success"], false);
            }

            #[tokio::test]
            async fn test_rest_invalid_list_params() {
                let server = make_server().await;

                server
                    .get("/api/products?sortBy=colour")
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
                server
                    .get("/api/products?minPrice=-1")
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
                server
                    .get("/api/products?page=abc")
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_rest_not_found() {
                let server = make_server().await;
                let fake_id = uuid::Uuid::new_v4();

                let response = server.get(&format!("/api/products/{}", fake_id)).await;
                response.assert_status(StatusCode::NOT_FOUND);
                assert_eq!(response.json::<Value>()["message"], "Product not found");

                let response = server.delete(&format!("/api/products/{}", fake_id)).await;
                response.assert_status(StatusCode::NOT_FOUND);
                assert_eq!(response.json::<Value>()["success"], false);

                server
                    .put(&format!("/api/products/{}", fake_id))
                    .json(&json!({ "stock": 1 }))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_malformed_id_is_not_found() {
                let server = make_server().await;

                server
                    .get("/api/products/not-a-uuid")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_unmatched_route() {
                let server = make_server().await;

                let response = server.get("/api/unknown").await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body: Value = response.json();
                assert_eq!(body["success"], false);
                assert_eq!(body["message"], "Route not found");
            }

            #[tokio::test]
            async fn test_rest_health_and_root() {
                let server = make_server().await;

                let body: Value = server.get("/health").await.json();
                assert_eq!(body["status"], "ok");

                let body: Value = server.get("/").await.json();
                assert_eq!(body["message"], "API running...");
            }
        }
    };
}

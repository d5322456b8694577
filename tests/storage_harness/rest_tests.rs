//! REST integration test macro for storage backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that run
//! the full stack over one backend:
//! JSON → HTTP request → identity → handler → ResourceService → repository → JSON.
//!
//! # Generated Tests
//!
//! ## Resources
//! - `test_rest_signup_hides_password_hash`: anonymous signup, 201
//! - `test_rest_get_user_ownership`: self and admin may read, others 403
//! - `test_rest_cart_owned_by_creator`: owner stamped from the caller
//! - `test_rest_update_cart`: PATCH 200 with the updated body
//! - `test_rest_delete_cart`: DELETE 204, then GET 404
//! - `test_rest_catalog_requires_seller`: products writable by sellers only
//!
//! ## Lifecycle
//! - `test_rest_disable_enable_cycle`: 204/409/404/204/409 sequence
//! - `test_rest_enable_by_stranger_forbidden`: 403 after the guard passes
//! - `test_rest_include_inactive_admin_only`
//!
//! ## Listing
//! - `test_rest_list_scoped_to_owner`
//! - `test_rest_list_pagination`
//! - `test_rest_list_filter_and_sort`
//! - `test_rest_list_invalid_filter`
//!
//! ## Related collections
//! - `test_rest_related_carts_of_user`
//! - `test_rest_related_ratings_of_product`
//! - `test_rest_unknown_relation`
//!
//! ## Errors
//! - `test_rest_unauthenticated`
//! - `test_rest_invalid_id`
//! - `test_rest_invalid_identity_header`
//! - `test_rest_patch_rejects_protected_fields`
//! - `test_rest_validation_failure_details`
//! - `test_rest_malformed_json`
#[macro_export]
macro_rules! rest_integration_tests {
    ($factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use serde_json::{Value, json};

            async fn make_server() -> axum_test::TestServer {
                test_server($factory)
            }

            async fn create_cart(server: &axum_test::TestServer, owner: &Identity) -> String {
                let response = server
                    .post("/shopping-carts")
                    .as_caller(owner)
                    .json(&json!({ "items": [] }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                body["id"].as_str().unwrap().to_string()
            }

            async fn create_product(
                server: &axum_test::TestServer,
                seller: &Identity,
                name: &str,
                price_cents: i64,
            ) -> String {
                let response = server
                    .post("/products")
                    .as_caller(seller)
                    .json(&json!({ "name": name, "price_cents": price_cents }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                body["id"].as_str().unwrap().to_string()
            }

            // ==============================================================
            // Health
            // ==============================================================

            #[tokio::test]
            async fn test_rest_health() {
                let server = make_server().await;
                let response = server.get("/health").await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["status"], "ok");
                assert_eq!(body["service"], "shopfront");
            }

            // ==============================================================
            // Resources
            // ==============================================================

            #[tokio::test]
            async fn test_rest_signup_hides_password_hash() {
                let server = make_server().await;

                let response = server
                    .post("/users")
                    .json(&json!({
                        "email": "ada@example.com",
                        "name": "Ada",
                        "password": "analytical-engine"
                    }))
                    .await;

                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                assert_eq!(body["email"], "ada@example.com");
                assert_eq!(body["role"], "user");
                assert_eq!(body["is_active"], true);
                assert!(body.get("password_hash").is_none());
                assert!(body.get("password").is_none());
                Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();
            }

            #[tokio::test]
            async fn test_rest_signup_with_role_requires_admin() {
                let server = make_server().await;
                let draft = json!({
                    "email": "root@example.com",
                    "name": "Root",
                    "password": "correct-horse",
                    "role": "admin"
                });

                server
                    .post("/users")
                    .json(&draft)
                    .await
                    .assert_status(StatusCode::UNAUTHORIZED);
                server
                    .post("/users")
                    .as_caller(&user())
                    .json(&draft)
                    .await
                    .assert_status(StatusCode::FORBIDDEN);

                let response = server.post("/users").as_caller(&admin()).json(&draft).await;
                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                assert_eq!(body["role"], "admin");
            }

            #[tokio::test]
            async fn test_rest_get_user_ownership() {
                let server = make_server().await;
                let created: Value = server
                    .post("/users")
                    .json(&json!({
                        "email": "one@example.com",
                        "name": "One",
                        "password": "password-one"
                    }))
                    .await
                    .json();
                let id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();
                let path = format!("/users/{}", id);

                server
                    .get(&path)
                    .as_caller(&Identity::user(id))
                    .await
                    .assert_status(StatusCode::OK);

                let response = server.get(&path).as_caller(&user()).await;
                response.assert_status(StatusCode::FORBIDDEN);
                let body: Value = response.json();
                assert_eq!(body["code"], "FORBIDDEN");

                server
                    .get(&path)
                    .as_caller(&admin())
                    .await
                    .assert_status(StatusCode::OK);
            }

            #[tokio::test]
            async fn test_rest_cart_owned_by_creator() {
                let server = make_server().await;
                let owner = user();

                let response = server
                    .post("/shopping-carts")
                    .as_caller(&owner)
                    .json(&json!({
                        "items": [{ "product_id": Uuid::new_v4(), "quantity": 2 }]
                    }))
                    .await;

                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                assert_eq!(body["owner_id"], owner.id.to_string());
                assert_eq!(body["items"][0]["quantity"], 2);
            }

            #[tokio::test]
            async fn test_rest_update_cart() {
                let server = make_server().await;
                let owner = user();
                let id = create_cart(&server, &owner).await;
                let product_id = Uuid::new_v4();

                let response = server
                    .patch(&format!("/shopping-carts/{}", id))
                    .as_caller(&owner)
                    .json(&json!({
                        "items": [{ "product_id": product_id, "quantity": 3 }]
                    }))
                    .await;

                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["id"], id);
                assert_eq!(body["owner_id"], owner.id.to_string());
                assert_eq!(body["items"][0]["product_id"], product_id.to_string());

                server
                    .patch(&format!("/shopping-carts/{}", id))
                    .as_caller(&user())
                    .json(&json!({ "items": [] }))
                    .await
                    .assert_status(StatusCode::FORBIDDEN);
            }

            #[tokio::test]
            async fn test_rest_delete_cart() {
                let server = make_server().await;
                let owner = user();
                let id = create_cart(&server, &owner).await;
                let path = format!("/shopping-carts/{}", id);

                server
                    .delete(&path)
                    .as_caller(&owner)
                    .await
                    .assert_status(StatusCode::NO_CONTENT);
                server
                    .get(&path)
                    .as_caller(&owner)
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .delete(&path)
                    .as_caller(&admin())
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_catalog_requires_seller() {
                let server = make_server().await;
                let draft = json!({ "name": "Kettle", "price_cents": 2500 });

                server
                    .post("/products")
                    .as_caller(&user())
                    .json(&draft)
                    .await
                    .assert_status(StatusCode::FORBIDDEN);

                let id = create_product(&server, &seller(), "Kettle", 2500).await;

                // Ownerless records are readable by every caller
                let response = server
                    .get(&format!("/products/{}", id))
                    .as_caller(&user())
                    .await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["name"], "Kettle");

                server
                    .patch(&format!("/products/{}", id))
                    .as_caller(&user())
                    .json(&json!({ "price_cents": 1 }))
                    .await
                    .assert_status(StatusCode::FORBIDDEN);
            }

            // ==============================================================
            // Lifecycle
            // ==============================================================

            #[tokio::test]
            async fn test_rest_disable_enable_cycle() {
                let server = make_server().await;
                let owner = user();
                let id = create_cart(&server, &owner).await;
                let path = format!("/shopping-carts/{}", id);

                server
                    .post(&format!("{}/disable", path))
                    .as_caller(&admin())
                    .await
                    .assert_status(StatusCode::NO_CONTENT);

                let again = server
                    .post(&format!("{}/disable", path))
                    .as_caller(&admin())
                    .await;
                again.assert_status(StatusCode::CONFLICT);
                let body: Value = again.json();
                assert_eq!(body["code"], "ALREADY_DISABLED");
                assert_eq!(body["details"]["id"], id);

                server
                    .get(&path)
                    .as_caller(&owner)
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .patch(&path)
                    .as_caller(&owner)
                    .json(&json!({ "items": [] }))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);

                server
                    .post(&format!("{}/enable", path))
                    .as_caller(&admin())
                    .await
                    .assert_status(StatusCode::NO_CONTENT);

                let again = server
                    .post(&format!("{}/enable", path))
                    .as_caller(&admin())
                    .await;
                again.assert_status(StatusCode::CONFLICT);
                let body: Value = again.json();
                assert_eq!(body["code"], "ALREADY_ENABLED");

                server
                    .get(&path)
                    .as_caller(&owner)
                    .await
                    .assert_status(StatusCode::OK);
            }

            #[tokio::test]
            async fn test_rest_enable_by_stranger_forbidden() {
                let server = make_server().await;
                let owner = user();
                let stranger = user();
                let id = create_cart(&server, &owner).await;
                let path = format!("/shopping-carts/{}", id);

                server
                    .post(&format!("{}/disable", path))
                    .as_caller(&owner)
                    .await
                    .assert_status(StatusCode::NO_CONTENT);

                let response = server
                    .post(&format!("{}/enable", path))
                    .as_caller(&stranger)
                    .await;
                response.assert_status(StatusCode::FORBIDDEN);
                let body: Value = response.json();
                assert_eq!(body["code"], "FORBIDDEN");

                let again = server
                    .post(&format!("{}/disable", path))
                    .as_caller(&stranger)
                    .await;
                again.assert_status(StatusCode::CONFLICT);

                server
                    .post(&format!("{}/enable", path))
                    .as_caller(&owner)
                    .await
                    .assert_status(StatusCode::NO_CONTENT);
            }

            #[tokio::test]
            async fn test_rest_include_inactive_admin_only() {
                let server = make_server().await;
                let owner = user();
                let id = create_cart(&server, &owner).await;
                server
                    .post(&format!("/shopping-carts/{}/disable", id))
                    .as_caller(&owner)
                    .await
                    .assert_status(StatusCode::NO_CONTENT);

                let listed: Value = server
                    .get("/shopping-carts")
                    .as_caller(&owner)
                    .await
                    .json();
                assert_eq!(listed["pagination"]["total"], 0);

                server
                    .get("/shopping-carts?include_inactive=true")
                    .as_caller(&owner)
                    .await
                    .assert_status(StatusCode::FORBIDDEN);

                let response = server
                    .get("/shopping-carts?include_inactive=true")
                    .as_caller(&admin())
                    .await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["pagination"]["total"], 1);
                assert_eq!(body["data"][0]["is_active"], false);
            }

            // ==============================================================
            // Listing
            // ==============================================================

            #[tokio::test]
            async fn test_rest_list_scoped_to_owner() {
                let server = make_server().await;
                let alice = user();
                let bob = user();
                create_cart(&server, &alice).await;
                create_cart(&server, &alice).await;
                create_cart(&server, &bob).await;

                let body: Value = server.get("/shopping-carts").as_caller(&alice).await.json();
                assert_eq!(body["pagination"]["total"], 2);
                for cart in body["data"].as_array().unwrap() {
                    assert_eq!(cart["owner_id"], alice.id.to_string());
                }

                let body: Value = server.get("/shopping-carts").as_caller(&admin()).await.json();
                assert_eq!(body["pagination"]["total"], 3);
            }

            #[tokio::test]
            async fn test_rest_list_pagination() {
                let server = make_server().await;
                let seller = seller();
                for i in 0..5 {
                    create_product(&server, &seller, &format!("Product {}", i), 100 * i).await;
                }

                let response = server
                    .get("/products?page=2&limit=2")
                    .as_caller(&user())
                    .await;

                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["data"].as_array().unwrap().len(), 2);
                assert_eq!(body["pagination"]["page"], 2);
                assert_eq!(body["pagination"]["limit"], 2);
                assert_eq!(body["pagination"]["total"], 5);
                assert_eq!(body["pagination"]["total_pages"], 3);
                assert_eq!(body["pagination"]["has_prev"], true);
                assert_eq!(body["pagination"]["has_next"], true);
            }

            #[tokio::test]
            async fn test_rest_list_filter_and_sort() {
                let server = make_server().await;
                let seller = seller();
                create_product(&server, &seller, "Mug", 800).await;
                create_product(&server, &seller, "Toaster", 4000).await;
                create_product(&server, &seller, "Kettle", 2500).await;

                let response = server
                    .get("/products")
                    .add_query_param("filter", json!({ "price_cents>=": 2500 }).to_string())
                    .add_query_param("sort", "price_cents:desc")
                    .as_caller(&user())
                    .await;

                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                let names: Vec<_> = body["data"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|p| p["name"].as_str().unwrap().to_string())
                    .collect();
                assert_eq!(names, vec!["Toaster", "Kettle"]);
            }

            #[tokio::test]
            async fn test_rest_list_invalid_filter() {
                let server = make_server().await;
                let caller = user();

                let response = server
                    .get("/products?filter=not-json")
                    .as_caller(&caller)
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_FILTER");

                let response = server
                    .get("/products")
                    .add_query_param("filter", json!({ "colour": "red" }).to_string())
                    .as_caller(&caller)
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);

                server
                    .get("/products?sort=colour")
                    .as_caller(&caller)
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
            }

            // ==============================================================
            // Related collections
            // ==============================================================

            #[tokio::test]
            async fn test_rest_related_carts_of_user() {
                let server = make_server().await;
                let created: Value = server
                    .post("/users")
                    .json(&json!({
                        "email": "carts@example.com",
                        "name": "Carts",
                        "password": "many-carts"
                    }))
                    .await
                    .json();
                let id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();
                let owner = Identity::user(id);
                create_cart(&server, &owner).await;
                create_cart(&server, &owner).await;
                create_cart(&server, &user()).await;

                let path = format!("/users/{}/shopping-carts", id);
                let body: Value = server.get(&path).as_caller(&owner).await.json();
                assert_eq!(body["pagination"]["total"], 2);

                let body: Value = server.get(&path).as_caller(&admin()).await.json();
                assert_eq!(body["pagination"]["total"], 2);

                server
                    .get(&path)
                    .as_caller(&user())
                    .await
                    .assert_status(StatusCode::FORBIDDEN);
            }

            #[tokio::test]
            async fn test_rest_related_ratings_of_product() {
                let server = make_server().await;
                let product_id = create_product(&server, &seller(), "Kettle", 2500).await;
                let other_product = create_product(&server, &seller(), "Mug", 800).await;
                let rater = user();

                for (product, score) in [(&product_id, 5), (&product_id, 3), (&other_product, 1)] {
                    server
                        .post("/ratings")
                        .as_caller(&rater)
                        .json(&json!({ "product_id": product, "score": score }))
                        .await
                        .assert_status(StatusCode::CREATED);
                }

                let response = server
                    .get(&format!("/products/{}/ratings?sort=score", product_id))
                    .as_caller(&rater)
                    .await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["pagination"]["total"], 2);
                assert_eq!(body["data"][0]["score"], 3);
                assert_eq!(body["data"][1]["score"], 5);
            }

            #[tokio::test]
            async fn test_rest_unknown_relation() {
                let server = make_server().await;
                let owner = user();
                let id = create_cart(&server, &owner).await;

                let response = server
                    .get(&format!("/shopping-carts/{}/orders", id))
                    .as_caller(&owner)
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_eq!(body["code"], "UNKNOWN_RELATION");
            }

            // ==============================================================
            // Errors
            // ==============================================================

            #[tokio::test]
            async fn test_rest_unauthenticated() {
                let server = make_server().await;
                let response = server.get("/shopping-carts").await;
                response.assert_status(StatusCode::UNAUTHORIZED);
                let body: Value = response.json();
                assert_eq!(body["code"], "UNAUTHENTICATED");

                server
                    .post("/shopping-carts")
                    .json(&json!({ "items": [] }))
                    .await
                    .assert_status(StatusCode::UNAUTHORIZED);
            }

            #[tokio::test]
            async fn test_rest_invalid_id() {
                let server = make_server().await;
                let response = server
                    .get("/shopping-carts/not-a-valid-uuid")
                    .as_caller(&user())
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_ID");
            }

            #[tokio::test]
            async fn test_rest_invalid_identity_header() {
                let server = make_server().await;
                let response = server
                    .get("/shopping-carts")
                    .add_header(
                        axum::http::HeaderName::from_static("x-user-id"),
                        axum::http::HeaderValue::from_static("5"),
                    )
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_HEADER");
            }

            #[tokio::test]
            async fn test_rest_patch_rejects_protected_fields() {
                let server = make_server().await;
                let owner = user();
                let id = create_cart(&server, &owner).await;
                let path = format!("/shopping-carts/{}", id);

                for body in [
                    json!({ "owner_id": Uuid::new_v4() }),
                    json!({ "id": Uuid::new_v4() }),
                    json!({ "is_active": false }),
                ] {
                    let response = server.patch(&path).as_caller(&owner).json(&body).await;
                    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
                    let error: Value = response.json();
                    assert_eq!(error["code"], "VALIDATION_FAILED");
                }

                let body: Value = server.get(&path).as_caller(&owner).await.json();
                assert_eq!(body["owner_id"], owner.id.to_string());
                assert_eq!(body["is_active"], true);
            }

            #[tokio::test]
            async fn test_rest_validation_failure_details() {
                let server = make_server().await;
                let response = server
                    .post("/users")
                    .json(&json!({
                        "email": "not-an-email",
                        "name": "Short",
                        "password": "short"
                    }))
                    .await;

                response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
                let body: Value = response.json();
                assert_eq!(body["code"], "VALIDATION_FAILED");
                let fields: Vec<_> = body["details"]["fields"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|f| f["field"].as_str().unwrap().to_string())
                    .collect();
                assert_eq!(fields, vec!["email", "password"]);
            }

            #[tokio::test]
            async fn test_rest_malformed_json() {
                let server = make_server().await;
                let response = server
                    .post("/shopping-carts")
                    .as_caller(&user())
                    .content_type("application/json")
                    .bytes("{ not json".into())
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_JSON");
            }
        }
    };
}

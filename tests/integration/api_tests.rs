//! Live server tests
//!
//! Start the server with `BOOKSHELF_AUTH__ADMIN_USERNAME=admin` and
//! `BOOKSHELF_AUTH__ADMIN_PASSWORD=admin`, then run `cargo test -- --ignored`.

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Helper to get a bearer token for the admin account
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/accounts/login/", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_home_page() {
    let response = client()
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["template"], "book/home.html");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let response = client()
        .post(format!("{}/accounts/login/", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_anonymous_create_is_forbidden() {
    let response = client()
        .post(format!("{}/publisheradd/", BASE_URL))
        .form(&[("name", "anonymous")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_publisher_lifecycle() {
    let client = client();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/publisheradd/", BASE_URL))
        .bearer_auth(&token)
        .form(&[("name", "integration press"), ("city", "bwp")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()["location"], "/publishers/");

    // Walk the list to the last page to find the new record
    let first: Value = client
        .get(format!("{}/publishers/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let last_page = first["context"]["page_obj"]["num_pages"].as_i64().unwrap();
    let page: Value = client
        .get(format!("{}/publishers/?page={}", BASE_URL, last_page))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let created = page["context"]["publisher_list"]
        .as_array()
        .and_then(|list| list.last())
        .cloned()
        .expect("No publisher on the last page");
    let id = created["id"].as_i64().expect("No publisher ID");

    let response = client
        .post(format!("{}/publisherupdate/{}/", BASE_URL, id))
        .bearer_auth(&token)
        .form(&[("name", "integration press"), ("address", "new blog")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FOUND);

    let detail: Value = client
        .get(format!("{}/{}/", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(detail["context"]["publisher"]["address"], "new blog");

    let response = client
        .post(format!("{}/publisher/{}/delete/", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = client
        .get(format!("{}/{}/", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

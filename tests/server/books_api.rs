use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use crate::helpers::{
    create_book, create_book_response, fetch_feed, register_user, spawn_app,
    spawn_app_with_failing_destroy, spawn_app_with_failing_upload,
};

#[tokio::test]
async fn book_routes_require_a_bearer_token() {
    let app = spawn_app().await;
    let client = Client::new();

    let missing = client
        .get(app.api_url("/books"))
        .send()
        .await
        .expect("failed to send request");
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    let body: Value = missing.json().await.expect("response not JSON");
    assert_eq!(body["message"], "No authentication token, access denied");

    let garbage = client
        .get(app.api_url("/books"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .expect("failed to send request");
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    let body: Value = garbage.json().await.expect("response not JSON");
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn tampered_token_signatures_are_rejected() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@example.com", "hunter22").await;

    let mut tampered = token.clone();
    let last = tampered.pop().expect("token is empty");
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let response = Client::new()
        .get(app.api_url("/books"))
        .bearer_auth(&tampered)
        .send()
        .await
        .expect("failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("response not JSON");
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn create_book_stores_hosted_image_url() {
    let app = spawn_app().await;
    let (token, user) = register_user(&app, "alice", "alice@example.com", "hunter22").await;

    let book = create_book(&app, &token, "Dune", 5).await;

    assert_eq!(book["title"], "Dune");
    assert_eq!(book["rating"], 5);
    assert_eq!(book["user_id"], user["id"]);
    assert_eq!(book["image_url"], app.hosted_image_url());
    assert!(book["id"].is_i64());
    assert!(book["created_at"].is_string());
}

#[tokio::test]
async fn create_book_rejects_missing_fields() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@example.com", "hunter22").await;

    for payload in [
        json!({ "caption": "no title", "image": "data:x", "rating": 3 }),
        json!({ "title": "no caption", "image": "data:x", "rating": 3 }),
        json!({ "title": "no image", "caption": "c", "rating": 3 }),
        json!({ "title": "no rating", "caption": "c", "image": "data:x" }),
        json!({ "title": "zero rating", "caption": "c", "image": "data:x", "rating": 0 }),
    ] {
        let response = create_book_response(&app, &token, &payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
        let body: Value = response.json().await.expect("response not JSON");
        assert_eq!(body["message"], "All fields are required");
    }
}

#[tokio::test]
async fn create_book_rejects_out_of_range_rating() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@example.com", "hunter22").await;

    for rating in [6, -1, 100] {
        let response = create_book_response(
            &app,
            &token,
            &json!({
                "title": "Dune",
                "caption": "spice",
                "image": "data:image/png;base64,aGVsbG8=",
                "rating": rating,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "rating: {rating}");
        let body: Value = response.json().await.expect("response not JSON");
        assert_eq!(body["message"], "Rating must be between 1 and 5");
    }
}

#[tokio::test]
async fn create_fails_when_image_host_rejects_upload() {
    let app = spawn_app_with_failing_upload().await;
    let (token, _) = register_user(&app, "alice", "alice@example.com", "hunter22").await;

    let response = create_book_response(
        &app,
        &token,
        &json!({
            "title": "Dune",
            "caption": "spice",
            "image": "data:image/png;base64,aGVsbG8=",
            "rating": 5,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("response not JSON");
    assert_eq!(body["message"], "Error uploading image");

    // Nothing was persisted
    let feed = fetch_feed(&app, &token, "").await;
    assert_eq!(feed["totalBooks"], 0);
}

#[tokio::test]
async fn delete_removes_post_and_hosted_image() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@example.com", "hunter22").await;
    let book = create_book(&app, &token, "Dune", 5).await;

    let response = Client::new()
        .delete(app.api_url(&format!("/books/{}", book["id"])))
        .bearer_auth(&token)
        .send()
        .await
        .expect("failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("response not JSON");
    assert_eq!(body["message"], "Book deleted successfully");

    let feed = fetch_feed(&app, &token, "").await;
    assert_eq!(feed["totalBooks"], 0);
    assert_eq!(feed["books"].as_array().expect("books missing").len(), 0);

    // The image host must have been asked to destroy the upload
    let destroys = app
        .image_host
        .received_requests()
        .await
        .expect("mock server not recording")
        .into_iter()
        .filter(|r| r.url.path() == "/destroy")
        .count();
    assert_eq!(destroys, 1);
}

#[tokio::test]
async fn delete_rejects_non_owner() {
    let app = spawn_app().await;
    let (alice_token, _) = register_user(&app, "alice", "alice@example.com", "hunter22").await;
    let (bob_token, _) = register_user(&app, "bob", "bob@example.com", "hunter22").await;

    let book = create_book(&app, &alice_token, "Dune", 5).await;

    let response = Client::new()
        .delete(app.api_url(&format!("/books/{}", book["id"])))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("response not JSON");
    assert_eq!(body["message"], "Not authorized");

    // Post survives
    let feed = fetch_feed(&app, &alice_token, "").await;
    assert_eq!(feed["totalBooks"], 1);
}

#[tokio::test]
async fn delete_unknown_book_returns_not_found() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "alice", "alice@example.com", "hunter22").await;

    let response = Client::new()
        .delete(app.api_url("/books/9999"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("response not JSON");
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
async fn delete_fails_when_image_host_rejects_destroy() {
    let app = spawn_app_with_failing_destroy().await;
    let (token, _) = register_user(&app, "alice", "alice@example.com", "hunter22").await;
    let book = create_book(&app, &token, "Dune", 5).await;

    let response = Client::new()
        .delete(app.api_url(&format!("/books/{}", book["id"])))
        .bearer_auth(&token)
        .send()
        .await
        .expect("failed to send request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("response not JSON");
    assert_eq!(body["message"], "Error deleting hosted image");

    // Record must remain when the hosted image could not be removed
    let feed = fetch_feed(&app, &token, "").await;
    assert_eq!(feed["totalBooks"], 1);
}

#[tokio::test]
async fn owned_books_lists_only_the_callers_posts() {
    let app = spawn_app().await;
    let (alice_token, _) = register_user(&app, "alice", "alice@example.com", "hunter22").await;
    let (bob_token, _) = register_user(&app, "bob", "bob@example.com", "hunter22").await;

    create_book(&app, &alice_token, "Dune", 5).await;
    create_book(&app, &bob_token, "Neuromancer", 4).await;
    create_book(&app, &alice_token, "Hyperion", 3).await;

    let response = Client::new()
        .get(app.api_url("/books/user"))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("response not JSON");
    let books = body["books"].as_array().expect("books missing");

    assert_eq!(books.len(), 2);
    // Newest first
    assert_eq!(books[0]["title"], "Hyperion");
    assert_eq!(books[1]["title"], "Dune");
}

#[tokio::test]
async fn feed_includes_owner_projection() {
    let app = spawn_app().await;
    let (token, user) = register_user(&app, "alice", "alice@example.com", "hunter22").await;
    create_book(&app, &token, "Dune", 5).await;

    let feed = fetch_feed(&app, &token, "").await;
    let book = &feed["books"][0];

    assert_eq!(book["user"]["username"], "alice");
    assert_eq!(book["user"]["avatar_url"], user["avatar_url"]);
    // Owner projection carries no email or password material
    let owner_keys: Vec<&String> = book["user"]
        .as_object()
        .expect("owner not an object")
        .keys()
        .collect();
    assert_eq!(owner_keys.len(), 2);
}

// End-to-end walk through the main user journey: two users, a post,
// a failed cross-user delete, then a successful owner delete.
#[tokio::test]
async fn full_user_journey() {
    let app = spawn_app().await;
    let client = Client::new();

    let (alice_token, _) = register_user(&app, "alice", "alice@example.com", "secret123").await;
    let book = create_book(&app, &alice_token, "Dune", 5).await;

    let (bob_token, _) = register_user(&app, "bob", "bob@example.com", "secret456").await;

    let bob_feed = fetch_feed(&app, &bob_token, "?page=1&limit=5").await;
    assert_eq!(bob_feed["totalBooks"], 1);
    assert_eq!(bob_feed["books"][0]["title"], "Dune");
    assert_eq!(bob_feed["books"][0]["user"]["username"], "alice");

    let bob_delete = client
        .delete(app.api_url(&format!("/books/{}", book["id"])))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("failed to send request");
    assert_eq!(bob_delete.status(), StatusCode::UNAUTHORIZED);

    let alice_delete = client
        .delete(app.api_url(&format!("/books/{}", book["id"])))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("failed to send request");
    assert_eq!(alice_delete.status(), StatusCode::OK);

    let final_feed = fetch_feed(&app, &alice_token, "").await;
    assert_eq!(final_feed["totalBooks"], 0);
}

use std::sync::Arc;

use bookfeed::application::routes::app_router;
use bookfeed::application::state::{AppState, AppStateConfig};
use bookfeed::domain::repositories::{BookPostRepository, UserRepository};
use reqwest::Client;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::AbortHandle;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestApp {
    pub address: String,
    #[allow(dead_code)]
    pub user_repo: Arc<dyn UserRepository>,
    #[allow(dead_code)]
    pub book_repo: Arc<dyn BookPostRepository>,
    pub image_host: MockServer,
    server_handle: AbortHandle,
}

impl TestApp {
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.address, path)
    }

    /// The URL the mock image host reports for every upload.
    pub fn hosted_image_url(&self) -> String {
        format!("{}/hosted/abc123.jpg", self.image_host.uri())
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub async fn spawn_app() -> TestApp {
    let image_host = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secure_url": format!("{}/hosted/abc123.jpg", image_host.uri()),
            "public_id": "abc123",
        })))
        .mount(&image_host)
        .await;

    Mock::given(method("POST"))
        .and(path("/destroy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
        .mount(&image_host)
        .await;

    spawn_app_inner(image_host).await
}

/// Like `spawn_app`, but the image host accepts uploads and rejects destroys.
pub async fn spawn_app_with_failing_destroy() -> TestApp {
    let image_host = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secure_url": format!("{}/hosted/abc123.jpg", image_host.uri()),
            "public_id": "abc123",
        })))
        .mount(&image_host)
        .await;

    Mock::given(method("POST"))
        .and(path("/destroy"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&image_host)
        .await;

    spawn_app_inner(image_host).await
}

/// Like `spawn_app`, but the image host rejects every upload.
pub async fn spawn_app_with_failing_upload() -> TestApp {
    let image_host = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&image_host)
        .await;

    spawn_app_inner(image_host).await
}

async fn spawn_app_inner(image_host: MockServer) -> TestApp {
    let database = bookfeed::infrastructure::database::Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    let state = AppState::from_database(
        &database,
        AppStateConfig {
            token_secret: "test-secret".to_string(),
            image_provider_url: image_host.uri(),
            image_provider_key: String::new(),
        },
    );

    // Clone repos we need for TestApp before consuming state in the router
    let user_repo = state.user_repo.clone();
    let book_repo = state.book_repo.clone();

    let app = app_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");

    let local_addr = listener.local_addr().expect("Failed to get local address");
    let address = format!("http://{}", local_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Server failed to start");
    })
    .abort_handle();

    TestApp {
        address,
        user_repo,
        book_repo,
        image_host,
        server_handle,
    }
}

/// Register a user and return `(token, user)` from the response body.
pub async fn register_user(app: &TestApp, username: &str, email: &str, password: &str) -> (String, Value) {
    let response = Client::new()
        .post(app.api_url("/auth/register"))
        .json(&json!({
            "username": username,
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .expect("failed to send register request");

    assert_eq!(
        response.status(),
        reqwest::StatusCode::CREATED,
        "registration of {username} should succeed"
    );

    let body: Value = response.json().await.expect("register response not JSON");
    let token = body["token"].as_str().expect("missing token").to_string();
    (token, body["user"].clone())
}

/// Create a book post with the given bearer token, returning the raw response.
pub async fn create_book_response(
    app: &TestApp,
    token: &str,
    payload: &Value,
) -> reqwest::Response {
    Client::new()
        .post(app.api_url("/books"))
        .bearer_auth(token)
        .json(payload)
        .send()
        .await
        .expect("failed to send create book request")
}

/// Create a book post and return its JSON body, asserting 201.
pub async fn create_book(app: &TestApp, token: &str, title: &str, rating: i64) -> Value {
    let response = create_book_response(
        app,
        token,
        &json!({
            "title": title,
            "caption": format!("caption for {title}"),
            "image": "data:image/png;base64,aGVsbG8=",
            "rating": rating,
        }),
    )
    .await;

    assert_eq!(
        response.status(),
        reqwest::StatusCode::CREATED,
        "creating {title} should succeed"
    );
    response.json().await.expect("create book response not JSON")
}

/// Fetch a feed page as JSON.
pub async fn fetch_feed(app: &TestApp, token: &str, query: &str) -> Value {
    let response = Client::new()
        .get(format!("{}{}", app.api_url("/books"), query))
        .bearer_auth(token)
        .send()
        .await
        .expect("failed to fetch feed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.json().await.expect("feed response not JSON")
}

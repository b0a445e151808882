//! Request shape and error mapping, checked against wiremock

use personal_library::{
    config::ApiConfig,
    error::{AppError, NETWORK_ERROR_MESSAGE},
    models::{BookFields, ImageChange, ImageUpload},
    ApiClient, Session,
};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

fn config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        image_base_url: None,
        timeout_secs: None,
    }
}

async fn client_with_token(server: &MockServer, token: Option<&str>) -> ApiClient {
    let session = Session::ephemeral();
    if let Some(token) = token {
        session.set_credential(token).await.unwrap();
    }
    ApiClient::new(&config(&server.uri()), session).unwrap()
}

fn body_text(request: &Request) -> String {
    String::from_utf8_lossy(&request.body).into_owned()
}

#[tokio::test]
async fn test_bearer_header_attached_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Dune", "author": "F. Herbert", "imagePath": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("tok-123")).await;
    let books = client.list_books().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Dune");
}

#[tokio::test]
async fn test_no_header_without_credential() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/books/9"))
        .and(|request: &Request| !request.headers.contains_key("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, None).await;
    let payload = client.delete_book(9).await.unwrap();
    assert_eq!(payload["message"], "ok");
}

#[tokio::test]
async fn test_non_array_list_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "odd"})))
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("t")).await;
    assert!(client.list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_failure_keeps_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Error fetching books"))
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("t")).await;
    let err = client.list_books().await.unwrap_err();
    assert_eq!(err.kind(), "FetchError");
    assert_eq!(
        err.to_string(),
        "Failed to fetch books (status 500): Error fetching books"
    );
    assert!(matches!(err, AppError::HttpStatus { body: Some(ref b), .. } if b == "Error fetching books"));
}

#[tokio::test]
async fn test_unreachable_server_is_connectivity_error() {
    // Grab a free port and close it again
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ApiClient::new(
        &config(&format!("http://127.0.0.1:{}", port)),
        Session::ephemeral(),
    )
    .unwrap();

    let err = client.list_books().await.unwrap_err();
    assert!(matches!(err, AppError::Connectivity { .. }));
    assert_eq!(err.kind(), "NetworkError");
    assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_configured_timeout_applies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut api = config(&server.uri());
    api.timeout_secs = Some(1);
    let client = ApiClient::new(&api, Session::ephemeral()).unwrap();

    let err = client.list_books().await.unwrap_err();
    assert!(matches!(err, AppError::Connectivity { .. }));
}

#[tokio::test]
async fn test_create_sends_multipart_with_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/books"))
        .and(header("authorization", "Bearer t"))
        .and(|request: &Request| {
            let body = body_text(request);
            let content_type = request
                .headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            content_type.starts_with("multipart/form-data")
                && body.contains("name=\"title\"")
                && body.contains("Dune")
                && body.contains("name=\"author\"")
                && body.contains("name=\"description\"")
                && body.contains("name=\"pagesTotal\"")
                && body.contains("name=\"image\"; filename=\"cover.png\"")
                && body.contains("image/png")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12, "title": "Dune", "author": "F. Herbert", "imagePath": "u_cover.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("t")).await;
    let book = client
        .create_book(
            &BookFields::new("Dune", "F. Herbert").with_pages(Some(412), None),
            Some(&ImageUpload::new("cover.png", vec![1, 2, 3])),
        )
        .await
        .unwrap();
    assert_eq!(book.id, 12);
    assert_eq!(book.image_path.as_deref(), Some("u_cover.png"));
}

#[tokio::test]
async fn test_update_image_keep_and_remove_shapes() {
    let server = MockServer::start().await;
    let reply = ResponseTemplate::new(200).set_body_json(json!({
        "id": 4, "title": "Emma", "author": "J. Austen"
    }));

    Mock::given(method("PUT"))
        .and(path("/api/books/4"))
        .and(|request: &Request| body_text(request).contains("name=\"removeImage\""))
        .and(|request: &Request| !body_text(request).contains("name=\"image\""))
        .respond_with(reply.clone())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/books/4"))
        .and(|request: &Request| {
            let body = body_text(request);
            !body.contains("name=\"removeImage\"") && !body.contains("name=\"image\"")
        })
        .respond_with(reply)
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("t")).await;
    let fields = BookFields::new("Emma", "J. Austen");
    client.update_book(4, &fields, &ImageChange::Remove).await.unwrap();
    client.update_book(4, &fields, &ImageChange::Keep).await.unwrap();
}

#[tokio::test]
async fn test_login_success_without_token_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Invalid credentials"})))
        .mount(&server)
        .await;

    let client = client_with_token(&server, None).await;
    let err = client.login("alice", "nope").await.unwrap_err();
    assert!(matches!(err, AppError::LoginRejected(ref msg) if msg == "Invalid credentials"));
    assert_eq!(err.user_message(), "Invalid credentials");
}

#[tokio::test]
async fn test_login_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(wiremock::matchers::body_json(json!({"username": "alice", "password": "pw1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful", "token": "jwt", "userId": 1, "username": "alice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, None).await;
    let credentials = client.login("alice", "pw1").await.unwrap();
    assert_eq!(credentials.token, "jwt");
    // Login itself does not store anything
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_delete_with_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/books/3"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("t")).await;
    assert!(client.delete_book(3).await.unwrap().is_null());
}

#[tokio::test]
async fn test_create_failure_is_create_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Error adding book: disk full"})))
        .mount(&server)
        .await;

    let client = client_with_token(&server, Some("t")).await;
    let err = client
        .create_book(&BookFields::new("Dune", "F. Herbert"), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "CreateError");
    assert!(err.user_message().contains("disk full"));
}

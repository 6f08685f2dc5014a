mod common;

use common::spawn_app;
use serde_json::{json, Value};

// --- Registration Tests ---

#[tokio::test]
async fn register_returns_201_for_valid_credentials() {
    let app = spawn_app().await;

    let response = app.post_user("a@example.com", "pw123").await;

    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "a@example.com");
    assert_eq!(body["is_chirpy_red"], false);
    assert!(body["id"].as_str().is_some());
    assert!(body["created_at"].as_str().is_some());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn register_returns_409_for_duplicate_email() {
    let app = spawn_app().await;

    assert_eq!(201, app.post_user("a@example.com", "pw123").await.status().as_u16());
    let response = app.post_user("a@example.com", "other").await;

    assert_eq!(409, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "DUPLICATE_ENTRY");
}

#[tokio::test]
async fn register_returns_400_for_invalid_input() {
    let app = spawn_app().await;

    let test_cases = vec![
        ("notanemail", "pw123", "invalid email"),
        ("user@", "pw123", "email without domain"),
        ("@example.com", "pw123", "email without local part"),
        ("a@example.com", "", "empty password"),
    ];

    for (email, password, description) in test_cases {
        let response = app.post_user(email, password).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "Should reject registration with {}",
            description
        );
    }
}

// --- Login Tests ---

#[tokio::test]
async fn login_returns_user_and_tokens() {
    let app = spawn_app().await;

    let body = app.login_new_user("a@example.com", "pw123").await;

    assert_eq!(body["email"], "a@example.com");
    assert!(body["id"].as_str().is_some());
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
    let refresh_token = body["refresh_token"].as_str().unwrap();
    assert_eq!(refresh_token.len(), 64);
    assert!(refresh_token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = spawn_app().await;
    assert_eq!(201, app.post_user("a@example.com", "pw123").await.status().as_u16());

    let unknown = app
        .post_login(&json!({ "email": "nobody@example.com", "password": "pw123" }))
        .await;
    let wrong = app
        .post_login(&json!({ "email": "a@example.com", "password": "wrong" }))
        .await;

    assert_eq!(401, unknown.status().as_u16());
    assert_eq!(401, wrong.status().as_u16());

    let unknown: Value = unknown.json().await.unwrap();
    let wrong: Value = wrong.json().await.unwrap();
    assert_eq!(unknown["code"], wrong["code"]);
    assert_eq!(unknown["message"], wrong["message"]);
}

#[tokio::test]
async fn login_accepts_shorter_token_lifetime() {
    let app = spawn_app().await;
    assert_eq!(201, app.post_user("a@example.com", "pw123").await.status().as_u16());

    let response = app
        .post_login(&json!({
            "email": "a@example.com",
            "password": "pw123",
            "expires_in_seconds": 60
        }))
        .await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap();

    let update = app
        .client
        .put(app.url("/api/users"))
        .bearer_auth(token)
        .json(&json!({ "email": "a@example.com", "password": "pw123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(200, update.status().as_u16());
}

// --- Refresh / Revoke Tests ---

#[tokio::test]
async fn refresh_issues_access_tokens_until_revoked() {
    let app = spawn_app().await;
    let login = app.login_new_user("a@example.com", "pw123").await;
    let refresh_token = login["refresh_token"].as_str().unwrap();

    let response = app.post_with_bearer("/api/refresh", refresh_token).await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    let new_access_token = body["token"].as_str().unwrap().to_string();

    // The refresh token is reusable
    let again = app.post_with_bearer("/api/refresh", refresh_token).await;
    assert_eq!(200, again.status().as_u16());

    let revoke = app.post_with_bearer("/api/revoke", refresh_token).await;
    assert_eq!(204, revoke.status().as_u16());

    let after = app.post_with_bearer("/api/refresh", refresh_token).await;
    assert_eq!(401, after.status().as_u16());

    // Revoking again is still a success
    let revoke_again = app.post_with_bearer("/api/revoke", refresh_token).await;
    assert_eq!(204, revoke_again.status().as_u16());

    // Access tokens already issued keep working until they expire
    let chirp = app.post_chirp(&new_access_token, "still here").await;
    assert_eq!(201, chirp.status().as_u16());
}

#[tokio::test]
async fn refresh_and_revoke_without_token_return_400() {
    let app = spawn_app().await;

    for path in ["/api/refresh", "/api/revoke"] {
        let response = app
            .client
            .post(app.url(path))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(400, response.status().as_u16(), "{} without a token", path);
    }
}

#[tokio::test]
async fn refresh_with_unknown_token_returns_401() {
    let app = spawn_app().await;

    let response = app.post_with_bearer("/api/refresh", &"ab".repeat(32)).await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn access_token_is_not_a_refresh_token() {
    let app = spawn_app().await;
    let login = app.login_new_user("a@example.com", "pw123").await;

    let response = app
        .post_with_bearer("/api/refresh", login["token"].as_str().unwrap())
        .await;

    assert_eq!(401, response.status().as_u16());
}

// --- Credential Update Tests ---

#[tokio::test]
async fn update_user_changes_credentials() {
    let app = spawn_app().await;
    let login = app.login_new_user("a@example.com", "pw123").await;

    let response = app
        .client
        .put(app.url("/api/users"))
        .bearer_auth(login["token"].as_str().unwrap())
        .json(&json!({ "email": "b@example.com", "password": "new-pw" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "b@example.com");
    assert_eq!(body["id"], login["id"]);

    let old = app
        .post_login(&json!({ "email": "a@example.com", "password": "pw123" }))
        .await;
    assert_eq!(401, old.status().as_u16());

    let new = app
        .post_login(&json!({ "email": "b@example.com", "password": "new-pw" }))
        .await;
    assert_eq!(200, new.status().as_u16());
}

#[tokio::test]
async fn update_user_requires_access_token() {
    let app = spawn_app().await;
    let login = app.login_new_user("a@example.com", "pw123").await;

    let cases = vec![
        None,
        Some("Bearer garbage".to_string()),
        // A refresh token is not an access token
        Some(format!("Bearer {}", login["refresh_token"].as_str().unwrap())),
    ];

    for header in cases {
        let mut request = app
            .client
            .put(app.url("/api/users"))
            .json(&json!({ "email": "b@example.com", "password": "new-pw" }));
        if let Some(value) = &header {
            request = request.header("Authorization", value);
        }

        let response = request.send().await.expect("Failed to execute request.");
        assert_eq!(401, response.status().as_u16(), "header {:?}", header);
    }
}

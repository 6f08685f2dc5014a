mod common;

use common::{spawn_app, POLKA_KEY};
use serde_json::{json, Value};

#[tokio::test]
async fn create_chirp_returns_201_and_filters_profanity() {
    let app = spawn_app().await;
    let login = app.login_new_user("a@example.com", "pw123").await;

    let response = app
        .post_chirp(login["token"].as_str().unwrap(), "What a Kerfuffle this is")
        .await;

    assert_eq!(201, response.status().as_u16());
    let chirp: Value = response.json().await.unwrap();
    assert_eq!(chirp["body"], "What a **** this is");
    assert_eq!(chirp["user_id"], login["id"]);
}

#[tokio::test]
async fn create_chirp_rejects_long_body_and_anonymous_callers() {
    let app = spawn_app().await;
    let login = app.login_new_user("a@example.com", "pw123").await;

    let too_long = app
        .post_chirp(login["token"].as_str().unwrap(), &"a".repeat(141))
        .await;
    assert_eq!(400, too_long.status().as_u16());

    let anonymous = app
        .client
        .post(app.url("/api/chirps"))
        .json(&json!({ "body": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(401, anonymous.status().as_u16());
}

#[tokio::test]
async fn list_chirps_filters_by_author_and_sorts() {
    let app = spawn_app().await;
    let alice = app.login_new_user("alice@example.com", "pw123").await;
    let bob = app.login_new_user("bob@example.com", "pw123").await;

    for (login, body) in [(&alice, "one"), (&bob, "two"), (&alice, "three")] {
        let response = app.post_chirp(login["token"].as_str().unwrap(), body).await;
        assert_eq!(201, response.status().as_u16());
    }

    let bodies = |chirps: Vec<Value>| -> Vec<String> {
        chirps
            .iter()
            .map(|c| c["body"].as_str().unwrap().to_string())
            .collect()
    };

    let all: Vec<Value> = app
        .client
        .get(app.url("/api/chirps"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bodies(all), vec!["one", "two", "three"]);

    let desc: Vec<Value> = app
        .client
        .get(app.url("/api/chirps?sort=desc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bodies(desc), vec!["three", "two", "one"]);

    let alices: Vec<Value> = app
        .client
        .get(app.url(&format!(
            "/api/chirps?author_id={}",
            alice["id"].as_str().unwrap()
        )))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bodies(alices), vec!["one", "three"]);
}

#[tokio::test]
async fn get_chirp_returns_404_for_unknown_or_invalid_id() {
    let app = spawn_app().await;

    for id in [uuid::Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let response = app
            .client
            .get(app.url(&format!("/api/chirps/{}", id)))
            .send()
            .await
            .unwrap();
        assert_eq!(404, response.status().as_u16(), "id {}", id);
    }
}

#[tokio::test]
async fn only_the_owner_can_delete_a_chirp() {
    let app = spawn_app().await;
    let alice = app.login_new_user("alice@example.com", "pw123").await;
    let bob = app.login_new_user("bob@example.com", "pw123").await;

    let chirp: Value = app
        .post_chirp(alice["token"].as_str().unwrap(), "mine")
        .await
        .json()
        .await
        .unwrap();
    let chirp_url = app.url(&format!("/api/chirps/{}", chirp["id"].as_str().unwrap()));

    let forbidden = app
        .client
        .delete(&chirp_url)
        .bearer_auth(bob["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(403, forbidden.status().as_u16());

    // Still there
    let still_there = app.client.get(&chirp_url).send().await.unwrap();
    assert_eq!(200, still_there.status().as_u16());

    let deleted = app
        .client
        .delete(&chirp_url)
        .bearer_auth(alice["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(204, deleted.status().as_u16());

    let gone = app.client.get(&chirp_url).send().await.unwrap();
    assert_eq!(404, gone.status().as_u16());

    let again = app
        .client
        .delete(&chirp_url)
        .bearer_auth(alice["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(404, again.status().as_u16());
}

#[tokio::test]
async fn delete_chirp_rejects_invalid_id_and_missing_token() {
    let app = spawn_app().await;
    let login = app.login_new_user("a@example.com", "pw123").await;

    let invalid = app
        .client
        .delete(app.url("/api/chirps/not-a-uuid"))
        .bearer_auth(login["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(400, invalid.status().as_u16());

    let anonymous = app
        .client
        .delete(app.url(&format!("/api/chirps/{}", uuid::Uuid::new_v4())))
        .send()
        .await
        .unwrap();
    assert_eq!(401, anonymous.status().as_u16());
}

// --- Membership webhook ---

async fn post_webhook(app: &common::TestApp, api_key: Option<&str>, body: &Value) -> u16 {
    let mut request = app.client.post(app.url("/api/polka/webhooks")).json(body);
    if let Some(key) = api_key {
        request = request.header("Authorization", format!("ApiKey {}", key));
    }
    request.send().await.unwrap().status().as_u16()
}

#[tokio::test]
async fn webhook_upgrades_user() {
    let app = spawn_app().await;
    let login = app.login_new_user("a@example.com", "pw123").await;
    let event = json!({ "event": "user.upgraded", "data": { "user_id": login["id"] } });

    assert_eq!(204, post_webhook(&app, Some(POLKA_KEY), &event).await);

    let relogin: Value = app
        .post_login(&json!({ "email": "a@example.com", "password": "pw123" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(relogin["is_chirpy_red"], true);
}

#[tokio::test]
async fn webhook_rejects_bad_keys_and_unknown_users() {
    let app = spawn_app().await;
    let login = app.login_new_user("a@example.com", "pw123").await;
    let event = json!({ "event": "user.upgraded", "data": { "user_id": login["id"] } });

    assert_eq!(401, post_webhook(&app, None, &event).await);
    assert_eq!(401, post_webhook(&app, Some("wrong-key"), &event).await);

    let unknown = json!({
        "event": "user.upgraded",
        "data": { "user_id": uuid::Uuid::new_v4() }
    });
    assert_eq!(404, post_webhook(&app, Some(POLKA_KEY), &unknown).await);

    let other_event = json!({ "event": "user.payment_failed", "data": { "user_id": login["id"] } });
    assert_eq!(204, post_webhook(&app, Some(POLKA_KEY), &other_event).await);
}

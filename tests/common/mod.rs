#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use chirpy::configuration::{
    ApplicationSettings, AuthSettings, DatabaseSettings, PolkaSettings, Settings, StorageBackend,
};
use chirpy::startup::run;
use chirpy::store::MemoryStore;
use serde_json::{json, Value};

pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

pub fn test_settings(platform: &str) -> Settings {
    Settings {
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            platform: platform.to_string(),
            storage: StorageBackend::Memory,
        },
        database: DatabaseSettings {
            username: "postgres".to_string(),
            password: "password".to_string(),
            port: 5432,
            host: "localhost".to_string(),
            database_name: "chirpy".to_string(),
            url: None,
        },
        auth: AuthSettings {
            jwt_secret: "integration-test-secret".to_string(),
            access_token_ttl_seconds: 3600,
            refresh_token_ttl_days: 60,
            // Lowest bcrypt cost keeps the suite fast
            password_cost: 4,
        },
        polka: PolkaSettings {
            api_key: POLKA_KEY.to_string(),
        },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_on_platform("dev").await
}

pub async fn spawn_app_on_platform(platform: &str) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = run(listener, Arc::new(MemoryStore::new()), test_settings(platform))
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Register and log in, returning the login response body
    pub async fn login_new_user(&self, email: &str, password: &str) -> Value {
        assert_eq!(201, self.post_user(email, password).await.status().as_u16());

        let response = self
            .post_login(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/chirps"))
            .bearer_auth(token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bucketlist_api::{app, config::AppConfig, database::Database, AppState};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

pub const PASSWORD: &str = "12345678";

/// The real router on an ephemeral port, backed by its own in-memory database
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(AppConfig::testing()).await
    }

    pub async fn start_with(config: AppConfig) -> Result<Self> {
        let db = Database::connect(&config.database).await.context("failed to open test database")?;
        db.create_all().await.context("failed to create tables")?;

        let state = AppState::new(db, config)?;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            base_url: format!("http://{}", addr),
            client: Client::new(),
            handle,
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str) -> Result<Response> {
        let body = json!({
            "username": username,
            "email": format!("{}@andela.com", username),
            "password": PASSWORD,
        });
        Ok(self.client.post(self.url("/api/v1/auth/register")).json(&body).send().await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Response> {
        let body = json!({ "username": username, "password": password });
        Ok(self.client.post(self.url("/api/v1/auth/login")).json(&body).send().await?)
    }

    /// Register `username` and return a bearer token for it
    pub async fn user_token(&self, username: &str) -> Result<String> {
        let resp = self.register(username).await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "register failed: {}", resp.status());

        let resp = self.login(username, PASSWORD).await?;
        anyhow::ensure!(resp.status() == StatusCode::OK, "login failed: {}", resp.status());
        let body: Value = resp.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn get(&self, token: &str, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn post(&self, token: &str, path: &str, body: Value) -> Result<Response> {
        Ok(self.client.post(self.url(path)).bearer_auth(token).json(&body).send().await?)
    }

    pub async fn put(&self, token: &str, path: &str, body: Value) -> Result<Response> {
        Ok(self.client.put(self.url(path)).bearer_auth(token).json(&body).send().await?)
    }

    pub async fn delete(&self, token: &str, path: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).bearer_auth(token).send().await?)
    }

    /// Create a bucketlist and return its id
    pub async fn bucketlist(&self, token: &str, description: &str) -> Result<i64> {
        let resp = self.post(token, "/api/v1/bucketlists/", json!({ "description": description })).await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "create bucketlist failed: {}", resp.status());
        created_id(resp).await
    }

    pub async fn tag(&self, token: &str, bucketlist_id: i64, name: &str) -> Result<i64> {
        let path = format!("/api/v1/bucketlists/{}/tags/", bucketlist_id);
        let resp = self.post(token, &path, json!({ "name": name })).await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "create tag failed: {}", resp.status());
        created_id(resp).await
    }

    pub async fn item(&self, token: &str, bucketlist_id: i64, body: Value) -> Result<i64> {
        let path = format!("/api/v1/bucketlists/{}/items/", bucketlist_id);
        let resp = self.post(token, &path, body).await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "create item failed: {}", resp.status());
        created_id(resp).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn created_id(resp: Response) -> Result<i64> {
    let body: Value = resp.json().await?;
    body["data"]["id"].as_i64().context("response has no id")
}

/// Status plus parsed JSON body; an empty body parses as `null`
pub async fn read(resp: Response) -> Result<(StatusCode, Value)> {
    let status = resp.status();
    let text = resp.text().await?;
    let body = if text.is_empty() { Value::Null } else { serde_json::from_str(&text)? };
    Ok((status, body))
}

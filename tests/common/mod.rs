#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

use stores_api::{create_app, AppConfig, AppState};

/// In-process server bound to an unused port, backed by an in-memory database.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: Client,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(|_| {}).await
    }

    /// Starts a server after letting the caller adjust the test config.
    pub async fn start_with(adjust: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let mut config = AppConfig::for_tests();
        adjust(&mut config);

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::initialize(config).await?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        let app = create_app(state);
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            port,
            base_url,
            client: Client::new(),
            task,
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

    pub fn get(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        with_token(self.client.get(self.url(path)), token)
    }

    pub fn post(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        with_token(self.client.post(self.url(path)), token)
    }

    pub fn put(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        with_token(self.client.put(self.url(path)), token)
    }

    pub fn delete(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        with_token(self.client.delete(self.url(path)), token)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<Response> {
        Ok(self
            .post("/register", None)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?)
    }

    /// Registers `username` and logs in, returning (access_token, refresh_token).
    pub async fn signup(&self, username: &str) -> Result<(String, String)> {
        let resp = self.register(username, "secret-pw").await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "register {}: {}", username, resp.status());

        let resp = self
            .post("/login", None)
            .json(&json!({ "username": username, "password": "secret-pw" }))
            .send()
            .await?;
        anyhow::ensure!(resp.status() == StatusCode::OK, "login {}: {}", username, resp.status());

        let body: Value = resp.json().await?;
        let access = body["access_token"].as_str().context("missing access_token")?;
        let refresh = body["refresh_token"].as_str().context("missing refresh_token")?;
        Ok((access.to_string(), refresh.to_string()))
    }

    /// Creates a store and returns its id.
    pub async fn create_store(&self, token: &str, name: &str) -> Result<i64> {
        let resp = self
            .post("/store", Some(token))
            .json(&json!({ "name": name }))
            .send()
            .await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "create store: {}", resp.status());
        let body: Value = resp.json().await?;
        body["id"].as_i64().context("store id")
    }

    /// Creates an item with a fresh token and returns its id.
    pub async fn create_item(&self, token: &str, store_id: i64, name: &str, price: f64) -> Result<i64> {
        let resp = self
            .post("/item", Some(token))
            .json(&json!({ "name": name, "price": price, "store_id": store_id }))
            .send()
            .await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "create item: {}", resp.status());
        let body: Value = resp.json().await?;
        body["id"].as_i64().context("item id")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn with_token(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

//! REST implementation of [`TaskGateway`] against a PostgREST-style table
//! endpoint (`{base_url}/rest/v1/{table}`).
//!
//! Mutations send `Prefer: return=representation` so the affected rows come
//! back in the response body; a mutation that matched zero rows is reported
//! as a rejection rather than silently succeeding.

use async_trait::async_trait;
use tracing::debug;

use super::{RemoteError, TaskGateway};
use crate::config::AppConfig;
use crate::task::{CreateTaskInput, Task, UpdateTaskInput};

pub struct RestGateway {
    client: reqwest::Client,
    table_url: String,
    api_key: String,
}

impl RestGateway {
    pub fn new(config: &AppConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            table_url: format!(
                "{}/rest/v1/{}",
                config.base_url.trim_end_matches('/'),
                config.table
            ),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, &self.table_url);
        if !self.api_key.is_empty() {
            req = req
                .header("apikey", &self.api_key)
                .bearer_auth(&self.api_key);
        }
        req
    }

    /// Turn a non-2xx response into a `Rejected` error, preferring the
    /// `message` field of the JSON error body when the store provides one.
    async fn reject(resp: reqwest::Response) -> RemoteError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(str::to_owned))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("remote store returned HTTP {status}")
                } else {
                    body.trim().to_owned()
                }
            });
        RemoteError::rejected(status, message)
    }

    /// Mutations return the affected rows as a JSON array; exactly one row
    /// is expected here.
    async fn single_row(resp: reqwest::Response, id: Option<&str>) -> Result<Task, RemoteError> {
        if !resp.status().is_success() {
            return Err(Self::reject(resp).await);
        }
        let status = resp.status().as_u16();
        let mut rows: Vec<Task> = resp.json().await?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            0 => Err(RemoteError::rejected(
                status,
                match id {
                    Some(id) => format!("task not found: {id}"),
                    None => "remote store returned no row".to_owned(),
                },
            )),
            n => Err(RemoteError::rejected(
                status,
                format!("expected one affected row, got {n}"),
            )),
        }
    }
}

#[async_trait]
impl TaskGateway for RestGateway {
    async fn list(&self) -> Result<Vec<Task>, RemoteError> {
        let resp = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::reject(resp).await);
        }
        let tasks: Vec<Task> = resp.json().await?;
        debug!(count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    async fn create(&self, input: CreateTaskInput) -> Result<Task, RemoteError> {
        let resp = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=representation")
            .json(&input.to_row())
            .send()
            .await?;
        Self::single_row(resp, None).await
    }

    async fn update(&self, id: &str, input: UpdateTaskInput) -> Result<Task, RemoteError> {
        let resp = self
            .request(reqwest::Method::PATCH)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&input.to_patch())
            .send()
            .await?;
        Self::single_row(resp, Some(id)).await
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let resp = self
            .request(reqwest::Method::DELETE)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .send()
            .await?;
        // Representation return makes a zero-match delete detectable.
        Self::single_row(resp, Some(id)).await.map(|_| ())
    }
}

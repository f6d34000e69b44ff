//! HTTP client for the taskdeck server.
//!
//! Thin typed wrappers over [`reqwest::Client`].  Non-2xx responses are
//! turned into [`ApiError::Server`] carrying the server's `{"error": ...}`
//! message so the UI can show it verbatim.

use crate::models::Task;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{0}")]
    Server(String),

    /// The request never completed (connection refused, DNS, ...).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct TaskApi {
    client: Client,
    base_url: String,
}

impl TaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/tasks{}", self.base_url.trim_end_matches('/'), path)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let res = self.client.get(self.url("")).send().await?;
        decode(res).await
    }

    pub async fn create_task(&self, title: &str) -> Result<Task, ApiError> {
        let res = self
            .client
            .post(self.url(""))
            .json(&json!({ "title": title }))
            .send()
            .await?;
        decode(res).await
    }

    pub async fn set_completed(&self, id: &str, completed: bool) -> Result<Task, ApiError> {
        let res = self
            .client
            .put(self.url(&format!("/{id}")))
            .json(&json!({ "completed": completed }))
            .send()
            .await?;
        decode(res).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        let res = self.client.delete(self.url(&format!("/{id}"))).send().await?;
        if res.status().is_success() {
            Ok(())
        } else {
            Err(server_error(res).await)
        }
    }
}

async fn decode<T: serde::de::DeserializeOwned>(res: reqwest::Response) -> Result<T, ApiError> {
    if res.status().is_success() {
        Ok(res.json::<T>().await?)
    } else {
        Err(server_error(res).await)
    }
}

async fn server_error(res: reqwest::Response) -> ApiError {
    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_owned))
        .unwrap_or(body);
    ApiError::Server(format!("{status}: {message}"))
}

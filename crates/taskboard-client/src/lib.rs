//! Typed client for the taskboard REST API.
//!
//! Every operation maps a non-success status or transport failure to an
//! error whose message names the failed operation; there are no retries.

use reqwest::StatusCode;

use taskboard_core::{NewTask, Task, TaskPatch};

/// Default API base URL, matching the server's default port.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("Failed to {operation}")]
    Status {
        operation: &'static str,
        status: StatusCode,
    },

    /// The request never completed (connect, timeout, or decode failure).
    #[error("Failed to {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone)]
pub struct TaskClient {
    base_url: String,
    http: reqwest::Client,
}

impl TaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        const OP: &str = "fetch tasks";
        let resp = self
            .http
            .get(format!("{}/tasks", self.base_url))
            .send()
            .await
            .map_err(|e| transport(OP, e))?;
        check_status(OP, &resp)?;
        resp.json().await.map_err(|e| transport(OP, e))
    }

    pub async fn get_task(&self, id: i64) -> Result<Task, ClientError> {
        const OP: &str = "fetch task";
        let resp = self
            .http
            .get(format!("{}/tasks/{id}", self.base_url))
            .send()
            .await
            .map_err(|e| transport(OP, e))?;
        check_status(OP, &resp)?;
        resp.json().await.map_err(|e| transport(OP, e))
    }

    pub async fn create_task(&self, new: &NewTask) -> Result<Task, ClientError> {
        const OP: &str = "create task";
        let resp = self
            .http
            .post(format!("{}/tasks", self.base_url))
            .json(new)
            .send()
            .await
            .map_err(|e| transport(OP, e))?;
        check_status(OP, &resp)?;
        resp.json().await.map_err(|e| transport(OP, e))
    }

    pub async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task, ClientError> {
        const OP: &str = "update task";
        let resp = self
            .http
            .put(format!("{}/tasks/{id}", self.base_url))
            .json(patch)
            .send()
            .await
            .map_err(|e| transport(OP, e))?;
        check_status(OP, &resp)?;
        resp.json().await.map_err(|e| transport(OP, e))
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), ClientError> {
        const OP: &str = "delete task";
        let resp = self
            .http
            .delete(format!("{}/tasks/{id}", self.base_url))
            .send()
            .await
            .map_err(|e| transport(OP, e))?;
        check_status(OP, &resp)
    }
}

fn check_status(operation: &'static str, resp: &reqwest::Response) -> Result<(), ClientError> {
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(ClientError::Status {
            operation,
            status: resp.status(),
        })
    }
}

fn transport(operation: &'static str, source: reqwest::Error) -> ClientError {
    ClientError::Transport { operation, source }
}

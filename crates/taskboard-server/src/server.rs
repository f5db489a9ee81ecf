use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use taskboard_store::TaskStore;

use crate::handlers::{self, AppState};

/// Server configuration.
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3001 }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Create and start the server. Pass port 0 to bind an ephemeral port; the
/// actual port is on the returned handle.
pub async fn start(
    config: ServerConfig,
    store: Arc<dyn TaskStore>,
) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(AppState { store });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "taskboard server started");

    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server,
    })
}

/// Handle returned by `start()` — keeps the serve task alive.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}

/// Health check endpoint.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskboard_core::{Task, TaskPriority, TaskStatus};
    use taskboard_store::MemoryTaskStore;

    async fn start_test_server() -> (ServerHandle, String) {
        let store = Arc::new(MemoryTaskStore::new());
        let handle = start(ServerConfig { port: 0 }, store).await.unwrap();
        let base = format!("http://127.0.0.1:{}/api", handle.port);
        (handle, base)
    }

    #[tokio::test]
    async fn serves_health() {
        let (handle, _) = start_test_server().await;
        let url = format!("http://127.0.0.1:{}/health", handle.port);

        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn create_then_list_round_trip() {
        let (_handle, base) = start_test_server().await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{base}/tasks"))
            .json(&json!({ "title": "A" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let created: Task = resp.json().await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.status, TaskStatus::Pending);
        assert_eq!(created.priority, TaskPriority::Medium);

        client
            .post(format!("{base}/tasks"))
            .json(&json!({ "title": "B", "priority": "high" }))
            .send()
            .await
            .unwrap();

        let tasks: Vec<Task> = client
            .get(format!("{base}/tasks"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn create_without_title_is_400() {
        let (_handle, base) = start_test_server().await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{base}/tasks"))
            .json(&json!({ "title": "   " }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Title is required");
    }

    #[tokio::test]
    async fn get_unknown_id_is_404() {
        let (_handle, base) = start_test_server().await;

        let resp = reqwest::get(format!("{base}/tasks/99")).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn update_subset_of_fields() {
        let (_handle, base) = start_test_server().await;
        let client = reqwest::Client::new();

        let created: Task = client
            .post(format!("{base}/tasks"))
            .json(&json!({ "title": "A" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let resp = client
            .put(format!("{base}/tasks/{}", created.id))
            .json(&json!({ "status": "completed" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let updated: Task = resp.json().await.unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.title, "A");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_unknown_id_is_404() {
        let (_handle, base) = start_test_server().await;
        let client = reqwest::Client::new();

        let resp = client
            .put(format!("{base}/tasks/99"))
            .json(&json!({ "status": "completed" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn delete_is_204_then_404() {
        let (_handle, base) = start_test_server().await;
        let client = reqwest::Client::new();

        let created: Task = client
            .post(format!("{base}/tasks"))
            .json(&json!({ "title": "A" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let resp = client
            .delete(format!("{base}/tasks/{}", created.id))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);

        let resp = client
            .delete(format!("{base}/tasks/{}", created.id))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);

        let resp = reqwest::get(format!("{base}/tasks/{}", created.id))
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn unknown_status_value_is_rejected() {
        let (_handle, base) = start_test_server().await;
        let client = reqwest::Client::new();

        let created: Task = client
            .post(format!("{base}/tasks"))
            .json(&json!({ "title": "A" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let resp = client
            .put(format!("{base}/tasks/{}", created.id))
            .json(&json!({ "status": "done" }))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
    }
}

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{Method, Uri};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use dist_executor::config::ControllerConfig;

/// One request the stub controller received.
#[derive(Debug, Clone)]
pub struct StubRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<StubRequest>>>,
    rejected: Arc<Vec<String>>,
}

/// Controller stand-in serving the work API on an ephemeral port.
///
/// Answers every request with the controller envelope; requests whose path
/// ends with one of `rejected` get `"result": false`.
pub struct StubController {
    port: u16,
    requests: Arc<Mutex<Vec<StubRequest>>>,
    handle: JoinHandle<()>,
}

impl StubController {
    pub async fn start(rejected: &[&str]) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();

        let state = StubState {
            requests: Arc::new(Mutex::new(Vec::new())),
            rejected: Arc::new(rejected.iter().map(|s| s.to_string()).collect()),
        };
        let requests = Arc::clone(&state.requests);

        let router = Router::new()
            .route("/api/v1/dist/work/{work_id}/{*endpoint}", post(work_endpoint))
            .with_state(state);

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            port,
            requests,
            handle,
        })
    }

    pub fn config(&self) -> ControllerConfig {
        ControllerConfig {
            port: self.port,
            ..ControllerConfig::default()
        }
    }

    pub fn requests(&self) -> Vec<StubRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

impl Drop for StubController {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn work_endpoint(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    Path((_work_id, endpoint)): Path<(String, String)>,
    body: String,
) -> Json<Value> {
    let ok = !state.rejected.iter().any(|r| endpoint.ends_with(r.as_str()));

    state.requests.lock().unwrap().push(StubRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        body,
    });

    if ok {
        Json(json!({"result": true, "code": 0, "message": "", "data": null}))
    } else {
        Json(json!({"result": false, "code": 2, "message": "rejected by stub", "data": null}))
    }
}

//! Shared utilities for integration tests.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{any, get, post},
    Router,
};
use canvas_relay::config::RelayConfig;
use canvas_relay::http::HttpServer;
use canvas_relay::lifecycle::Shutdown;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// One request seen by the mock backend.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub content_type: Option<String>,
    pub request_id: Option<HeaderValue>,
    pub body: Bytes,
}

/// A canvas backend stand-in serving `/api/grid` and `/api/draw`.
pub struct MockBackend {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct MockState {
    grid: Bytes,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

fn record(state: &MockState, path: &str, headers: &HeaderMap, body: Bytes) {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(Recorded {
        path: path.to_string(),
        content_type: header_str(header::CONTENT_TYPE.as_str()),
        request_id: headers.get("x-request-id").cloned(),
        body,
    });
}

/// Start a mock backend whose grid endpoint returns `grid`.
pub async fn start_mock_backend(grid: Vec<u8>) -> MockBackend {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        grid: Bytes::from(grid),
        requests: requests.clone(),
    };

    let app = Router::new()
        .route(
            "/api/grid",
            get(|State(state): State<MockState>, headers: HeaderMap| async move {
                record(&state, "/api/grid", &headers, Bytes::new());
                state.grid.clone()
            }),
        )
        .route(
            "/api/draw",
            post(
                |State(state): State<MockState>, headers: HeaderMap, body: Bytes| async move {
                    record(&state, "/api/draw", &headers, body);
                    "{\"status\": \"ok\"}"
                },
            ),
        )
        .with_state(state);

    let addr = serve(app).await;
    MockBackend { addr, requests }
}

/// Start a backend answering every request with whatever `f` produces.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = (StatusCode, String)> + Send + 'static,
{
    let app = Router::new().route("/{*path}", any(move || f()));
    serve(app).await
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A running relay and the handle that stops it.
pub struct Relay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl Relay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a relay in front of `backend_url`, letting `tweak` adjust the config.
pub async fn start_relay<F>(backend_url: String, tweak: F) -> Relay
where
    F: FnOnce(&mut RelayConfig),
{
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.backend.base_url = backend_url;
    tweak(&mut config);

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    Relay { addr, shutdown }
}

/// Client that never follows redirects and ignores system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

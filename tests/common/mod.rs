use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Form, Router};
use centrifuge_admin::{ClientSettings, ExternalConfig, SettingsOverrides};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

pub const PROJECT_ID: &str = "test-project";
pub const SECRET_KEY: &str = "test-secret";
const ADMIN_PATH: &str = "/api/test-project";
const SLOW_PATH: &str = "/slow";

/// A request as seen by the simulated admin API.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub content_type: Option<String>,
    pub form: HashMap<String, String>,
}

#[derive(Clone)]
struct MockState {
    status: u16,
    body: String,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

/// Simulated admin API answering every request with a fixed status and body.
pub struct MockServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockServer {
    pub fn start(status: u16, body: &str) -> MockServer {
        let state = MockState { status, body: body.to_string(), received: Arc::new(Mutex::new(Vec::new())) };
        let received = state.received.clone();
        let (addr_tx, addr_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("unable to build runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("unable to bind");
                addr_tx.send(listener.local_addr().expect("no local address")).expect("test gone");
                let app = Router::new()
                    .route(ADMIN_PATH, post(admin))
                    .route(SLOW_PATH, post(slow))
                    .with_state(state);
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        shutdown_rx.await.ok();
                    })
                    .await
                    .expect("mock server failed");
            });
        });

        let addr = addr_rx.recv().expect("mock server did not start");
        MockServer { addr, received, shutdown: Some(shutdown_tx) }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }

    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides::new(PROJECT_ID, SECRET_KEY).host("http://127.0.0.1").port(self.port()).timeout(2)
    }

    pub fn settings(&self) -> ClientSettings {
        ClientSettings::resolve(&ExternalConfig::default(), self.overrides()).unwrap()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn admin(
    State(state): State<MockState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    let content_type = headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()).map(str::to_string);
    state.received.lock().unwrap().push(ReceivedRequest { content_type, form });
    (StatusCode::from_u16(state.status).unwrap(), state.body.clone())
}

async fn slow(State(state): State<MockState>) -> (StatusCode, String) {
    tokio::time::sleep(Duration::from_secs(3)).await;
    (StatusCode::OK, state.body.clone())
}

/// A local address nothing listens on.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

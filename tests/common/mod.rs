//! Shared mock backends for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a programmable raw-HTTP backend on an ephemeral port.
/// `f` decides the status and body of every response.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that advertises `advertised_len` body bytes, sends only
/// `body`, then closes the connection.
#[allow(dead_code)]
pub async fn start_truncating_backend(advertised_len: usize, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let response_str = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    advertised_len, body
                );
                let _ = socket.write_all(response_str.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Mock dashboard API: capability health routes and the monitoring collector.
#[allow(dead_code)]
pub struct MockApi {
    pub addr: SocketAddr,
    pub monitoring: Arc<Mutex<Vec<Value>>>,
}

#[allow(dead_code)]
impl MockApi {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Wait until at least `n` monitoring reports arrived, or give up after a second.
    pub async fn wait_for_reports(&self, n: usize) -> Vec<Value> {
        for _ in 0..100 {
            {
                let reports = self.monitoring.lock().unwrap();
                if reports.len() >= n {
                    return reports.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.monitoring.lock().unwrap().clone()
    }
}

/// Health routes:
/// - `weather`: 200
/// - `locations`: 503
/// - `radar`: answers after 2s
/// - `safety`: not routed (404)
#[allow(dead_code)]
pub async fn start_mock_api() -> MockApi {
    let monitoring = Arc::new(Mutex::new(Vec::new()));
    let store = monitoring.clone();

    let app = Router::new()
        .route("/api/health/weather", get(|| async { StatusCode::OK }))
        .route("/api/health/locations", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route(
            "/api/health/radar",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                StatusCode::OK
            }),
        )
        .route(
            "/api/weather/alerts",
            get(|| async { Json(serde_json::json!({ "alerts": ["flood watch"] })) }),
        )
        .route(
            "/api/monitoring/error",
            post(move |Json(body): Json<Value>| {
                let store = store.clone();
                async move {
                    store.lock().unwrap().push(body);
                    StatusCode::NO_CONTENT
                }
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockApi { addr, monitoring }
}

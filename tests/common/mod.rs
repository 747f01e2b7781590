//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use alloy::primitives::{address, Address, TxHash};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing_subscriber::fmt::MakeWriter;

use artwork_deploy::blockchain::{DeployError, DeployResult, Deployer, DeploymentRecord};

/// Address every [`FixedDeployer`] deployment reports.
pub const FIXED_ADDRESS: Address = address!("abc0000000000000000000000000000000000123");

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Start a programmable mock HTTP server on an ephemeral port.
///
/// `f` receives the 0-based request index and returns `(status, body)`.
/// Every request is recorded.
pub async fn start_recording_backend<F, Fut>(f: F) -> (SocketAddr, Arc<Mutex<Vec<CapturedRequest>>>)
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();
    let f = Arc::new(f);

    let addr = serve(move |request| {
        let f = f.clone();
        let recorded = recorded.clone();
        async move {
            let index = {
                let mut guard = recorded.lock().unwrap();
                guard.push(request);
                guard.len() - 1
            };
            let (status, body) = f(index).await;
            http_response(status, &body)
        }
    })
    .await;

    (addr, requests)
}

/// Mock server that announces a longer body than it sends, then hangs up.
pub async fn start_truncating_backend(status: u16) -> SocketAddr {
    serve(move |_| async move {
        format!(
            "HTTP/1.1 {}\r\nContent-Length: 100\r\nConnection: close\r\n\r\nshort",
            status_line(status)
        )
    })
    .await
}

/// Start a mock JSON-RPC node.
///
/// `f` receives the method name and params and returns the `result` value.
/// Returns the called method names in order.
pub async fn start_rpc_backend<F>(f: F) -> (SocketAddr, Arc<Mutex<Vec<String>>>)
where
    F: Fn(&str, &serde_json::Value) -> serde_json::Value + Send + Sync + 'static,
{
    let methods = Arc::new(Mutex::new(Vec::new()));
    let recorded = methods.clone();
    let f = Arc::new(f);

    let addr = serve(move |request| {
        let f = f.clone();
        let recorded = recorded.clone();
        async move {
            let call = request.json();
            let method = call["method"].as_str().unwrap_or_default().to_string();
            recorded.lock().unwrap().push(method.clone());
            let result = f(&method, &call["params"]);
            let body = serde_json::json!({
                "jsonrpc": "2.0",
                "id": call["id"],
                "result": result,
            })
            .to_string();
            http_response(200, &body)
        }
    })
    .await;

    (addr, methods)
}

async fn serve<H, Fut>(handler: H) -> SocketAddr
where
    H: Fn(CapturedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = String> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let response = handler(request).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

fn status_line(status: u16) -> String {
    let reason = match status {
        200 => "OK",
        204 => "No Content",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Status",
    };
    format!("{} {}", status, reason)
}

fn http_response(status: u16, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line(status),
        body.len(),
        body
    )
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = buf.len().min(head_end + content_length);
    let body = String::from_utf8_lossy(&buf[head_end..body_end]).to_string();

    Some(CapturedRequest {
        method,
        path,
        headers,
        body,
    })
}

/// Deployer that always reports [`FIXED_ADDRESS`] (or fails).
pub struct FixedDeployer {
    pub fail: bool,
}

impl Deployer for FixedDeployer {
    fn contract_name(&self) -> &str {
        "Artwork"
    }

    fn network(&self) -> &str {
        "stubnet"
    }

    async fn deploy(&self) -> DeployResult<DeploymentRecord> {
        if self.fail {
            return Err(DeployError::Rpc("connection refused".to_string()));
        }
        Ok(DeploymentRecord {
            contract_address: FIXED_ADDRESS,
            network: "stubnet".to_string(),
            chain_id: 31337,
            tx_hash: TxHash::ZERO,
            block_number: 1,
            gas_used: 150_000,
            deployed_at: SystemTime::now(),
        })
    }
}

/// Deployer that derives a fresh address per call, like CREATE does.
pub struct SequentialDeployer {
    pub sender: Address,
    pub nonce: AtomicU64,
}

impl SequentialDeployer {
    pub fn new() -> Self {
        Self {
            sender: address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
            nonce: AtomicU64::new(0),
        }
    }
}

impl Deployer for SequentialDeployer {
    fn contract_name(&self) -> &str {
        "Artwork"
    }

    fn network(&self) -> &str {
        "stubnet"
    }

    async fn deploy(&self) -> DeployResult<DeploymentRecord> {
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        Ok(DeploymentRecord {
            contract_address: self.sender.create(nonce),
            network: "stubnet".to_string(),
            chain_id: 31337,
            tx_hash: TxHash::ZERO,
            block_number: nonce + 1,
            gas_used: 150_000,
            deployed_at: SystemTime::now(),
        })
    }
}

/// In-memory sink for tracing output.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route tracing output of the current thread into a buffer.
///
/// Use with the current-thread runtime (`#[tokio::test]` default).
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

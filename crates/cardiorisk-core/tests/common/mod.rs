//! Shared helpers for cardiorisk-core integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

use cardiorisk_core::{
    BackendError, FeatureVector, PredictionResult, RiskScorer, ScoreResult, SubmissionController,
};

/// The canonical reference record, in schema order.
pub const REFERENCE_RECORD: [(&str, &str); 13] = [
    ("age", "63"),
    ("sex", "1"),
    ("cp", "3"),
    ("trestbps", "145"),
    ("chol", "233"),
    ("fbs", "1"),
    ("restecg", "0"),
    ("thalach", "150"),
    ("exang", "0"),
    ("oldpeak", "2.3"),
    ("slope", "0"),
    ("ca", "0"),
    ("thal", "1"),
];

pub fn fill_reference<S: RiskScorer>(controller: &mut SubmissionController<S>) {
    for (key, raw) in REFERENCE_RECORD {
        controller.set_field(key, raw);
    }
}

// ---------------------------------------------------------------------------
// Fake scorers
// ---------------------------------------------------------------------------

/// Returns a fixed outcome and counts calls.
pub struct FakeScorer {
    outcome: ScoreResult,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<FeatureVector>>>,
}

impl FakeScorer {
    pub fn returning(outcome: ScoreResult) -> Self {
        FakeScorer {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn probability(probability: f64) -> Self {
        Self::returning(Ok(PredictionResult {
            predicted_class: if probability > 0.5 {
                cardiorisk_core::PredictedClass::Positive
            } else {
                cardiorisk_core::PredictedClass::Negative
            },
            probability,
        }))
    }

    pub fn failing(error: BackendError) -> Self {
        Self::returning(Err(error))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<FeatureVector> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RiskScorer for FakeScorer {
    async fn score(&self, features: &FeatureVector) -> ScoreResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(*features);
        self.outcome.clone()
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

/// Blocks inside `score` until released, so tests can observe loading.
pub struct GatedScorer {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
    outcome: ScoreResult,
}

impl GatedScorer {
    pub fn new(outcome: ScoreResult) -> Self {
        GatedScorer {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            outcome,
        }
    }
}

#[async_trait]
impl RiskScorer for GatedScorer {
    async fn score(&self, _features: &FeatureVector) -> ScoreResult {
        self.entered.notify_one();
        self.release.notified().await;
        self.outcome.clone()
    }

    fn describe(&self) -> String {
        "gated".to_string()
    }
}

// ---------------------------------------------------------------------------
// Canned HTTP responder
// ---------------------------------------------------------------------------

/// One request as received by [`CannedServer`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Minimal HTTP/1.1 responder answering every request with one canned reply.
pub struct CannedServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl CannedServer {
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = requests.clone();
        let body = body.to_string();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let Some(request) = read_request(&mut socket).await else {
                    continue;
                };
                captured.lock().unwrap().push(request);
                let reason = if status < 400 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{body}",
                    body.len(),
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        CannedServer {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// A base URL nothing is listening on.
pub async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
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

        let body_start = header_end + 4;
        if buf.len() >= body_start + content_length {
            return Some(CapturedRequest {
                method,
                path,
                headers,
                body: buf[body_start..body_start + content_length].to_vec(),
            });
        }
    }
}

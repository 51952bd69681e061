#![allow(dead_code)]

//! Minimal scripted HTTP server for executor and client tests.
//!
//! Serves one canned response per connection, in order, and records every
//! request so tests can assert on headers and bodies.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub enum StubResponse {
    /// 200 with a JSON body
    Json(serde_json::Value),
    /// Given status with an empty JSON body
    Status(u16),
    /// 200 with a raw, possibly malformed body
    Raw(&'static str),
}

pub struct StubServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn spawn(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let task_hits = hits.clone();
        let task_requests = requests.clone();
        tokio::spawn(async move {
            let mut queue = responses.into_iter();
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                task_hits.fetch_add(1, Ordering::SeqCst);
                let request = read_request(&mut socket).await;
                task_requests.lock().unwrap().push(request);

                let (status, body) = match queue.next() {
                    Some(StubResponse::Json(value)) => (200, value.to_string()),
                    Some(StubResponse::Status(code)) => (code, "{}".to_string()),
                    Some(StubResponse::Raw(text)) => (200, text.to_string()),
                    None => (500, "{}".to_string()),
                };
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            url,
            hits,
            requests,
        }
    }

    /// Number of connections served so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw requests received so far, head and body
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        if let Some(pos) = header_end(&data) {
            let head = String::from_utf8_lossy(&data[..pos]).to_string();
            let mut content_length = 0usize;
            for line in head.lines() {
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
            }
            if data.len() >= pos + 4 + content_length {
                return String::from_utf8_lossy(&data[..pos + 4 + content_length]).to_string();
            }
        }
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return String::from_utf8_lossy(&data).to_string(),
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
}

fn header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n")
}

//! Mock Fishtail backend for integration tests
//!
//! A tiny HTTP server on a random local port that serves:
//! - GET /get/menu.json
//! - GET /api/userinfo
//! - POST /logout
//!
//! Every request is counted per path and its raw header block kept, so
//! tests can assert on how often the network was hit and what was sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Canned response for one path
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub set_cookie: Option<String>,
}

impl MockResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into(), set_cookie: None }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into(), set_cookie: None }
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.set_cookie = Some(cookie.into());
        self
    }
}

/// Configuration for the mock backend
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub menu: MockResponse,
    pub user_info: MockResponse,
    pub logout: MockResponse,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            menu: MockResponse::ok(sample_menu()),
            user_info: MockResponse::status(401, r#"{"success": false, "code": 401, "message": "Unauthorized"}"#),
            logout: MockResponse::ok(r#"{"success": true, "code": 200, "data": null}"#),
            delay_ms: 0,
        }
    }
}

pub fn sample_menu() -> String {
    serde_json::json!([
        {
            "title": "Appetizers - Non Veg",
            "subtitle": "Starters",
            "items": [
                {"id": 1, "name": "Chicken Samosa", "price": "$7.99", "category": "Appetizers", "dietaryInfo": ["Spicy"]},
                {"id": 2, "name": "Vegetable Pakora", "price": "$6.99", "category": "Appetizers", "dietaryInfo": "Vegan, GF"}
            ]
        },
        {
            "title": "Tandoori Naan (Bread)",
            "items": [
                {"id": "n1", "name": "Garlic Naan", "price": "$3.99", "dietaryInfo": "Vegetarian"}
            ]
        }
    ])
    .to_string()
}

#[derive(Default)]
struct Recorded {
    hits: HashMap<String, usize>,
    requests: HashMap<String, Vec<String>>,
}

pub struct MockBackend {
    port: u16,
    running: Arc<AtomicBool>,
    recorded: Arc<Mutex<Recorded>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockBackend {
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        listener.set_nonblocking(true)?;

        let running_clone = Arc::clone(&running);
        let recorded_clone = Arc::clone(&recorded);
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let recorded = Arc::clone(&recorded_clone);
                        thread::spawn(move || handle_connection(stream, &cfg, &recorded));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            recorded,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Requests received for `path` so far
    pub fn hits(&self, path: &str) -> usize {
        self.recorded.lock().unwrap().hits.get(path).copied().unwrap_or(0)
    }

    /// Raw header blocks received for `path`, lowercased, oldest first
    pub fn requests(&self, path: &str) -> Vec<String> {
        self.recorded
            .lock()
            .unwrap()
            .requests
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read the header block and any declared body
fn read_request(stream: &mut TcpStream) -> Option<String> {
    stream.set_nonblocking(false).ok()?;
    stream.set_read_timeout(Some(Duration::from_secs(5))).ok()?;

    let mut data = Vec::new();
    let mut buffer = [0; 4096];
    let header_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while data.len() < header_end + content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }

    Some(head)
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, recorded: &Mutex<Recorded>) {
    let head = match read_request(&mut stream) {
        Some(head) => head,
        None => return,
    };

    let first_line = head.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, &MockResponse::status(400, r#"{"error": "Invalid request"}"#));
        return;
    }
    let method = parts[0];
    let path = parts[1].split('?').next().unwrap_or(parts[1]).to_string();

    {
        let mut recorded = recorded.lock().unwrap();
        *recorded.hits.entry(path.clone()).or_insert(0) += 1;
        recorded.requests.entry(path.clone()).or_default().push(head.clone());
    }

    if config.delay_ms > 0 {
        thread::sleep(Duration::from_millis(config.delay_ms));
    }

    let response = match (method, path.as_str()) {
        ("get", "/get/menu.json") => config.menu.clone(),
        ("get", "/api/userinfo") => config.user_info.clone(),
        ("post", "/logout") => config.logout.clone(),
        ("get", _) | ("post", _) => MockResponse::status(404, r#"{"error": "Endpoint not found"}"#),
        _ => MockResponse::status(405, r#"{"error": "Method not allowed"}"#),
    };
    send_response(&mut stream, &response);
}

fn send_response(stream: &mut TcpStream, response: &MockResponse) {
    let status_text = match response.status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    };
    let cookie = response
        .set_cookie
        .as_ref()
        .map(|c| format!("Set-Cookie: {}\r\n", c))
        .unwrap_or_default();
    let raw = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        status_text,
        cookie,
        response.body.len(),
        response.body
    );
    let _ = stream.write_all(raw.as_bytes());
    let _ = stream.flush();
}

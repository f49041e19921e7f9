//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes GET requests by path (query string ignored) to canned responses
//! and counts hits per path so tests can assert how often a URL was fetched.
//! Also records the peak number of requests being served at once.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    /// 200 with the given body.
    Body(Vec<u8>),
    /// Bare status with an empty body (e.g. 404).
    Status(u16),
    /// `status` for the first `failures` requests, then 200 with `body`.
    FailThen {
        status: u16,
        failures: usize,
        body: Vec<u8>,
    },
    /// 200 with `body`, sent after holding the request for `delay`.
    Slow { delay: Duration, body: Vec<u8> },
}

#[derive(Default)]
struct Concurrency {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl Concurrency {
    fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct PairServer {
    base: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
    concurrency: Arc<Concurrency>,
}

impl PairServer {
    /// Starts a server in a background thread. Paths without a route get 404.
    /// The server runs until the process exits.
    pub fn start(routes: Vec<(&str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes: Arc<HashMap<String, Route>> = Arc::new(
            routes
                .into_iter()
                .map(|(p, r)| (p.to_string(), r))
                .collect(),
        );
        let hits = Arc::new(Mutex::new(HashMap::new()));
        let server_hits = Arc::clone(&hits);
        let concurrency = Arc::new(Concurrency::default());
        let server_concurrency = Arc::clone(&concurrency);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&server_hits);
                let concurrency = Arc::clone(&server_concurrency);
                thread::spawn(move || handle(stream, &routes, &hits, &concurrency));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}", port),
            hits,
            concurrency,
        }
    }

    /// Base URL without trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }

    /// Most requests that were being served at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.concurrency.peak.load(Ordering::SeqCst)
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    hits: &Mutex<HashMap<String, usize>>,
    concurrency: &Concurrency,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let target = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/").to_string();

    let seen = {
        let mut hits = hits.lock().unwrap();
        let count = hits.entry(path.clone()).or_insert(0);
        *count += 1;
        *count
    };

    // Counted until the response is produced; a client only sees the
    // response after this request has left the in-flight count.
    concurrency.enter();
    let (status, body): (u16, &[u8]) = match routes.get(&path) {
        Some(Route::Body(body)) => (200, body),
        Some(Route::Status(code)) => (*code, b""),
        Some(Route::FailThen {
            status,
            failures,
            body,
        }) => {
            if seen <= *failures {
                (*status, b"")
            } else {
                (200, body)
            }
        }
        Some(Route::Slow { delay, body }) => {
            thread::sleep(*delay);
            (200, body)
        }
        None => (404, b""),
    };
    concurrency.leave();
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

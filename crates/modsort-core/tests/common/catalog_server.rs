//! Minimal HTTP/1.1 server standing in for the mod catalog in integration tests.
//!
//! Serves fixed bodies by exact request target (path plus query). Unknown
//! targets get 404. A route can be made flaky: it answers 503 for its first
//! `fail_first` hits, then serves normally.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

struct Route {
    body: Vec<u8>,
    content_type: &'static str,
    fail_first: usize,
    hits: AtomicUsize,
}

#[derive(Default)]
pub struct CatalogServerBuilder {
    routes: HashMap<String, Route>,
}

impl CatalogServerBuilder {
    pub fn page(mut self, target: &str, html: &str) -> Self {
        self.routes.insert(
            target.to_string(),
            Route {
                body: html.as_bytes().to_vec(),
                content_type: "text/html; charset=utf-8",
                fail_first: 0,
                hits: AtomicUsize::new(0),
            },
        );
        self
    }

    /// Serves raw bytes, e.g. a GBK-encoded page.
    pub fn raw_page(mut self, target: &str, body: Vec<u8>) -> Self {
        self.routes.insert(
            target.to_string(),
            Route {
                body,
                content_type: "text/html",
                fail_first: 0,
                hits: AtomicUsize::new(0),
            },
        );
        self
    }

    pub fn flaky(mut self, target: &str, fail_first: usize) -> Self {
        if let Some(route) = self.routes.get_mut(target) {
            route.fail_first = fail_first;
        }
        self
    }

    /// Starts the server on a background thread. The server runs until the
    /// process exits.
    pub fn start(self) -> CatalogServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes = Arc::new(self.routes);
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    handle(stream, &routes);
                });
            }
        });
        CatalogServer {
            base: format!("http://127.0.0.1:{}/", port),
            requests,
        }
    }
}

pub struct CatalogServer {
    /// Base URL with trailing slash, e.g. "http://127.0.0.1:12345/".
    pub base: String,
    requests: Arc<AtomicUsize>,
}

impl CatalogServer {
    pub fn builder() -> CatalogServerBuilder {
        CatalogServerBuilder::default()
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut request_line = request.lines().next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("");
    let target = request_line.next().unwrap_or("");

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    let Some(route) = routes.get(target) else {
        let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    };
    let hit = route.hits.fetch_add(1, Ordering::SeqCst);
    if hit < route.fail_first {
        let _ = stream.write_all(
            b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }
    let header = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.content_type,
        route.body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&route.body);
}

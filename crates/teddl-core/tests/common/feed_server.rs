//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed bodies per path (404 for anything unknown) and records every
//! requested path so tests can assert which URLs were actually fetched.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

type Routes = Arc<Mutex<HashMap<String, (u16, Vec<u8>)>>>;

pub struct FeedServer {
    base: String,
    routes: Routes,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FeedServer {
    /// Starts a server in a background thread. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes: Routes = Arc::default();
        let hits: Arc<Mutex<Vec<String>>> = Arc::default();
        {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&hits);
            thread::spawn(move || {
                for stream in listener.incoming().flatten() {
                    let routes = Arc::clone(&routes);
                    let hits = Arc::clone(&hits);
                    thread::spawn(move || handle(stream, &routes, &hits));
                }
            });
        }
        FeedServer {
            base: format!("http://127.0.0.1:{}", port),
            routes,
            hits,
        }
    }

    /// Absolute URL for `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn route(&self, path: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.into()));
    }

    /// Serve an RSS 2.0 document at `path` with one item per enclosure URL.
    pub fn route_feed(&self, path: &str, enclosures: &[String]) {
        let items: String = enclosures
            .iter()
            .enumerate()
            .map(|(i, url)| {
                format!(
                    "<item><title>Talk {i}</title><enclosure url=\"{url}\" length=\"1\" type=\"video/mp4\"/></item>"
                )
            })
            .collect();
        let doc = format!(
            "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>Talks</title>\
             <link>{}</link><description>test feed</description>{}</channel></rss>",
            self.base, items
        );
        self.route(path, 200, doc);
    }

    /// Number of requests seen for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().iter().filter(|p| *p == path).count()
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &Routes, hits: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&request);
    let mut first = request.lines().next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("/").to_string();
    hits.lock().unwrap().push(path.clone());

    let (status, body) = if method.eq_ignore_ascii_case("GET") {
        routes
            .lock()
            .unwrap()
            .get(&path)
            .cloned()
            .unwrap_or((404, b"not found".to_vec()))
    } else {
        (405, Vec::new())
    };
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned responses by request path. A route can use any status,
//! redirect elsewhere, or promise more bytes than it sends to simulate a
//! connection dropped mid-body.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: &'static str,
    pub body: Vec<u8>,
    /// Sent as `Location` when set.
    pub location: Option<String>,
    /// Advertise a longer Content-Length than the body, then close.
    pub truncate: bool,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: "200 OK",
            body: body.into(),
            location: None,
            truncate: false,
        }
    }

    pub fn status(status: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            ..Self::ok(body)
        }
    }

    pub fn redirect(to: impl Into<String>) -> Self {
        Self {
            status: "302 Found",
            body: Vec::new(),
            location: Some(to.into()),
            truncate: false,
        }
    }

    pub fn truncated(body: impl Into<Vec<u8>>) -> Self {
        Self {
            truncate: true,
            ..Self::ok(body)
        }
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
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
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    let not_found = Route::status("404 Not Found", "no such clip");
    let route = routes.get(path).unwrap_or(&not_found);

    let advertised = if route.truncate {
        route.body.len() + 1024
    } else {
        route.body.len()
    };
    let location = route
        .location
        .as_ref()
        .map(|l| format!("Location: {}\r\n", l))
        .unwrap_or_default();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        route.status, advertised, location
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&route.body);
}

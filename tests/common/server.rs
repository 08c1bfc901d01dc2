//! Throwaway HTTP responder for archive downloads.
//!
//! Answers every request with the same canned response and records the
//! request paths.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

pub struct ArchiveServer {
    base_url: String,
    paths: Arc<Mutex<Vec<String>>>,
}

impl ArchiveServer {
    /// Serve `body` with a 200 status
    pub fn ok(body: Vec<u8>) -> Self {
        Self::start("200 OK", body)
    }

    /// Serve a 404
    pub fn not_found() -> Self {
        Self::start("404 Not Found", b"Not Found".to_vec())
    }

    pub fn start(status_line: &'static str, body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let addr = listener.local_addr().expect("server address");
        let paths = Arc::new(Mutex::new(Vec::new()));
        let recorded = paths.clone();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                if let Some(path) = request_line.split_whitespace().nth(1) {
                    recorded.lock().unwrap().push(path.to_string());
                }
                loop {
                    let mut header = String::new();
                    match reader.read_line(&mut header) {
                        Ok(0) => break,
                        Ok(_) if header == "\r\n" => break,
                        Ok(_) => {}
                        Err(_) => break,
                    }
                }

                let head = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/x-gzip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
                let _ = stream.flush();
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            paths,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request paths seen so far
    pub fn requests(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

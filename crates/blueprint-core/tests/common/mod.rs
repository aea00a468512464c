//! Shared fixtures: a local contents-API server and a recording command runner

#![allow(dead_code)]

use blueprint_core::runtime::{CommandOutput, CommandRunner, Invocation};
use blueprint_core::{SourceClient, SourceConfig};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

/// Serves canned responses keyed by request path (query string excluded)
pub struct FakeContentsApi {
    pub url: Url,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeContentsApi {
    pub async fn start(routes: Vec<(&str, u16, &str)>) -> Self {
        let routes: HashMap<String, (u16, String)> = routes
            .into_iter()
            .map(|(path, status, body)| (path.to_string(), (status, body.to_string())))
            .collect();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_head(&mut socket).await;
                let path = request
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .split('?')
                    .next()
                    .unwrap_or("/")
                    .to_string();
                seen.lock().unwrap().push(request);

                let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or((404, "{\"message\":\"Not Found\"}".to_string()));
                let response = format!(
                    "HTTP/1.1 {} {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { url, requests }
    }

    pub fn client(&self, token: Option<&str>) -> SourceClient {
        SourceClient::new(self.config(token)).unwrap()
    }

    pub fn config(&self, token: Option<&str>) -> SourceConfig {
        SourceConfig::default()
            .with_api_url(self.url.clone())
            .with_registry(
                Some("acme".to_string()),
                Some("registry".to_string()),
                Some("main".to_string()),
            )
            .with_token(token.map(str::to_string))
    }

    /// Raw request heads received so far, lowercased
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.to_lowercase())
            .collect()
    }
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Records invocations and replays queued outputs; succeeds silently when the queue is empty
#[derive(Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<Invocation>>,
    outputs: Mutex<VecDeque<CommandOutput>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_stdout(self, stdout: &str) -> Self {
        self.outputs.lock().unwrap().push_back(CommandOutput {
            success: true,
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(CommandOutput {
                success: true,
                code: Some(0),
                ..Default::default()
            }))
    }
}

//! Local TCP stubs standing in for forward proxies and the proxy-list provider.

#![allow(dead_code)]

use parking_lot::Mutex;
use reqwest_proxy_rotator::{MetricsConfig, MetricsRecorder, ProxyDescriptor};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn recorder(namespace: &str) -> MetricsRecorder {
    MetricsRecorder::new(MetricsConfig::new(namespace)).unwrap()
}

/// Accepts HTTP/1.1 requests, records their heads and answers every one of
/// them with the same canned response, or never answers at all.
pub struct Stub {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    heads: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    pub async fn respond(status: &str, body: impl Into<String>) -> Self {
        let body = body.into();
        let reply = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        Self::spawn(Some(Arc::from(reply))).await
    }

    /// A stub that reads requests but never replies.
    pub async fn silent() -> Self {
        Self::spawn(None).await
    }

    async fn spawn(reply: Option<Arc<str>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let heads = Arc::new(Mutex::new(Vec::new()));

        let (task_hits, task_heads) = (Arc::clone(&hits), Arc::clone(&heads));
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(serve(
                    socket,
                    reply.clone(),
                    Arc::clone(&task_hits),
                    Arc::clone(&task_heads),
                ));
            }
        });

        Self { addr, hits, heads }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn heads(&self) -> Vec<String> {
        self.heads.lock().clone()
    }

    /// Descriptor pointing at this stub as a forward proxy.
    pub fn descriptor(&self) -> ProxyDescriptor {
        ProxyDescriptor::new(self.addr.ip().to_string(), self.addr.port().to_string()).with_status("online")
    }
}

async fn serve(
    mut socket: TcpStream,
    reply: Option<Arc<str>>,
    hits: Arc<AtomicUsize>,
    heads: Arc<Mutex<Vec<String>>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    hits.fetch_add(1, Ordering::SeqCst);
    heads.lock().push(String::from_utf8_lossy(&buf).into_owned());

    match reply {
        Some(reply) => {
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
        None => tokio::time::sleep(Duration::from_secs(60)).await,
    }
}

/// An address nothing is listening on.
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

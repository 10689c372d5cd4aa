//! Local HTTP stub standing in for the archive and its mirror.
//!
//! Every request path is looked up in a route table; requests are recorded
//! in arrival order so tests can assert which URLs were hit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tokio::task::JoinHandle;

/// Canned reply for one route.
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// 200 with this body
    Body(Bytes),
    /// Empty body with this status
    Status(u16),
    /// Wait this long, then reply 200 with the body
    Stall(Duration, Bytes),
    /// 200, then `count` copies of `chunk`, one every `interval`
    Trickle {
        chunk: Bytes,
        count: usize,
        interval: Duration,
    },
    /// 200 and the first bytes of the body, then silence for `delay`
    StallBody { head: Bytes, delay: Duration },
    /// 200 and the first bytes of the body, then the connection is dropped
    Truncate(Bytes),
}

struct StubState {
    routes: HashMap<String, StubResponse>,
    hits: Mutex<Vec<String>>,
}

/// A running stub server bound to an ephemeral local port.
pub struct StubServer {
    base_url: String,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Start serving `routes` (request path → response). Unknown paths are 404.
    pub async fn start<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = (S, StubResponse)>,
        S: Into<String>,
    {
        let state = Arc::new(StubState {
            routes: routes.into_iter().map(|(p, r)| (p.into(), r)).collect(),
            hits: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(handle_request)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    /// `http://127.0.0.1:<port>` without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` (which should start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Paths requested so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.state.hits.lock().expect("hits lock").clone()
    }

    /// Number of requests made to `path`.
    pub fn hit_count(&self, path: &str) -> usize {
        self.hits().iter().filter(|p| p.as_str() == path).count()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_request(State(state): State<Arc<StubState>>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    state.hits.lock().expect("hits lock").push(path.clone());

    match state.routes.get(&path).cloned() {
        Some(StubResponse::Body(body)) => (StatusCode::OK, body).into_response(),
        Some(StubResponse::Status(code)) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Some(StubResponse::Stall(delay, body)) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, body).into_response()
        }
        Some(StubResponse::Trickle {
            chunk,
            count,
            interval,
        }) => {
            let body = stream::iter(0..count).then(move |i| {
                let chunk = chunk.clone();
                async move {
                    if i > 0 {
                        tokio::time::sleep(interval).await;
                    }
                    Ok::<_, std::io::Error>(chunk)
                }
            });
            (StatusCode::OK, Body::from_stream(body)).into_response()
        }
        Some(StubResponse::StallBody { head, delay }) => {
            let tail = stream::once(async move {
                tokio::time::sleep(delay).await;
                Ok::<_, std::io::Error>(Bytes::new())
            });
            let body = stream::once(async move { Ok(head) }).chain(tail);
            (StatusCode::OK, Body::from_stream(body)).into_response()
        }
        Some(StubResponse::Truncate(head)) => {
            let body = stream::iter([
                Ok(head),
                Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "stub dropped the connection",
                )),
            ]);
            (StatusCode::OK, Body::from_stream(body)).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A base URL nothing is listening on, for connection-refused cases.
pub async fn unused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind scratch listener");
    let addr = listener.local_addr().expect("scratch address");
    drop(listener);
    format!("http://{}", addr)
}

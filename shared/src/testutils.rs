//! In-process mock mirrors for tests.
//!
//! Each mock binds `127.0.0.1:0`, serves every connection with hyper and
//! records the requests it receives so tests can assert on what went over
//! the wire.

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::HeaderMap;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

/// A request as seen by a mock mirror.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What a mock mirror answers with.
#[derive(Clone, Debug)]
pub struct MockReply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "")
    }

    /// Hold the reply back for `delay` before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

type Responder = dyn Fn(&RecordedRequest) -> MockReply + Send + Sync;

struct MockState {
    respond: Box<Responder>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Handle to a running mock mirror.
#[derive(Clone)]
pub struct MockMirror {
    url: Url,
    state: Arc<MockState>,
}

impl MockMirror {
    /// Base URL of the mirror, including the `/rest/v1/` prefix real mirrors use.
    pub fn url(&self) -> Url {
        self.url.clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Start a mock mirror that answers every request with `respond`.
pub async fn start_mock_mirror<F>(respond: F) -> MockMirror
where
    F: Fn(&RecordedRequest) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to address");
    let port = listener.local_addr().expect("listener address").port();

    let state = Arc::new(MockState {
        respond: Box::new(respond),
        requests: Mutex::new(Vec::new()),
    });

    let server_state = state.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let io = TokioIo::new(stream);
            let state = server_state.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let state = state.clone();
                    async move { Ok::<_, Infallible>(handle(&state, req).await) }
                });

                let _ = Builder::new(TokioExecutor::new())
                    .serve_connection(io, service)
                    .await;
            });
        }
    });

    let url = Url::parse(&format!("http://127.0.0.1:{port}/rest/v1/"))
        .expect("Failed to parse mock URL");

    MockMirror { url, state }
}

/// Start a mock mirror that always answers with the same reply.
pub async fn start_static_mirror(reply: MockReply) -> MockMirror {
    start_mock_mirror(move |_| reply.clone()).await
}

/// A mirror URL nothing listens on; connecting to it is refused.
pub fn refused_url() -> Url {
    Url::parse("http://127.0.0.1:1/rest/v1/").expect("Failed to parse URL")
}

async fn handle(state: &MockState, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();
    let body = body
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .unwrap_or_default();

    let recorded = RecordedRequest {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body,
    };

    let reply = (state.respond)(&recorded);
    state
        .requests
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(recorded);

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = Response::new(Full::new(Bytes::from(reply.body)));
    *response.status_mut() = reply.status;
    response
}

//! Request middleware applied to every outgoing call before dispatch.
//!
//! A middleware is a plain transform: it receives the request and returns
//! the request that should be sent instead. The chain runs each transform in
//! the order it was registered and never short-circuits.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use http::Extensions;
use log::debug;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};

/// Transforms a request before it is dispatched.
///
/// Implemented for any `Fn(Request) -> Request`, so closures can be
/// registered directly.
pub trait RequestMiddleware: Send + Sync + 'static {
    fn apply(&self, request: Request) -> Request;
}

impl<F> RequestMiddleware for F
where
    F: Fn(Request) -> Request + Send + Sync + 'static,
{
    fn apply(&self, request: Request) -> Request {
        self(request)
    }
}

/// Ordered list of request middleware.
#[derive(Clone, Default)]
pub struct RequestMiddlewareChain {
    middleware: Vec<Arc<dyn RequestMiddleware>>,
}

impl RequestMiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, middleware: Arc<dyn RequestMiddleware>) {
        self.middleware.push(middleware);
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Runs every middleware left to right, feeding each the previous output.
    pub fn apply(&self, request: Request) -> Request {
        self.middleware.iter().fold(request, |request, m| m.apply(request))
    }
}

#[async_trait]
impl Middleware for RequestMiddlewareChain {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        next.run(self.apply(req), extensions).await
    }
}

/// Middleware that renders each request as an equivalent `curl` command.
///
/// The command is passed to the configured sink and the request continues
/// unchanged. Streaming bodies cannot be inspected and are left out of the
/// command.
pub struct DumpCurl {
    out: Box<dyn Fn(String) + Send + Sync>,
}

impl DumpCurl {
    pub fn new<F>(out: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Self { out: Box::new(out) }
    }

    /// Logs the command at debug level.
    pub fn to_log() -> Self {
        Self::new(|curl| debug!(target: "capis::curl", "{}", curl))
    }
}

impl RequestMiddleware for DumpCurl {
    fn apply(&self, request: Request) -> Request {
        (self.out)(curl_command(&request));
        request
    }
}

fn curl_command(request: &Request) -> String {
    let mut cmd = format!("curl -X '{}'", request.method());

    for (name, value) in request.headers() {
        match value.to_str() {
            Ok(v) => {
                let _ = write!(cmd, " -H '{}: {}'", name, shell_escape(v));
            },
            Err(_) => {
                let _ = write!(cmd, " -H '{}: <binary>'", name);
            },
        }
    }

    if let Some(body) = request.body().and_then(|b| b.as_bytes()) {
        let _ = write!(cmd, " -d '{}'", shell_escape(&String::from_utf8_lossy(body)));
    }

    let _ = write!(cmd, " '{}'", request.url());
    cmd
}

fn shell_escape(s: &str) -> String {
    s.replace('\'', "'\\''")
}

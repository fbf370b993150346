//! Dispatcher core module - hot path for request dispatch.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::handler::{BadRequestHandler, Handler, ResponseSink, RouteRequest};
use crate::router::Router;

/// Request entry point
///
/// Owns a handle to the [`Router`] and drives one request to exactly one
/// response write: the server-wide `*` target is answered 400 directly,
/// everything else resolves through the router and the resolved handler
/// (business handler, fixed 404/405, or a synthesized redirect) is invoked
/// with the response sink.
#[derive(Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }

    /// The router this dispatcher resolves against.
    #[must_use]
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Serve one request
    ///
    /// A raw request target of `*` (the server-wide OPTIONS form) is
    /// rejected with 400 before any routing happens; on HTTP/1.1 and later
    /// the `Connection: close` header is set first. Every other request is
    /// resolved and handed to the resulting handler. Each path through here
    /// writes exactly one response.
    pub fn dispatch(&self, req: &RouteRequest, res: &mut dyn ResponseSink) {
        if req.raw_target == "*" {
            // Connection: close goes on before the error body is written.
            if req.proto_at_least(1, 1) {
                res.set_header("Connection", "close");
            }
            BadRequestHandler.serve(req, res);
            warn!(
                method = %req.method,
                proto_major = req.proto_major,
                proto_minor = req.proto_minor,
                "Wildcard request target rejected"
            );
            return;
        }

        let resolve_start = Instant::now();
        let resolution = self.router.resolve(req);
        debug!(
            method = %req.method,
            host = %req.host,
            path = %req.path,
            pattern = %resolution.pattern,
            duration_us = resolve_start.elapsed().as_micros(),
            "Request resolved"
        );
        resolution.handler.serve(req, res);
    }
}

//! Handler and response-sink capability contracts
//!
//! The routing core never touches the transport directly. Business handlers
//! implement [`Handler`], the server layer implements [`ResponseSink`] over
//! whatever response primitive it owns, and [`RouteRequest`] is the narrow
//! request shape the router needs: method, host, path, raw target, query and
//! protocol version. Everything else about the request (headers, body) stays
//! outside the core.

use std::collections::HashMap;

use http::Method;

/// The request shape consumed by the router
///
/// Built by the server layer from the transport request (see
/// `server::parse_request`) or directly in tests. The `path` is the
/// already-split path component; `raw_target` is the request target exactly
/// as received, used only to detect the server-wide `*` form.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub method: Method,
    /// Host header value, may still carry a `:port` suffix
    pub host: String,
    /// Path component of the target, no query string
    pub path: String,
    /// Request target as received on the request line
    pub raw_target: String,
    /// Query string without the leading `?`, if any
    pub raw_query: Option<String>,
    pub proto_major: u8,
    pub proto_minor: u8,
}

impl RouteRequest {
    /// Build a request with defaults suitable for tests and benches:
    /// HTTP/1.1, no query, raw target equal to the path.
    pub fn new(method: Method, host: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            method,
            host: host.into(),
            raw_target: path.clone(),
            path,
            raw_query: None,
            proto_major: 1,
            proto_minor: 1,
        }
    }

    /// True when the request protocol is at least `major.minor`.
    pub fn proto_at_least(&self, major: u8, minor: u8) -> bool {
        self.proto_major > major || (self.proto_major == major && self.proto_minor >= minor)
    }

    /// CONNECT requests skip port stripping and path canonicalization.
    pub fn is_connect(&self) -> bool {
        self.method == Method::CONNECT
    }

    /// Decoded query parameters. Repeated keys keep the last value.
    pub fn query_params(&self) -> HashMap<String, String> {
        match &self.raw_query {
            Some(q) => url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect(),
            None => HashMap::new(),
        }
    }
}

/// Minimal response-writing capability
///
/// The router uses this only for its own synthetic responses (301, 400, 404,
/// 405); business handlers are free to use it however they like. The server
/// layer adapts the real transport response to this trait.
pub trait ResponseSink {
    fn set_status(&mut self, code: u16);
    fn set_header(&mut self, name: &str, value: &str);
    fn write_body(&mut self, body: &[u8]);
}

/// A routed request handler
///
/// Handlers are registered once and shared across request coroutines, so
/// they must be `Send + Sync` and take `&self`.
pub trait Handler: Send + Sync {
    fn serve(&self, req: &RouteRequest, res: &mut dyn ResponseSink);
}

/// Adapter turning a plain closure into a [`Handler`]
///
/// Used by `Router::register_fn`; also handy for inline handlers in tests.
pub struct HandlerFn<F>(pub F);

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&RouteRequest, &mut dyn ResponseSink) + Send + Sync,
{
    fn serve(&self, req: &RouteRequest, res: &mut dyn ResponseSink) {
        (self.0)(req, res)
    }
}

/// Fixed 400 handler used by the dispatcher for the server-wide `*` target.
pub struct BadRequestHandler;

impl Handler for BadRequestHandler {
    fn serve(&self, _req: &RouteRequest, res: &mut dyn ResponseSink) {
        res.set_status(400);
        res.set_header("Content-Type", "text/plain; charset=utf-8");
        res.set_header("X-Content-Type-Options", "nosniff");
        res.write_body(b"400 bad request\n");
    }
}

/// Fixed 404 handler returned when no pattern matches under any method.
pub struct NotFoundHandler;

impl Handler for NotFoundHandler {
    fn serve(&self, _req: &RouteRequest, res: &mut dyn ResponseSink) {
        res.set_status(404);
        res.set_header("Content-Type", "text/plain; charset=utf-8");
        res.set_header("X-Content-Type-Options", "nosniff");
        res.write_body(b"404 page not found\n");
    }
}

/// Fixed 405 handler returned when the path exists under a different method.
pub struct MethodNotAllowedHandler;

impl Handler for MethodNotAllowedHandler {
    fn serve(&self, _req: &RouteRequest, res: &mut dyn ResponseSink) {
        res.set_status(405);
        res.set_header("Content-Type", "text/plain; charset=utf-8");
        res.set_header("X-Content-Type-Options", "nosniff");
        res.write_body(b"405 method not allowed\n");
    }
}

/// Permanent-redirect handler synthesized by the router
///
/// Carries the full redirect target (path plus any preserved query string).
/// The short HTML body is only written for GET, and the HTML content type is
/// only set for GET and HEAD; other methods get a bare 301 with `Location`.
pub struct RedirectHandler {
    location: String,
}

impl RedirectHandler {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl Handler for RedirectHandler {
    fn serve(&self, req: &RouteRequest, res: &mut dyn ResponseSink) {
        res.set_header("Location", &hex_escape_non_ascii(&self.location));
        if req.method == Method::GET || req.method == Method::HEAD {
            res.set_header("Content-Type", "text/html; charset=utf-8");
        }
        res.set_status(301);
        if req.method == Method::GET {
            let body = format!(
                "<a href=\"{}\">Moved Permanently</a>.\n",
                html_escape(&self.location)
            );
            res.write_body(body.as_bytes());
        }
    }
}

/// Percent-encode non-ASCII bytes so the Location header stays ASCII-clean.
fn hex_escape_non_ascii(s: &str) -> String {
    if s.is_ascii() {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        if b.is_ascii() {
            out.push(b as char);
        } else {
            out.push('%');
            out.push_str(&format!("{:02X}", b));
        }
    }
    out
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

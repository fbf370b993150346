//! # methodmux
//!
//! **methodmux** is a method-aware HTTP request router for Rust, built on the
//! `may` coroutine runtime. It keeps one pattern table per HTTP method and
//! matches paths the way Go's `net/http` `ServeMux` does: exact entries win,
//! longer trailing-slash subtree patterns beat shorter ones, host-qualified
//! patterns beat generic ones, and non-canonical paths are answered with a
//! `301` to the canonical form.
//!
//! ## Overview
//!
//! methodmux separates two concerns that single-table routers conflate:
//!
//! - **Which resource** does this path name? (pattern matching)
//! - **Is this verb allowed** on that resource? (method awareness)
//!
//! Because each method owns its own table, a miss under the request's method
//! can be disambiguated by probing the other methods' tables: if any of them
//! would serve the path, the router answers `405 Method Not Allowed` instead
//! of `404 Not Found`. Resolution never fails; it always produces a servable
//! handler (the matched route, a synthesized redirect, or the built-in
//! 404/405 responders).
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`router`]** - Per-method pattern tables, path canonicalization and
//!   route resolution
//! - **[`dispatcher`]** - Request dispatch, wildcard `*` target rejection and
//!   per-request timing
//! - **[`handler`]** - The [`Handler`]/[`ResponseSink`] capability contracts
//!   and the built-in 404/405/redirect handlers
//! - **[`server`]** - HTTP server built on `may_minihttp` with
//!   request/response adapters
//! - **[`echo`]** - Example echo handler used by the demo binary and tests
//! - **[`runtime_config`]** - Coroutine stack size configuration from the
//!   environment
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer<br/>(may_minihttp)
//!     participant Service as AppService
//!     participant Dispatcher as Dispatcher
//!     participant Router as Router
//!     participant Handler as Handler
//!
//!     Client->>Server: HTTP Request<br/>GET /dir
//!     Server->>Service: call(req, res)
//!     Service->>Service: parse_request<br/>(method, host, path, query, proto)
//!
//!     alt Malformed request line
//!         Service-->>Client: 400 Bad Request
//!     end
//!
//!     Service->>Dispatcher: dispatch(route_req, sink)
//!
//!     alt Target is "*"
//!         Dispatcher-->>Client: 400 Bad Request<br/>(Connection: close on HTTP/1.1+)
//!     end
//!
//!     Dispatcher->>Router: resolve(route_req)
//!     Router->>Router: clean path, strip host port
//!     Router->>Router: match own-method table
//!
//!     alt No match under own method
//!         Router->>Router: probe other methods' tables
//!         alt Some other method matches
//!             Router-->>Dispatcher: 405 handler, pattern ""
//!         else Nothing matches anywhere
//!             Router-->>Dispatcher: 404 handler, pattern ""
//!         end
//!     end
//!
//!     alt Path not canonical
//!         Router-->>Dispatcher: redirect handler<br/>(301 to canonical path)
//!     end
//!
//!     Router-->>Dispatcher: RouteResolution<br/>(handler, pattern)
//!     Dispatcher->>Handler: serve(route_req, sink)
//!     Handler-->>Dispatcher: status, headers, body
//!     Dispatcher-->>Service: sink filled
//!     Service-->>Client: HTTP Response
//! ```
//!
//! ### Key Architectural Patterns
//!
//! 1. **Method-First Tables**: One pattern table per HTTP method; 404 vs 405
//!    falls out of probing the other tables
//! 2. **Coroutine-Based Concurrency**: Each connection runs in a lightweight
//!    `may` coroutine
//! 3. **Capability Traits**: Handlers see only [`RouteRequest`] and
//!    [`ResponseSink`], never the transport types
//! 4. **Always-Servable Resolution**: `resolve` returns a handler for every
//!    request; errors surface only at registration time
//! 5. **Canonical Paths**: `.`/`..` segments and missing trailing slashes are
//!    answered with `301` redirects rather than fuzzy matching
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use http::Method;
//! use methodmux::dispatcher::Dispatcher;
//! use methodmux::echo::EchoHandler;
//! use methodmux::router::Router;
//! use methodmux::server::{AppService, HttpServer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = Router::new();
//!     router.register(Method::GET, "/search", Arc::new(EchoHandler))?;
//!     router.register_fn(Method::GET, "/dir/", |_req, res| {
//!         res.set_status(200);
//!         res.write_body(b"directory listing\n");
//!     })?;
//!
//!     let dispatcher = Arc::new(Dispatcher::new(Arc::new(router)));
//!     let server = HttpServer(AppService::new(dispatcher));
//!     let handle = server.start("0.0.0.0:8080")?;
//!     handle.join().map_err(|_| "server panicked")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Resolution Semantics
//!
//! For a request `(method, host, path)` the router:
//!
//! 1. Rejects the server-wide `*` target with `400` (in the dispatcher)
//! 2. Strips any port from the host (`example.com:8080` matches
//!    `example.com/...` patterns)
//! 3. Redirects to the lexically cleaned path when `path` contains `.` or
//!    `..` segments
//! 4. Redirects `/dir` to `/dir/` when only the subtree `/dir/` is registered
//! 5. Tries host-qualified patterns (`sub.example.com/search`) before generic
//!    ones (`/search`)
//! 6. On a miss, probes the other methods to pick `405` over `404`
//!
//! `CONNECT` requests are matched verbatim: no port stripping and no path
//! canonicalization, although the trailing-slash redirect still applies.
//!
//! ## Runtime Considerations
//!
//! methodmux uses the `may` coroutine runtime, not tokio or async-std. This
//! means:
//!
//! - All requests are served on coroutines (lightweight threads)
//! - Stack size is configurable via the `METHODMUX_STACK_SIZE` environment
//!   variable (see [`runtime_config`])
//! - The runtime is incompatible with tokio-based libraries without bridging
//! - Blocking operations should use `may`'s blocking facilities
//!
//! ## Demo Service
//!
//! The `methodmux` binary starts a small echo service with a handful of
//! routes registered across several methods:
//!
//! ```bash
//! cargo run -- --addr 127.0.0.1:8080 --verbose
//!
//! curl http://127.0.0.1:8080/search?q=routers     # 200, echoed as JSON
//! curl http://127.0.0.1:8080/dir                  # 301 -> /dir/
//! curl -X POST http://127.0.0.1:8080/search       # 405 method not allowed
//! curl http://127.0.0.1:8080/nope                 # 404 page not found
//! ```

pub mod dispatcher;
pub mod echo;
pub mod handler;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use dispatcher::Dispatcher;
pub use handler::{Handler, HandlerFn, ResponseSink, RouteRequest};
pub use router::{MatchOutcome, Pattern, RegisterError, RouteResolution, Router};

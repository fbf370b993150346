//! # Dispatcher Module
//!
//! The dispatcher is the request entry point sitting between the server
//! layer and the router. It owns the one piece of behavior that must happen
//! before any routing: rejecting the server-wide `*` request target with
//! 400 (and `Connection: close` on HTTP/1.1+). Everything else flows
//! through [`crate::router::Router::resolve`] and into the resolved
//! handler.
//!
//! ## Request Flow
//!
//! ```text
//! AppService (transport)
//!     | parse into RouteRequest
//!     v
//! Dispatcher::dispatch
//!     | `*` target?  -> 400 Bad Request (terminal)
//!     v
//! Router::resolve
//!     | match / redirect / 404 / 405
//!     v
//! Handler::serve -> ResponseSink (terminal)
//! ```
//!
//! Every request terminates in exactly one response write; there is no
//! partial or retried dispatch, and the dispatcher itself never writes a
//! status except for the `*` case.

mod core;

pub use core::Dispatcher;

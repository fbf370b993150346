//! # Router Module
//!
//! The router module provides pattern matching and route resolution for
//! methodmux. Requests are resolved by (method, host, path): each HTTP
//! method owns its own pattern table, and a miss in the request's own method
//! probes the remaining tables so a wrong verb answers 405 rather than 404.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Storing (method, pattern) → handler registrations, rejecting duplicates
//! - Matching incoming requests against exact and subtree patterns, with
//!   host-qualified patterns taking precedence over generic ones
//! - Synthesizing permanent redirects for non-canonical paths (dot segments,
//!   duplicate slashes, missing trailing slash on a subtree)
//! - Folding misses into the fixed 404/405 handlers so resolution always
//!   yields something servable
//!
//! ## Architecture
//!
//! Matching works in two phases:
//!
//! 1. **Own method**: the table registered for the request's method answers
//!    with a match, a redirect, or a miss. Paths are canonicalized first
//!    (except for CONNECT, which is matched verbatim).
//!
//! 2. **Cross-method probe**: on a miss, every other method's table is asked
//!    whether it would accept the same request; any taker means the resource
//!    exists and the response is 405, otherwise 404.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use http::Method;
//! use methodmux::router::Router;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let router = Router::new();
//! router.register(Method::GET, "/dir/", Arc::new(DirHandler))?;
//! router.register_fn(Method::GET, "sub.example.com/", |req, res| {
//!     res.set_status(200);
//! })?;
//!
//! let resolution = router.resolve(&request);
//! println!("pattern: {}", resolution.pattern);
//! # Ok(())
//! # }
//! ```
//!
//! ## Performance
//!
//! Exact patterns resolve through a single hash lookup; subtree patterns are
//! scanned longest-first, so complexity is O(s) in the number of registered
//! subtrees, not the number of routes. Resolution takes a shared read lock
//! and never allocates beyond the returned pattern string and, when hosts
//! are registered, one host+path key.

mod core;
mod error;
mod pattern;

pub use core::{RouteResolution, Router};
pub use error::RegisterError;
pub use pattern::{MatchOutcome, Pattern, PatternTable};

//! Router core module - hot path for request resolution.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use http::Method;
use tracing::{debug, warn};

use crate::handler::{
    Handler, HandlerFn, MethodNotAllowedHandler, NotFoundHandler, RedirectHandler, ResponseSink,
    RouteRequest,
};

use super::error::RegisterError;
use super::pattern::{MatchOutcome, Pattern, PatternTable};

/// Result of resolving a request against the routing table
///
/// Always carries a servable handler: misses come back as the fixed 404/405
/// handlers, and non-canonical paths as a synthesized redirect handler. The
/// `pattern` field is empty exactly when the resolution is an internally
/// generated 404 or 405; otherwise it is the packed string form of the
/// matched (or post-redirect) pattern.
#[derive(Clone)]
pub struct RouteResolution {
    pub handler: Arc<dyn Handler>,
    pub pattern: String,
}

/// Method-aware request router
///
/// Owns one [`PatternTable`] per HTTP method. Resolution queries the
/// request's own method first; on a miss it probes every other method's
/// table to distinguish an unknown resource (404) from a known resource
/// addressed with the wrong verb (405).
///
/// Registration and resolution are both safe to call concurrently: the
/// per-method tables sit behind a reader-writer lock, so any number of
/// resolutions proceed in parallel while a registration briefly takes the
/// table map exclusively (the duplicate check and the insert happen under
/// one write acquisition).
pub struct Router {
    tables: RwLock<HashMap<Method, PatternTable>>,
    not_found: Arc<dyn Handler>,
    method_not_allowed: Arc<dyn Handler>,
}

impl Router {
    /// Create an empty router. Method tables are created lazily on first
    /// registration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            not_found: Arc::new(NotFoundHandler),
            method_not_allowed: Arc::new(MethodNotAllowedHandler),
        }
    }

    /// Register a handler for `(method, pattern)`
    ///
    /// The pattern is accepted in packed string form (`"/dir/"`,
    /// `"sub.example.com/"`) or as an explicit [`Pattern`]. Fails with
    /// [`RegisterError::DuplicatePattern`] when the key is already taken;
    /// routes are never replaced.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// router.register(Method::GET, "/health", Arc::new(HealthHandler))?;
    /// router.register(Method::GET, "sub.example.com/", Arc::new(SubsiteHandler))?;
    /// ```
    pub fn register(
        &self,
        method: Method,
        pattern: impl Into<Pattern>,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RegisterError> {
        let pattern = pattern.into();
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let table = tables
            .entry(method.clone())
            .or_insert_with(PatternTable::new);
        match table.register(&pattern, handler) {
            Ok(()) => {
                debug!(method = %method, pattern = %pattern, "Route registered");
                Ok(())
            }
            Err(err) => {
                warn!(
                    method = %method,
                    pattern = %pattern,
                    error = %err,
                    "Route registration rejected"
                );
                Err(err)
            }
        }
    }

    /// Register a plain closure as a handler
    ///
    /// Sugar over [`Router::register`] wrapping the closure in
    /// [`HandlerFn`].
    pub fn register_fn<F>(
        &self,
        method: Method,
        pattern: impl Into<Pattern>,
        handler: F,
    ) -> Result<(), RegisterError>
    where
        F: Fn(&RouteRequest, &mut dyn ResponseSink) + Send + Sync + 'static,
    {
        self.register(method, pattern, Arc::new(HandlerFn(handler)))
    }

    /// Resolve a request to the handler that should serve it
    ///
    /// Never fails: misses resolve to the fixed 404/405 handlers and
    /// non-canonical paths to a permanent-redirect handler carrying the
    /// canonical target (the request's query string is preserved on the
    /// redirect). The returned pattern is for observability only; dispatch
    /// uses the handler regardless.
    #[must_use]
    pub fn resolve(&self, req: &RouteRequest) -> RouteResolution {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let is_connect = req.is_connect();

        if let Some(table) = tables.get(&req.method) {
            match table.match_request(&req.host, &req.path, is_connect) {
                MatchOutcome::Matched { handler, pattern } => {
                    debug!(
                        method = %req.method,
                        path = %req.path,
                        pattern = %pattern,
                        "Route matched"
                    );
                    return RouteResolution { handler, pattern };
                }
                // A redirect whose target would not match anything either is
                // treated as a miss and falls through to the probe below.
                MatchOutcome::Redirect { target, pattern } if !pattern.is_empty() => {
                    let location = match &req.raw_query {
                        Some(query) => format!("{}?{}", target, query),
                        None => target,
                    };
                    debug!(
                        method = %req.method,
                        path = %req.path,
                        location = %location,
                        pattern = %pattern,
                        "Redirecting to canonical path"
                    );
                    return RouteResolution {
                        handler: Arc::new(RedirectHandler::new(location)),
                        pattern,
                    };
                }
                _ => {}
            }
        }

        // Nothing under the request's own method. Probe the other methods'
        // tables with the same request to tell a missing resource from a
        // wrong verb.
        let other_method_matches = tables.iter().any(|(method, table)| {
            method != &req.method
                && !table
                    .match_request(&req.host, &req.path, is_connect)
                    .pattern()
                    .is_empty()
        });

        if other_method_matches {
            debug!(
                method = %req.method,
                path = %req.path,
                "Path registered under a different method"
            );
            RouteResolution {
                handler: Arc::clone(&self.method_not_allowed),
                pattern: String::new(),
            }
        } else {
            debug!(method = %req.method, path = %req.path, "No route matched");
            RouteResolution {
                handler: Arc::clone(&self.not_found),
                pattern: String::new(),
            }
        }
    }

    /// Total number of registered patterns across all methods.
    #[must_use]
    pub fn route_count(&self) -> usize {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.values().map(PatternTable::len).sum()
    }

    /// Print all registered routes to stdout
    ///
    /// Useful for debugging and verifying registrations at startup.
    pub fn dump_routes(&self) {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let mut methods: Vec<&Method> = tables.keys().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        for method in methods {
            if let Some(table) = tables.get(method) {
                let mut patterns = table.patterns();
                patterns.sort_unstable();
                for pattern in patterns {
                    println!("[route] {method} {pattern}");
                }
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

//! Pattern storage and matching for exact and subtree routes
//!
//! This module is the matching engine behind the router: one [`PatternTable`]
//! per HTTP method, answering "what handles this host and path" queries and
//! synthesizing redirects when the path is not in canonical form.
//!
//! ## Pattern forms
//!
//! A pattern is an optional host scope plus a rooted path, written as a
//! single packed string:
//!
//! - `/search` — host-generic exact pattern, matches only `/search`
//! - `/images/` — host-generic subtree pattern, matches `/images/` and
//!   everything below it
//! - `sub.example.com/` — host-qualified subtree, matches any path but only
//!   for requests whose Host is `sub.example.com` (ports ignored)
//!
//! A pattern string that does not start with `/` is host-qualified; the host
//! runs up to the first `/`.
//!
//! ## Precedence
//!
//! Host-qualified patterns always beat host-generic ones, even shorter ones.
//! Within a phase an exact hit beats any subtree, and among subtree prefixes
//! the longest registered pattern wins.
//!
//! ## Redirect synthesis
//!
//! Two situations produce a [`MatchOutcome::Redirect`] instead of a match:
//! a non-canonical path (dot segments, duplicate slashes, missing root) is
//! redirected to its cleaned form, and a path one `/` short of a registered
//! subtree (with no exact pattern of its own) is redirected onto the
//! subtree. CONNECT requests skip cleaning but still get the trailing-slash
//! redirect.
//!
//! ## Example
//!
//! ```rust,ignore
//! use methodmux::router::{MatchOutcome, Pattern, PatternTable};
//!
//! let mut table = PatternTable::new();
//! table.register(&Pattern::parse("/dir/"), handler)?;
//!
//! match table.match_request("example.com", "/dir", false) {
//!     MatchOutcome::Redirect { target, .. } => assert_eq!(target, "/dir/"),
//!     _ => unreachable!(),
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::handler::Handler;

use super::error::RegisterError;

/// A registration key: an optional host scope plus a rooted path
///
/// A path ending in `/` makes the pattern a *subtree* pattern matching
/// itself and everything below it; any other path is *exact* and matches
/// only the identical path. Patterns are immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    host: Option<String>,
    path: String,
}

impl Pattern {
    /// Host-generic pattern.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            host: None,
            path: path.into(),
        }
    }

    /// Pattern scoped to a single request host. The host must not carry a
    /// port; request ports are stripped before matching.
    pub fn with_host(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            path: path.into(),
        }
    }

    /// Parse the packed string form: `host/path` when the string does not
    /// start with `/`, bare `/path` otherwise.
    pub fn parse(pattern: &str) -> Self {
        if pattern.is_empty() || pattern.starts_with('/') {
            return Self::new(pattern);
        }
        match pattern.find('/') {
            Some(idx) => Self::with_host(&pattern[..idx], &pattern[idx..]),
            None => Self::with_host(pattern, ""),
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Subtree patterns end in `/` and match everything below them.
    pub fn is_subtree(&self) -> bool {
        self.path.ends_with('/')
    }

    fn is_empty(&self) -> bool {
        self.host.is_none() && self.path.is_empty()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Some(host) => write!(f, "{}{}", host, self.path),
            None => f.write_str(&self.path),
        }
    }
}

impl From<&str> for Pattern {
    fn from(pattern: &str) -> Self {
        Pattern::parse(pattern)
    }
}

impl From<String> for Pattern {
    fn from(pattern: String) -> Self {
        Pattern::parse(&pattern)
    }
}

/// Result of matching one (host, path) against a pattern table
pub enum MatchOutcome {
    /// A registered pattern matched directly
    Matched {
        handler: Arc<dyn Handler>,
        /// Packed string form of the winning pattern
        pattern: String,
    },
    /// The request must be redirected before it can match
    Redirect {
        /// Path to redirect to (no query component)
        target: String,
        /// Pattern the target will resolve to once the client follows the
        /// redirect; empty when nothing would match even then
        pattern: String,
    },
    /// Nothing registered here covers the request
    NoMatch,
}

impl MatchOutcome {
    /// Pattern attribution for logging and the cross-method probe; empty
    /// for [`MatchOutcome::NoMatch`].
    pub fn pattern(&self) -> &str {
        match self {
            MatchOutcome::Matched { pattern, .. } | MatchOutcome::Redirect { pattern, .. } => {
                pattern
            }
            MatchOutcome::NoMatch => "",
        }
    }
}

/// One registered binding, keyed by its packed pattern string
struct TableEntry {
    pattern: String,
    handler: Arc<dyn Handler>,
}

/// Per-method pattern table
///
/// Storage mirrors the lookup phases: every registration lives in `entries`
/// keyed by its packed string, and subtree patterns are additionally kept in
/// `subtrees` sorted longest-first so the first prefix hit is the most
/// specific one. `has_hosts` gates the host-qualified phase so tables
/// without host patterns skip building the qualified key.
pub struct PatternTable {
    entries: HashMap<String, TableEntry>,
    subtrees: Vec<TableEntry>,
    has_hosts: bool,
}

impl PatternTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            subtrees: Vec::new(),
            has_hosts: false,
        }
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Packed strings of every registered pattern, in no particular order.
    pub fn patterns(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Store one binding
    ///
    /// Fails with [`RegisterError::DuplicatePattern`] when the packed key is
    /// already taken; existing routes are never overwritten. An empty
    /// pattern is rejected with [`RegisterError::EmptyPattern`].
    pub fn register(
        &mut self,
        pattern: &Pattern,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RegisterError> {
        if pattern.is_empty() {
            return Err(RegisterError::EmptyPattern);
        }
        let packed = pattern.to_string();
        if self.entries.contains_key(&packed) {
            return Err(RegisterError::DuplicatePattern { pattern: packed });
        }
        if pattern.is_subtree() {
            self.insert_subtree(TableEntry {
                pattern: packed.clone(),
                handler: Arc::clone(&handler),
            });
        }
        self.entries.insert(
            packed.clone(),
            TableEntry {
                pattern: packed,
                handler,
            },
        );
        if pattern.host().is_some() {
            self.has_hosts = true;
        }
        Ok(())
    }

    /// Match a request's host and path against this table
    ///
    /// CONNECT requests (`is_connect`) keep their host and path verbatim;
    /// every other request has the port stripped from the host and the path
    /// canonicalized first, with a redirect synthesized when canonicalization
    /// changed anything.
    ///
    /// # Arguments
    ///
    /// * `host` - Request host, may carry a `:port` suffix
    /// * `path` - Request path, possibly non-canonical
    /// * `is_connect` - True for the CONNECT method
    pub fn match_request(&self, host: &str, path: &str, is_connect: bool) -> MatchOutcome {
        let host = if is_connect {
            host
        } else {
            strip_host_port(host)
        };

        if !is_connect {
            let cleaned = clean_path(path);
            if cleaned != path {
                // The eventual pattern is whatever the cleaned path will
                // resolve to, including a further trailing-slash redirect.
                let pattern = self.match_request(host, &cleaned, false).pattern().to_string();
                return MatchOutcome::Redirect {
                    target: cleaned,
                    pattern,
                };
            }
        }

        if self.should_redirect_to_slash(host, path) {
            let target = format!("{}/", path);
            return MatchOutcome::Redirect {
                pattern: target.clone(),
                target,
            };
        }

        if self.has_hosts {
            if let Some(entry) = self.lookup(&format!("{}{}", host, path)) {
                return MatchOutcome::Matched {
                    handler: Arc::clone(&entry.handler),
                    pattern: entry.pattern.clone(),
                };
            }
        }
        match self.lookup(path) {
            Some(entry) => MatchOutcome::Matched {
                handler: Arc::clone(&entry.handler),
                pattern: entry.pattern.clone(),
            },
            None => MatchOutcome::NoMatch,
        }
    }

    // Keep `subtrees` sorted by pattern length, longest first, so prefix
    // scans hit the most specific subtree before any ancestor.
    fn insert_subtree(&mut self, entry: TableEntry) {
        let idx = self
            .subtrees
            .iter()
            .position(|e| e.pattern.len() < entry.pattern.len())
            .unwrap_or(self.subtrees.len());
        self.subtrees.insert(idx, entry);
    }

    // Exact key first, then the longest registered subtree prefix.
    fn lookup(&self, key: &str) -> Option<&TableEntry> {
        if let Some(entry) = self.entries.get(key) {
            return Some(entry);
        }
        self.subtrees
            .iter()
            .find(|e| key.starts_with(e.pattern.as_str()))
    }

    // A path that misses every exact key but sits one '/' short of a
    // registered subtree gets redirected onto the subtree instead.
    fn should_redirect_to_slash(&self, host: &str, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let qualified = format!("{}{}", host, path);
        if self.entries.contains_key(path) || self.entries.contains_key(&qualified) {
            return false;
        }
        if self.entries.contains_key(&format!("{}/", path))
            || self.entries.contains_key(&format!("{}/", qualified))
        {
            return !path.ends_with('/');
        }
        false
    }
}

/// Canonicalize a request path
///
/// Lexical cleaning rooted at `/`: dot segments collapse, `..` pops one
/// element and never escapes the root, duplicate slashes merge, a missing
/// leading `/` is added, and an empty path becomes `/`. A trailing slash the
/// input had is preserved. Idempotent.
pub(crate) fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    let rooted;
    let path: &str = if path.starts_with('/') {
        path
    } else {
        rooted = format!("/{}", path);
        &rooted
    };

    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            _ => stack.push(segment),
        }
    }

    let mut cleaned = String::with_capacity(path.len());
    for segment in &stack {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if cleaned.is_empty() {
        cleaned.push('/');
    }
    // Cleaning drops a trailing slash; restore the one the input had.
    if path.ends_with('/') && cleaned != "/" {
        cleaned.push('/');
    }
    cleaned
}

/// Strip a `:port` suffix from a request host
///
/// Hosts without a colon come back unchanged (the common case). Bracketed
/// IPv6 literals lose their brackets along with the port: `[::1]:8080`
/// becomes `::1`. Anything that does not split cleanly as host:port, such as
/// a bare unbracketed IPv6 address, is returned untouched.
pub(crate) fn strip_host_port(host: &str) -> &str {
    let Some(colon) = host.rfind(':') else {
        return host;
    };
    let port = &host[colon + 1..];
    if port.contains('[') || port.contains(']') {
        return host;
    }
    if host.starts_with('[') {
        // Bracketed literal: the ']' must sit directly before the last ':'.
        match host.find(']') {
            Some(end) if end + 1 == colon => {
                let inner = &host[1..end];
                if inner.contains('[') {
                    host
                } else {
                    inner
                }
            }
            _ => host,
        }
    } else {
        let bare = &host[..colon];
        if bare.contains(':') || bare.contains('[') || bare.contains(']') {
            host
        } else {
            bare
        }
    }
}

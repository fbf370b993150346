use std::io;

use http::Method;
use may_minihttp::Request;
use tracing::debug;

use crate::handler::RouteRequest;

/// Split a request target into its path and query parts at the first `?`.
///
/// The query comes back without the `?`; `None` when the target has no
/// query at all (an empty query after a bare `?` is `Some("")`).
pub(crate) fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.find('?') {
        Some(pos) => (&target[..pos], Some(&target[pos + 1..])),
        None => (target, None),
    }
}

/// Build a [`RouteRequest`] from a raw transport request
///
/// Extracts the method, the Host header (kept verbatim, port included), the
/// path/query split of the request target, and the protocol version. The
/// request body is left untouched; routing never reads it.
///
/// # Errors
///
/// Fails with `InvalidData` when the method token is not a valid HTTP
/// method token. Matching itself is byte-exact, so `get` and `GET` are
/// different methods, but both are parseable.
pub fn parse_request(req: Request) -> io::Result<RouteRequest> {
    let method = Method::from_bytes(req.method().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let raw_target = req.path().to_string();
    let (path, query) = split_target(&raw_target);

    let host = req
        .headers()
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case("host"))
        .map(|h| String::from_utf8_lossy(h.value).to_string())
        .unwrap_or_default();

    // may_minihttp only speaks HTTP/1.x; version() is the minor version.
    let proto_minor = req.version();

    debug!(
        method = %method,
        host = %host,
        target = %raw_target,
        proto_minor = proto_minor,
        "HTTP request parsed"
    );

    Ok(RouteRequest {
        method,
        host,
        path: path.to_string(),
        raw_query: query.map(str::to_string),
        raw_target,
        proto_major: 1,
        proto_minor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("/p?x=1&y=2"), ("/p", Some("x=1&y=2")));
        assert_eq!(split_target("/p"), ("/p", None));
        assert_eq!(split_target("/p?"), ("/p", Some("")));
        assert_eq!(split_target("*"), ("*", None));
        // Only the first '?' delimits; later ones belong to the query.
        assert_eq!(split_target("/p?a=?b"), ("/p", Some("a=?b")));
    }
}

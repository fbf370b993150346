use std::sync::Arc;

use http::Method;
use methodmux::handler::{Handler, HandlerFn, ResponseSink, RouteRequest};
use methodmux::router::{RegisterError, Router};

#[derive(Default)]
struct TestSink {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl TestSink {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl ResponseSink for TestSink {
    fn set_status(&mut self, code: u16) {
        self.status = code;
    }
    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }
    fn write_body(&mut self, body: &[u8]) {
        self.body.extend_from_slice(body);
    }
}

fn status_handler(code: u16) -> Arc<dyn Handler> {
    Arc::new(HandlerFn(
        move |_req: &RouteRequest, res: &mut dyn ResponseSink| {
            res.set_status(code);
        },
    ))
}

/// Fixture covering every pattern kind: generic exact, generic subtree,
/// host-qualified exact, host-qualified subtree, a GET-only route and a
/// small CONNECT table. The status code identifies which pattern served.
fn demo_router() -> Router {
    let router = Router::new();
    for method in [Method::GET, Method::POST, Method::PATCH] {
        router
            .register(method.clone(), "/dir/", status_handler(200))
            .unwrap();
        router
            .register(method.clone(), "/search", status_handler(201))
            .unwrap();
        router
            .register(method.clone(), "sub.example.com/search", status_handler(202))
            .unwrap();
        router
            .register(method.clone(), "sub.example.com/", status_handler(203))
            .unwrap();
    }
    router
        .register(Method::GET, "/get-only", status_handler(418))
        .unwrap();
    router
        .register(Method::CONNECT, "/dir/", status_handler(200))
        .unwrap();
    router
        .register(Method::CONNECT, "/search", status_handler(201))
        .unwrap();
    router
}

fn serve_once(router: &Router, req: &RouteRequest) -> (methodmux::RouteResolution, TestSink) {
    let resolution = router.resolve(req);
    let mut sink = TestSink::default();
    resolution.handler.serve(req, &mut sink);
    (resolution, sink)
}

fn assert_resolution(
    router: &Router,
    method: Method,
    host: &str,
    path: &str,
    want_status: u16,
    want_pattern: &str,
) {
    let req = RouteRequest::new(method.clone(), host, path);
    let (resolution, sink) = serve_once(router, &req);
    println!(
        "✅ {} {}{} → {} '{}'",
        method, host, path, sink.status, resolution.pattern
    );
    assert_eq!(
        sink.status, want_status,
        "status mismatch for {} {}{}",
        method, host, path
    );
    assert_eq!(
        resolution.pattern, want_pattern,
        "pattern mismatch for {} {}{}",
        method, host, path
    );
}

#[test]
fn test_exact_pattern_match() {
    let router = demo_router();
    assert_resolution(&router, Method::GET, "example.com", "/search", 201, "/search");
}

#[test]
fn test_subtree_pattern_match() {
    let router = demo_router();
    assert_resolution(&router, Method::GET, "example.com", "/dir/", 200, "/dir/");
    assert_resolution(
        &router,
        Method::GET,
        "example.com",
        "/dir/file",
        200,
        "/dir/",
    );
}

#[test]
fn test_unregistered_root_is_not_found() {
    let router = demo_router();
    assert_resolution(&router, Method::GET, "example.com", "/", 404, "");
}

#[test]
fn test_trailing_slash_redirect() {
    let router = demo_router();
    let req = RouteRequest::new(Method::GET, "example.com", "/dir");
    let (resolution, sink) = serve_once(&router, &req);
    assert_eq!(sink.status, 301);
    assert_eq!(resolution.pattern, "/dir/");
    assert_eq!(sink.header("Location"), Some("/dir/"));
}

#[test]
fn test_trailing_slash_redirect_applies_to_connect() {
    let router = demo_router();
    assert_resolution(&router, Method::CONNECT, "example.com", "/dir", 301, "/dir/");
}

#[test]
fn test_host_pattern_beats_generic() {
    let router = demo_router();
    assert_resolution(
        &router,
        Method::GET,
        "sub.example.com",
        "/search",
        202,
        "sub.example.com/search",
    );
}

#[test]
fn test_host_subtree_catches_unmatched_paths() {
    let router = demo_router();
    assert_resolution(
        &router,
        Method::GET,
        "sub.example.com",
        "/search/",
        203,
        "sub.example.com/",
    );
    assert_resolution(
        &router,
        Method::GET,
        "sub.example.com",
        "/search/foo",
        203,
        "sub.example.com/",
    );
    assert_resolution(
        &router,
        Method::GET,
        "sub.example.com",
        "/",
        203,
        "sub.example.com/",
    );
}

#[test]
fn test_host_port_is_stripped_before_matching() {
    let router = demo_router();
    assert_resolution(
        &router,
        Method::GET,
        "sub.example.com:443",
        "/",
        203,
        "sub.example.com/",
    );
}

#[test]
fn test_unknown_host_falls_back_to_generic() {
    let router = demo_router();
    assert_resolution(
        &router,
        Method::GET,
        "images.example.com",
        "/search",
        201,
        "/search",
    );
}

#[test]
fn test_subtree_of_exact_pattern_is_not_found() {
    let router = demo_router();
    // "/search" is exact only; "/search/" and below match nothing.
    assert_resolution(&router, Method::GET, "example.com", "/search/", 404, "");
    assert_resolution(&router, Method::GET, "example.com", "/search/foo", 404, "");
}

#[test]
fn test_dot_dot_redirects_to_clean_path() {
    let router = demo_router();
    let req = RouteRequest::new(Method::GET, "example.com", "/../search");
    let (resolution, sink) = serve_once(&router, &req);
    assert_eq!(sink.status, 301);
    assert_eq!(sink.header("Location"), Some("/search"));
    assert_eq!(resolution.pattern, "/search");
}

#[test]
fn test_clean_path_redirect_reports_subtree_pattern() {
    let router = demo_router();
    let req = RouteRequest::new(Method::GET, "example.com", "/dir/./file");
    let (resolution, sink) = serve_once(&router, &req);
    assert_eq!(sink.status, 301);
    assert_eq!(sink.header("Location"), Some("/dir/file"));
    assert_eq!(resolution.pattern, "/dir/");
}

#[test]
fn test_unresolvable_clean_redirect_is_not_found() {
    let router = demo_router();
    // "/dir/.." cleans to "/", which matches nothing, so no redirect is
    // issued at all.
    assert_resolution(&router, Method::GET, "example.com", "/dir/..", 404, "");
}

#[test]
fn test_wrong_method_is_method_not_allowed() {
    let router = demo_router();
    assert_resolution(&router, Method::POST, "example.com", "/get-only", 405, "");
    assert_resolution(&router, Method::DELETE, "example.com", "/search", 405, "");
}

#[test]
fn test_registered_method_still_serves() {
    let router = demo_router();
    assert_resolution(&router, Method::GET, "example.com", "/get-only", 418, "/get-only");
    assert_resolution(&router, Method::POST, "example.com", "/search", 201, "/search");
}

#[test]
fn test_method_not_allowed_body() {
    let router = demo_router();
    let req = RouteRequest::new(Method::PUT, "example.com", "/search");
    let (resolution, sink) = serve_once(&router, &req);
    assert_eq!(sink.status, 405);
    assert_eq!(resolution.pattern, "");
    assert_eq!(sink.body, b"405 method not allowed\n");
    assert_eq!(sink.header("X-Content-Type-Options"), Some("nosniff"));
}

#[test]
fn test_not_found_body() {
    let router = demo_router();
    let req = RouteRequest::new(Method::GET, "example.com", "/missing");
    let (_, sink) = serve_once(&router, &req);
    assert_eq!(sink.status, 404);
    assert_eq!(sink.body, b"404 page not found\n");
}

#[test]
fn test_connect_skips_path_cleaning() {
    let router = demo_router();
    // CONNECT matches the path verbatim: "/../search" hits nothing, while
    // "/dir/.." is a literal prefix match under "/dir/".
    assert_resolution(&router, Method::CONNECT, "example.com", "/../search", 404, "");
    assert_resolution(&router, Method::CONNECT, "example.com", "/dir/..", 200, "/dir/");
}

#[test]
fn test_redirect_preserves_query_string() {
    let router = demo_router();
    let mut req = RouteRequest::new(Method::GET, "example.com", "/dir");
    req.raw_query = Some("a=1&b=2".to_string());
    let (_, sink) = serve_once(&router, &req);
    assert_eq!(sink.status, 301);
    assert_eq!(sink.header("Location"), Some("/dir/?a=1&b=2"));
}

#[test]
fn test_duplicate_pattern_rejected() {
    let router = demo_router();
    let err = router
        .register(Method::GET, "/search", status_handler(200))
        .unwrap_err();
    assert!(matches!(err, RegisterError::DuplicatePattern { .. }));
    assert_eq!(
        err.to_string(),
        "multiple registrations for pattern '/search'"
    );

    // The same pattern under an unused method is fine.
    router
        .register(Method::OPTIONS, "/search", status_handler(200))
        .unwrap();
}

#[test]
fn test_empty_pattern_rejected() {
    let router = Router::new();
    let err = router
        .register(Method::GET, "", status_handler(200))
        .unwrap_err();
    assert_eq!(err, RegisterError::EmptyPattern);
}

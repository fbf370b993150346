use std::collections::HashSet;
use std::sync::{Mutex, OnceLock, PoisonError};

use may_minihttp::Response;
use serde_json::Value;

use crate::handler::ResponseSink;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Response assembled by a handler before it is written to the wire
///
/// Implements [`ResponseSink`], so the dispatcher and handlers can fill it
/// in without knowing anything about the transport. A status of 0 (handler
/// wrote a body but never set a code) is sent as 200.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ResponseSink for ResponseBuffer {
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

// may_minihttp wants 'static header lines. Interning leaks each distinct
// line once instead of once per response; the fixed 404/405 headers stop
// leaking entirely, and repeated redirect targets are deduplicated.
fn intern_header_line(line: String) -> &'static str {
    static INTERNED: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();
    let mut set = INTERNED
        .get_or_init(|| Mutex::new(HashSet::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    match set.get(line.as_str()) {
        Some(existing) => *existing,
        None => {
            let leaked: &'static str = Box::leak(line.into_boxed_str());
            set.insert(leaked);
            leaked
        }
    }
}

/// Flush an assembled [`ResponseBuffer`] out to the transport response.
pub fn write_response(res: &mut Response, buf: ResponseBuffer) {
    let status = if buf.status == 0 { 200 } else { buf.status };
    res.status_code(status as usize, status_reason(status));
    for (name, value) in buf.headers {
        res.header(intern_header_line(format!("{}: {}", name, value)));
    }
    res.body_vec(buf.body);
}

/// Write a JSON error body directly, bypassing the routing layer.
pub fn write_json_error(res: &mut Response, status: u16, body: Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}

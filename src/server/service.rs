use std::io;
use std::sync::Arc;

use may_minihttp::{HttpService, Request, Response};
use tracing::warn;

use super::request::parse_request;
use super::response::{write_json_error, write_response, ResponseBuffer};
use crate::dispatcher::Dispatcher;

#[derive(Clone)]
pub struct AppService {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let route_req = match parse_request(req) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "Rejecting unparseable request");
                write_json_error(res, 400, serde_json::json!({ "error": "Bad Request" }));
                return Ok(());
            }
        };

        let mut buf = ResponseBuffer::default();
        self.dispatcher.dispatch(&route_req, &mut buf);
        write_response(res, buf);
        Ok(())
    }
}

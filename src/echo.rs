use std::collections::HashMap;

use serde::Serialize;

use crate::handler::{Handler, ResponseSink, RouteRequest};

/// JSON body written by [`EchoHandler`].
#[derive(Debug, Serialize)]
pub struct EchoBody {
    pub method: String,
    pub host: String,
    pub path: String,
    pub query: HashMap<String, String>,
}

/// Example handler: echoes the routed request back as JSON.
///
/// Useful for demos and integration tests where the response must reveal
/// which request actually reached the handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl Handler for EchoHandler {
    fn serve(&self, req: &RouteRequest, res: &mut dyn ResponseSink) {
        let body = EchoBody {
            method: req.method.to_string(),
            host: req.host.clone(),
            path: req.path.clone(),
            query: req.query_params(),
        };
        let bytes = serde_json::to_vec(&body).unwrap_or_else(|_| b"{}".to_vec());

        res.set_status(200);
        res.set_header("Content-Type", "application/json");
        res.write_body(&bytes);
    }
}

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use http::Method;
use tracing::info;
use tracing_subscriber::EnvFilter;

use methodmux::dispatcher::Dispatcher;
use methodmux::echo::EchoHandler;
use methodmux::router::Router;
use methodmux::runtime_config::RuntimeConfig;
use methodmux::server::{AppService, HttpServer};

#[derive(Parser)]
#[command(name = "methodmux")]
#[command(about = "Method-aware HTTP echo service", long_about = None)]
struct Cli {
    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// Print the routing table at startup and enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = RuntimeConfig::from_env();
    may::config().set_stack_size(config.stack_size);

    let router = Router::new();
    register_demo_routes(&router)?;
    if cli.verbose {
        router.dump_routes();
    }

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(router)));
    let service = AppService::new(dispatcher);

    info!(
        addr = %cli.addr,
        stack_size = config.stack_size,
        "methodmux listening"
    );
    let handle = HttpServer(service)
        .start(&cli.addr)
        .with_context(|| format!("failed to bind {}", cli.addr))?;

    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server failed: {:?}", e))?;
    Ok(())
}

/// A small route set that exercises every resolution outcome: 200 on a
/// match, 301 on `/dir`, 405 on a wrong verb, 404 on everything else.
fn register_demo_routes(router: &Router) -> anyhow::Result<()> {
    router.register(Method::GET, "/search", Arc::new(EchoHandler))?;
    router.register(Method::GET, "/dir/", Arc::new(EchoHandler))?;
    router.register(Method::POST, "/items", Arc::new(EchoHandler))?;
    router.register_fn(Method::GET, "/health", |_req, res| {
        res.set_status(200);
        res.set_header("Content-Type", "application/json");
        res.write_body(b"{\"status\":\"ok\"}");
    })?;
    Ok(())
}

use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use tcphttp::config::Config;
use tcphttp::http::connection::handler_fn;
use tcphttp::http::request::Request;
use tcphttp::http::response::{HandlerError, StatusCode};
use tcphttp::server::{Server, Unbounded};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let server = Server::bind(
        cfg.server.listen_addr(),
        handler_fn(demo_handler),
        Arc::new(Unbounded),
    )
    .await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.close();
    server.wait().await?;
    tracing::info!("Server gracefully stopped");

    Ok(())
}

fn demo_handler(body: &mut BytesMut, req: &Request) -> Result<(), HandlerError> {
    match req.target() {
        "/yourproblem" => Err(HandlerError::new(
            StatusCode::BadRequest,
            "Your problem is not my problem\n",
        )),
        "/myproblem" => Err(HandlerError::new(
            StatusCode::InternalServerError,
            "Woopsie, my bad\n",
        )),
        _ => {
            body.put_slice(b"All good, frfr\n");
            Ok(())
        }
    }
}

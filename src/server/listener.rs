use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::http::connection::{Connection, Handler};
use crate::server::spawner::{Spawner, Unbounded};

/// Handle to a running server.
///
/// Connections already accepted keep running after [`Server::close`]; only
/// the listener goes away. Dropping the handle closes the server.
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_loop: Option<JoinHandle<()>>,
}

impl Server {
    /// Listens on `localhost:<port>`, one unbounded task per connection.
    pub async fn serve(port: u16, handler: Handler) -> anyhow::Result<Self> {
        Self::bind(("127.0.0.1", port), handler, Arc::new(Unbounded)).await
    }

    /// Binds `addr` and starts accepting in the background.
    pub async fn bind<A>(addr: A, handler: Handler, spawner: Arc<dyn Spawner>) -> anyhow::Result<Self>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr)
            .await
            .context("failed to bind listener")?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());

        let accept_loop = tokio::spawn(accept_loop(
            listener,
            handler,
            spawner,
            Arc::clone(&closed),
            Arc::clone(&shutdown),
        ));

        Ok(Self {
            local_addr,
            closed,
            shutdown,
            accept_loop: Some(accept_loop),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stops accepting. Safe to call more than once.
    ///
    /// This only signals the accept loop; the listener is dropped once that
    /// loop wakes up. Await [`Server::wait`] before rebinding the same address.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.shutdown.notify_one();
        }
    }

    /// Waits until the accept loop has exited after [`Server::close`]. When
    /// this returns the listener is closed and its address can be bound again.
    pub async fn wait(mut self) -> anyhow::Result<()> {
        if let Some(handle) = self.accept_loop.take() {
            handle.await.context("accept loop panicked")?;
        }
        Ok(())
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.close();
    }
}

async fn accept_loop(
    listener: TcpListener,
    handler: Handler,
    spawner: Arc<dyn Spawner>,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
) {
    loop {
        let admission = tokio::select! {
            admission = spawner.admit() => admission,
            _ = shutdown.notified() => break,
        };

        let accepted = tokio::select! {
            res = listener.accept() => res,
            _ = shutdown.notified() => break,
        };

        match accepted {
            Ok((socket, peer)) => {
                info!("Accepted connection from {}", peer);
                let handler = Arc::clone(&handler);
                spawner.spawn(Box::pin(async move {
                    let _admission = admission;
                    let conn = Connection::new(socket, peer, handler);
                    if let Err(e) = conn.run().await {
                        error!(peer = %peer, error = %e, "Connection error");
                    }
                }));
            }
            Err(e) => {
                if closed.load(Ordering::Acquire) {
                    break;
                }
                error!(error = %e, "Error accepting connection");
            }
        }
    }

    // listener is dropped, and so closed, on return
    debug!("Accept loop stopped");
}

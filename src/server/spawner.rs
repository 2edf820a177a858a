use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub type ConnectionTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Room for one more connection. Held by the connection task and given back
/// when that task finishes.
#[derive(Debug, Default)]
pub struct Admission {
    _permit: Option<OwnedSemaphorePermit>,
}

/// Decides how many connections may be open and how they get run.
///
/// The accept loop awaits [`Spawner::admit`] before each `accept()`, so a
/// spawner that withholds admission leaves pending connections in the
/// kernel backlog instead of holding their sockets open.
pub trait Spawner: Send + Sync + 'static {
    fn admit(&self) -> Pin<Box<dyn Future<Output = Admission> + Send + '_>> {
        Box::pin(std::future::ready(Admission::default()))
    }

    fn spawn(&self, task: ConnectionTask) {
        tokio::spawn(task);
    }
}

/// One tokio task per connection with no limit. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Spawner for Unbounded {}

/// At most `max` connections accepted at once. Further clients wait in the
/// listen backlog until a running connection finishes.
#[derive(Debug, Clone)]
pub struct Bounded {
    permits: Arc<Semaphore>,
}

impl Bounded {
    pub fn new(max: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max.max(1))),
        }
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Spawner for Bounded {
    fn admit(&self) -> Pin<Box<dyn Future<Output = Admission> + Send + '_>> {
        Box::pin(async move {
            Admission {
                // never closed, so acquiring only fails if that changes
                _permit: Arc::clone(&self.permits).acquire_owned().await.ok(),
            }
        })
    }
}

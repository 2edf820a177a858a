//! TCP accept loop and connection task spawning.

pub mod listener;
pub mod spawner;

pub use listener::Server;
pub use spawner::{Admission, Bounded, Spawner, Unbounded};

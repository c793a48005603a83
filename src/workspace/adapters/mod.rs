//! Adapter implementations of the workspace ports.

mod fallback;
mod local;

pub use fallback::FallbackGateway;
pub use local::LocalGenerator;

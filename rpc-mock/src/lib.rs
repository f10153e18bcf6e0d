/// RPC Mock Node Library
///
/// This crate provides both a standalone binary and library components
/// for serving a scripted, in-memory EVM JSON-RPC node.

pub mod handlers;
pub mod node;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use node::{MockNode, SharedNode};
pub use server::{create_router, run_server, spawn_local};
pub use types::*;

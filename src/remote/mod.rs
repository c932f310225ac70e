//! Remote Module
//!
//! A cache driver that delegates to a remote key-value server.
//!
//! ## Architecture
//! - `RemoteDriver` maps the driver contract onto native server commands
//! - `RemoteClient` is the command surface the driver needs
//! - `RespClient` speaks RESP2 over TCP; `MemoryClient` runs in-process
//!
//! TTLs are converted to whole seconds (floor of `ttl_ms / 1000`) before
//! reaching the server.

mod client;
mod connection;
mod driver;
mod memory;

pub use client::RemoteClient;
pub use connection::RespClient;
pub use driver::RemoteDriver;
pub use memory::MemoryClient;

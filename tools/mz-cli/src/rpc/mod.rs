//! Neo N3 JSON-RPC adapter implementing `RemoteSource`.

mod client;
mod types;

pub use client::{NativeContract, NeoRpcClient};

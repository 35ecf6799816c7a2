//! # Ports Layer
//!
//! - `inbound.rs` - Driving port (`ChainReader`) used by the fetch pool and
//!   the scanners
//! - `outbound.rs` - Driven ports (remote chain, key-value store, record
//!   serializer)

pub mod inbound;
pub mod outbound;

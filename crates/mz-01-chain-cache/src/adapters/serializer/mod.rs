//! Serializer Adapters
//!
//! Implementations of the `RecordSerializer` trait.

mod standard;

pub use self::standard::StandardRecordSerializer;

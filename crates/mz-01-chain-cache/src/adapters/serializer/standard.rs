use shared_types::{ApplicationLog, BlockRecord};

use crate::domain::errors::SerializationError;
use crate::ports::outbound::RecordSerializer;

/// Blocks as bincode, logs as JSON.
///
/// Block records are flat and fixed in shape, so the compact binary form is
/// used. Log payloads are recursive tagged stack items, which need a
/// self-describing format.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRecordSerializer;

fn err(e: impl ToString) -> SerializationError {
    SerializationError {
        message: e.to_string(),
    }
}

impl RecordSerializer for StandardRecordSerializer {
    fn encode_block(&self, block: &BlockRecord) -> Result<Vec<u8>, SerializationError> {
        bincode::serialize(block).map_err(err)
    }

    fn decode_block(&self, data: &[u8]) -> Result<BlockRecord, SerializationError> {
        bincode::deserialize(data).map_err(err)
    }

    fn encode_log(&self, log: &ApplicationLog) -> Result<Vec<u8>, SerializationError> {
        serde_json::to_vec(log).map_err(err)
    }

    fn decode_log(&self, data: &[u8]) -> Result<ApplicationLog, SerializationError> {
        serde_json::from_slice(data).map_err(err)
    }
}

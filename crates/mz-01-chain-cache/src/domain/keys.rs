//! # Keys and Integrity Envelope
//!
//! Two buckets per namespace:
//!
//! | Bucket | Key | Value |
//! |--------|-----|-------|
//! | `blocks` | block index, 4 bytes big-endian | sealed encoded `BlockRecord` |
//! | `logs` | raw 32-byte hash | sealed encoded `ApplicationLog` |
//!
//! Every value is sealed as `[crc32 LE][payload]` and checked on read.

use shared_types::{BlockIndex, Hash256};

/// Independent key spaces inside one namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Blocks,
    Logs,
}

impl Bucket {
    pub const ALL: [Bucket; 2] = [Bucket::Blocks, Bucket::Logs];

    /// Name used for column families and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Bucket::Blocks => "blocks",
            Bucket::Logs => "logs",
        }
    }

    /// Stable one-byte tag used by the file store's record log.
    pub fn tag(&self) -> u8 {
        match self {
            Bucket::Blocks => 1,
            Bucket::Logs => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Bucket> {
        match tag {
            1 => Some(Bucket::Blocks),
            2 => Some(Bucket::Logs),
            _ => None,
        }
    }
}

/// Fixed-width key: lexicographic order equals index order.
pub fn block_key(index: BlockIndex) -> [u8; 4] {
    index.to_be_bytes()
}

pub fn log_key(hash: &Hash256) -> [u8; 32] {
    hash.0
}

const CHECKSUM_LEN: usize = 4;

/// Prefix `payload` with its CRC32.
pub fn seal(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(CHECKSUM_LEN + payload.len());
    out.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Strip and verify the checksum prefix.
pub fn unseal(stored: &[u8]) -> Result<&[u8], String> {
    if stored.len() < CHECKSUM_LEN {
        return Err(format!("entry too short ({} bytes)", stored.len()));
    }
    let (prefix, payload) = stored.split_at(CHECKSUM_LEN);
    let expected = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
    let actual = crc32fast::hash(payload);
    if expected != actual {
        return Err(format!(
            "checksum mismatch: expected {:08x}, got {:08x}",
            expected, actual
        ));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_keys_sort_by_index() {
        let mut keys = vec![block_key(256), block_key(1), block_key(65_536), block_key(255)];
        keys.sort();
        assert_eq!(
            keys,
            vec![block_key(1), block_key(255), block_key(256), block_key(65_536)]
        );
    }

    #[test]
    fn test_seal_and_unseal() {
        let sealed = seal(b"payload");
        assert_eq!(unseal(&sealed).unwrap(), b"payload");
    }

    #[test]
    fn test_unseal_detects_damage() {
        let mut sealed = seal(b"payload");
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(unseal(&sealed).unwrap_err().contains("checksum mismatch"));
        assert!(unseal(b"ab").unwrap_err().contains("too short"));
    }

    #[test]
    fn test_bucket_tags() {
        for bucket in Bucket::ALL {
            assert_eq!(Bucket::from_tag(bucket.tag()), Some(bucket));
        }
        assert_eq!(Bucket::from_tag(0), None);
    }
}

//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `Hash256`, `ScriptHash`, `NetworkId`
//! - **Chain**: `BlockRecord`, `ApplicationLog`, `Execution`, `NotificationEvent`
//! - **Prefetch**: `FetchTask`

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ParseHashError;
use crate::range::BlockRange;
use crate::stack_item::StackItem;

/// Dense position of a block in the chain.
pub type BlockIndex = u32;

/// Milliseconds since the Unix epoch, as block headers carry them.
pub type TimestampMs = u64;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte block or transaction hash.
///
/// Bytes are kept in display order: `0x` followed by the bytes as hex is the
/// form the node reports and accepts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256(pub [u8; 32]);

/// A 20-byte contract script hash. Notifications are emitted by one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ScriptHash(pub [u8; 20]);

/// Network magic of a remote chain.
///
/// All persisted state is namespaced by this value so that one storage root
/// can serve several chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetworkId(pub u32);

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn decode_fixed<const N: usize>(input: &str) -> Result<[u8; N], ParseHashError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if digits.len() != N * 2 {
        return Err(ParseHashError::Length {
            expected: N * 2,
            actual: digits.len(),
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|e| ParseHashError::Hex(e.to_string()))?;
    Ok(out)
}

impl Hash256 {
    /// Raw bytes, usable as a store key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self)
    }
}

impl FromStr for Hash256 {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<32>(s).map(Hash256)
    }
}

impl ScriptHash {
    /// Parse the little-endian form (no prefix) that explorers and wallets
    /// print for contract hashes.
    pub fn from_le_str(s: &str) -> Result<Self, ParseHashError> {
        let mut bytes = decode_fixed::<20>(s)?;
        bytes.reverse();
        Ok(ScriptHash(bytes))
    }

    /// Parse either notation: `0x`-prefixed big-endian or bare little-endian.
    pub fn parse_any(s: &str) -> Result<Self, ParseHashError> {
        if s.starts_with("0x") || s.starts_with("0X") {
            s.parse()
        } else {
            Self::from_le_str(s)
        }
    }
}

impl fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptHash({})", self)
    }
}

impl FromStr for ScriptHash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<20>(s).map(ScriptHash)
    }
}

macro_rules! string_or_bytes_serde {
    ($ty:ident, $len:expr) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.collect_str(self)
                } else {
                    self.0.serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(de::Error::custom)
                } else {
                    <[u8; $len]>::deserialize(deserializer).map($ty)
                }
            }
        }
    };
}

string_or_bytes_serde!(Hash256, 32);
string_or_bytes_serde!(ScriptHash, 20);

// =============================================================================
// CLUSTER B: CHAIN RECORDS
// =============================================================================

/// A finalized block, reduced to what the scanners need.
///
/// Identity is `index`. Once persisted a record is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Position in the chain.
    pub index: BlockIndex,
    /// Block hash. Its application log is keyed by this hash.
    pub hash: Hash256,
    /// Header timestamp in milliseconds.
    pub timestamp_ms: TimestampMs,
    /// Transaction hashes in block order.
    pub transactions: Vec<Hash256>,
}

impl BlockRecord {
    /// Hashes of every application log that belongs to this block: the
    /// block's own log first, then each transaction in block order.
    pub fn log_subjects(&self) -> impl Iterator<Item = Hash256> + '_ {
        std::iter::once(self.hash).chain(self.transactions.iter().copied())
    }
}

/// A notification emitted by a contract during execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Contract that emitted the event.
    pub emitter: ScriptHash,
    /// Event name, compared case-sensitively.
    pub name: String,
    /// Structured payload.
    pub payload: StackItem,
}

/// One execution inside an application log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    /// Trigger type reported by the node (`OnPersist`, `Application`, ...).
    pub trigger: String,
    /// Final VM state (`HALT`, `FAULT`).
    pub vm_state: String,
    /// Notifications in emission order.
    pub notifications: Vec<NotificationEvent>,
}

/// Execution outcome of a block or of a single transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationLog {
    /// Block hash or transaction hash this log belongs to.
    pub subject: Hash256,
    /// Executions in order.
    pub executions: Vec<Execution>,
}

impl ApplicationLog {
    /// All notifications across executions, in execution order.
    pub fn notifications(&self) -> impl Iterator<Item = &NotificationEvent> {
        self.executions.iter().flat_map(|e| e.notifications.iter())
    }
}

// =============================================================================
// CLUSTER C: PREFETCH
// =============================================================================

/// A unit of prefetch work. Each task is claimed by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchTask {
    /// Warm one block.
    Block(BlockIndex),
    /// Warm one block, its own log and every transaction log it lists.
    BlockWithLogs(BlockIndex),
    /// Warm one application log.
    Log(Hash256),
}

impl FetchTask {
    /// One task per block of `range`, in index order.
    pub fn for_range(range: BlockRange, with_logs: bool) -> Vec<FetchTask> {
        range
            .iter()
            .map(|i| {
                if with_logs {
                    FetchTask::BlockWithLogs(i)
                } else {
                    FetchTask::Block(i)
                }
            })
            .collect()
    }
}

impl fmt::Display for FetchTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchTask::Block(i) => write!(f, "block {}", i),
            FetchTask::BlockWithLogs(i) => write!(f, "block {} with logs", i),
            FetchTask::Log(h) => write!(f, "log {}", h),
        }
    }
}

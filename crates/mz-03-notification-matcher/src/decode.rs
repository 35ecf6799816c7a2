//! # Payload Decoding
//!
//! Turns a matched event into a closed variant once, so the output layer
//! never inspects raw stack items.
//!
//! | Name | Payload | Decoded |
//! |------|---------|---------|
//! | `Transfer` | `[from, to, amount]` | sender/receiver (null allowed), amount |
//! | `NewEpoch` | `[epoch]` | epoch number |
//! | `AddPeer` | `[node info protobuf]` | public key, addresses |
//! | `UpdateState` | `[state, public key]` | online/offline/unknown, public key |

use std::fmt;

use prost::Message;
use shared_types::{NotificationEvent, StackItem};

const NEP17_INCOMPATIBLE: &str = "not NEP-17 compatible";
const NEOFS_INCOMPATIBLE: &str = "not NeoFS compatible";

/// Netmap node descriptor carried by `AddPeer`. Only the fields printed are
/// declared; prost skips the rest.
#[derive(Clone, PartialEq, Message)]
pub struct NodeInfo {
    #[prost(bytes = "vec", tag = "1")]
    pub public_key: Vec<u8>,
    #[prost(string, repeated, tag = "2")]
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Online,
    Offline,
    Unknown(i128),
}

impl From<i128> for PeerState {
    fn from(value: i128) -> Self {
        match value {
            1 => PeerState::Online,
            2 => PeerState::Offline,
            other => PeerState::Unknown(other),
        }
    }
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerState::Online => write!(f, "online"),
            PeerState::Offline => write!(f, "offline"),
            PeerState::Unknown(v) => write!(f, "{}(unknown)", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedNotification {
    /// NEP-17 transfer. Account bytes are kept as stored (little-endian).
    Transfer {
        from: Option<Vec<u8>>,
        to: Option<Vec<u8>>,
        amount: i128,
    },
    NewEpoch {
        epoch: i128,
    },
    AddPeer {
        public_key: Vec<u8>,
        addresses: Vec<String>,
    },
    UpdateState {
        state: PeerState,
        public_key: Vec<u8>,
    },
    /// Unrecognized name, or a recognized one with a payload of the wrong
    /// shape (`reason` then says which standard it breaks).
    Generic {
        reason: Option<&'static str>,
    },
}

impl DecodedNotification {
    pub fn decode(event: &NotificationEvent) -> Self {
        let decoded = match event.name.as_str() {
            "Transfer" => decode_transfer(&event.payload).ok_or(NEP17_INCOMPATIBLE),
            "NewEpoch" => decode_new_epoch(&event.payload).ok_or(NEOFS_INCOMPATIBLE),
            "AddPeer" => decode_add_peer(&event.payload).ok_or(NEOFS_INCOMPATIBLE),
            "UpdateState" => decode_update_state(&event.payload).ok_or(NEOFS_INCOMPATIBLE),
            _ => return DecodedNotification::Generic { reason: None },
        };
        decoded.unwrap_or_else(|reason| DecodedNotification::Generic {
            reason: Some(reason),
        })
    }

    /// Text after the common `block:.. at:.. name:..` prefix, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            DecodedNotification::Transfer { from, to, amount } => Some(format!(
                "from:{} to:{} amount:{}",
                account(from.as_deref()),
                account(to.as_deref()),
                amount
            )),
            DecodedNotification::NewEpoch { epoch } => Some(format!("epoch:{}", epoch)),
            DecodedNotification::AddPeer {
                public_key,
                addresses,
            } => Some(format!(
                "pubkey:[..{}] endpoints:[{}]",
                key_suffix(public_key),
                addresses.join(", ")
            )),
            DecodedNotification::UpdateState { state, public_key } => Some(format!(
                "pubkey:[..{}] state:{}",
                key_suffix(public_key),
                state
            )),
            DecodedNotification::Generic { reason } => reason.map(|r| format!("[{}]", r)),
        }
    }
}

fn decode_transfer(payload: &StackItem) -> Option<DecodedNotification> {
    let [from, to, amount] = payload.as_array()? else {
        return None;
    };
    Some(DecodedNotification::Transfer {
        from: from.as_bytes().map(<[u8]>::to_vec),
        to: to.as_bytes().map(<[u8]>::to_vec),
        amount: amount.as_integer()?,
    })
}

fn decode_new_epoch(payload: &StackItem) -> Option<DecodedNotification> {
    let [epoch] = payload.as_array()? else {
        return None;
    };
    Some(DecodedNotification::NewEpoch {
        epoch: epoch.as_integer()?,
    })
}

fn decode_add_peer(payload: &StackItem) -> Option<DecodedNotification> {
    let [info] = payload.as_array()? else {
        return None;
    };
    let info = NodeInfo::decode(info.as_bytes()?).ok()?;
    Some(DecodedNotification::AddPeer {
        public_key: info.public_key,
        addresses: info.addresses,
    })
}

fn decode_update_state(payload: &StackItem) -> Option<DecodedNotification> {
    let [state, public_key] = payload.as_array()? else {
        return None;
    };
    Some(DecodedNotification::UpdateState {
        state: PeerState::from(state.as_integer()?),
        public_key: public_key.as_bytes()?.to_vec(),
    })
}

/// Account as a big-endian script hash, or `nil` for mint/burn.
fn account(bytes: Option<&[u8]>) -> String {
    match bytes {
        Some(bytes) => {
            let mut reversed = bytes.to_vec();
            reversed.reverse();
            hex::encode(reversed)
        }
        None => "nil".to_string(),
    }
}

/// Last three bytes of a public key.
fn key_suffix(key: &[u8]) -> String {
    hex::encode(&key[key.len().saturating_sub(3)..])
}

//! # Notification Matcher (mz-03)
//!
//! Selects notification events by name and emitter, decodes the payload of
//! the few event kinds it recognizes, and drives the match over a
//! prefetched block range.
//!
//! ## Matching Rules
//!
//! | Rule | Description |
//! |------|-------------|
//! | Name | Exact, case-sensitive equality |
//! | Emitter | Wildcard, or exact script hash equality |
//! | Order | Block order, then event order inside the block |
//!
//! ## Recognized Events
//!
//! `Transfer` (NEP-17), `NewEpoch`, `AddPeer` and `UpdateState` (NeoFS
//! netmap). Everything else, and any recognized name whose payload has the
//! wrong shape, decodes as `Generic`.

pub mod criteria;
pub mod decode;
pub mod errors;
pub mod scanner;

pub use criteria::{filter, CriteriaSet, EmitterFilter, MatchCriteria};
pub use decode::{DecodedNotification, NodeInfo, PeerState};
pub use errors::SearchError;
pub use scanner::{NotificationMatch, NotificationScanner};

//! # Fetch Pool (mz-02)
//!
//! Pre-warms the chain cache for a batch of independent keys with bounded
//! parallelism, so the sequential scan that follows only ever hits the
//! local store.
//!
//! ```text
//!   tasks ──send (capacity 1)──→ queue ──claim──→ worker 1..N ──→ FetchExecutor
//!                                                     │ error
//!   prefetch() ←──────────── first error ─────────────┘
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Exactly once | Every dispatched task is claimed by one worker |
//! | 2 | Backpressure | At most `workers` tasks in flight plus one queued |
//! | 3 | First error wins | The first worker error is returned; later ones are dropped |
//! | 4 | Cooperative stop | Cancellation is observed at every claim and dispatch; running fetches finish |
//! | 5 | Barrier | `prefetch` returning `Completed` means every task succeeded |
//!
//! Workers are not aborted when `prefetch` returns early. A fetch that was
//! already running may still land in the cache afterwards, which is harmless
//! because cache writes are idempotent.

pub mod config;
pub mod errors;
pub mod ports;
pub mod service;

pub use config::{PoolConfig, DEFAULT_WORKERS};
pub use errors::{PoolError, PrefetchOutcome};
pub use ports::{FetchExecutor, NoProgress, ProgressObserver};
pub use service::{prefetch, FetchPool};

//! # Stutter Detector (mz-04)
//!
//! Finds consecutive blocks whose timestamps are further apart than a
//! threshold, and summarizes the quiet runs between two such gaps as a skip
//! count.
//!
//! ```text
//!   block:102 at:...
//!   block:103 at:... [<- stutter for 31s]
//!   -- skipped 9 blocks --
//!   block:113 at:...
//!   block:114 at:... [<- stutter for 25s]
//! ```
//!
//! ## Rules
//!
//! | Rule | Description |
//! |------|-------------|
//! | Baseline | The first block only seeds `prev`; it is never reported |
//! | Strict | A gap equal to the threshold is not a stutter |
//! | Skips | Only reported between two stutters, never before the first one |
//! | Range | Fewer than two blocks is an `InsufficientRange` error |

pub mod detector;
pub mod errors;
pub mod scanner;

pub use detector::{scan, BlockStamp, StutterDetector, StutterReport};
pub use errors::StutterError;
pub use scanner::{scan_range, StutterScanner};

//! # Monza Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── search_flow.rs     # prefetch then notification search over a real store
//!     ├── stutter_flow.rs    # prefetch then stutter detection over a real store
//!     └── storage_faults.rs  # namespaces, corruption, locking
//! tests/benches/
//! └── pipeline_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mz-tests
//! cargo bench -p mz-tests
//! ```

pub mod integration;

//! Namesmith Worker
//!
//! The long-running check worker: claims single-domain jobs from the shared
//! queue, probes them with bounded in-process parallelism, and sweeps stale
//! records through the lock-coordinated idle recheck.
pub mod handlers;
pub mod recheck;
pub mod runtime;

pub use recheck::IdleRecheckJob;
pub use runtime::{IdleClock, WorkerRuntime, WorkerState};

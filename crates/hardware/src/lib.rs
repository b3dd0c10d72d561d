//! Front-end fetch stage of a cycle-accurate, superscalar, SMT x86 processor
//! timing simulator.
//!
//! Each simulated cycle the [`fetch::driver`] walks every [`Processor`] core,
//! lets its configured [`fetch::arbiter`] policy choose one or more hardware
//! threads, and funnels the chosen thread through the block-fetch or
//! trace-cache path into the [`fetch::primitive`], which single-steps the
//! guest functional executor and deposits the resulting uops into the
//! thread's fetch queue.
//!
//! Everything the fetch stage depends on but does not itself implement —
//! guest execution, address translation, the branch predictor, the trace
//! cache, instruction-cache timing — is expressed as a trait in
//! [`collaborators`] so this crate can be driven by hand-written fakes in
//! tests and by a real simulator's implementations in production.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod fetch;
pub mod processor;
pub mod stats;
pub mod thread;
pub mod uop;

#[cfg(test)]
pub(crate) mod testutil;

pub use collaborators::{
    AccessHandle, Btb, DirectionPredictor, GuestContext, InstMemory, LongLatencyEvents, Mmu,
    PageAccessKind, RegisterFile, TraceCache, TraceCacheHit,
};
pub use config::{Config, FetchKind};
pub use error::ConfigError;
pub use processor::{Core, Processor};
pub use thread::Thread;
pub use uop::{DepCounts, Uinst, UinstStagingList, Uop, UopFlags};

//! The fetch stage, one module per row of the component-design table:
//! [`eligibility`], [`primitive`], [`trace_cache_path`], [`block_path`],
//! [`arbiter`], and [`driver`].
//!
//! Every component function below takes the state it needs directly rather
//! than a whole [`crate::Processor`], both so the borrow checker can see
//! that a thread's own fields and the processor-wide collaborators are
//! disjoint, and so each component is independently testable against fakes.
//! [`CoreFetchEnv`] bundles exactly the processor- and core-scoped state a
//! single core's fetch call needs this cycle.

mod arbiter;
mod block_path;
mod driver;
mod eligibility;
mod primitive;
mod trace;
mod trace_cache_path;

pub use arbiter::run_core_fetch;
pub use block_path::fetch_thread;
pub use driver::fetch;
pub use eligibility::can_fetch;
pub use primitive::fetch_inst;
pub use trace_cache_path::fetch_thread_trace_cache;

use crate::collaborators::{LongLatencyEvents, Mmu, RegisterFile};
use crate::config::Config;
use crate::uop::UinstStagingList;

/// Processor- and core-scoped state threaded through every fetch-stage
/// function for a single core's fetch call (§9: "pass them via context
/// structs rather than process globals").
pub struct CoreFetchEnv<'a> {
    /// Index of the core this environment belongs to, used only for trace
    /// output.
    pub core_idx: usize,
    /// Current simulated cycle.
    pub cycle: u64,
    /// Validated processor configuration.
    pub config: &'a Config,
    /// Process-wide monotonically increasing uop identifier counter.
    pub uop_id_counter: &'a mut u64,
    /// This core's monotonically increasing uop identifier counter.
    pub core_uop_id_counter: &'a mut u64,
    /// The process-wide uinst staging list.
    pub staging: &'a mut UinstStagingList,
    /// Shared address translator.
    pub mmu: &'a mut dyn Mmu,
    /// Shared register-dependency classifier.
    pub register_file: &'a mut dyn RegisterFile,
    /// Shared long-latency event oracle.
    pub long_latency: &'a dyn LongLatencyEvents,
    /// Whether per-uop trace events should be emitted.
    pub trace_enabled: bool,
}

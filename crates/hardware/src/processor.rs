//! Core and processor-level state (§3.1).

use crate::collaborators::{LongLatencyEvents, Mmu, RegisterFile};
use crate::config::Config;
use crate::error::ConfigError;
use crate::thread::Thread;
use crate::uop::UinstStagingList;

/// One simulated core's scheduling state and its hardware threads.
pub struct Core {
    /// This core's hardware threads.
    pub threads: Vec<Thread>,
    /// Index of the thread to fetch from under the timeslice and
    /// switch-on-event policies.
    pub fetch_current: usize,
    /// Cycle at which `fetch_current` last became the active thread
    /// (switch-on-event only).
    pub fetch_switch_when: u64,
    /// Per-core monotonically increasing uop identifier counter.
    pub uop_id_counter: u64,
}

impl Core {
    pub(crate) fn new(threads: Vec<Thread>) -> Self {
        Self {
            threads,
            fetch_current: 0,
            fetch_switch_when: 0,
            uop_id_counter: 0,
        }
    }
}

impl std::fmt::Debug for Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("num_threads", &self.threads.len())
            .field("fetch_current", &self.fetch_current)
            .field("fetch_switch_when", &self.fetch_switch_when)
            .field("uop_id_counter", &self.uop_id_counter)
            .finish()
    }
}

/// The whole fetch-stage simulation: cores, their threads, and the
/// collaborators shared across every core (§3.1, §6).
pub struct Processor {
    /// Validated configuration this processor was built from.
    pub config: Config,
    /// Simulated cores.
    pub cores: Vec<Core>,
    /// Process-wide monotonically increasing uop identifier counter.
    pub uop_id_counter: u64,
    /// Simulated cycle counter.
    pub cycle: u64,
    /// Current pipeline stage tag, set by the cycle driver (§4.6).
    pub stage: &'static str,
    /// Runtime toggle for the per-uop trace line (§6, §10.3). Off by
    /// default; callers such as the CLI's `--trace` flag flip this after
    /// construction rather than at compile time, so the same binary can be
    /// run with or without tracing.
    pub trace_enabled: bool,

    /// Shared address translator.
    pub mmu: Box<dyn Mmu>,
    /// Shared register-dependency classifier.
    pub register_file: Box<dyn RegisterFile>,
    /// Shared long-latency event oracle, consulted by the switch-on-event
    /// policy.
    pub long_latency: Box<dyn LongLatencyEvents>,

    /// The process-wide uinst staging list (§3.1, §5).
    pub(crate) staging: UinstStagingList,
}

impl Processor {
    /// Builds a processor from a validated configuration and a per-thread
    /// factory closure invoked once for every (core, thread) pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` cannot describe a running
    /// processor (see [`Config::validate`]).
    pub fn new(
        config: Config,
        mmu: Box<dyn Mmu>,
        register_file: Box<dyn RegisterFile>,
        long_latency: Box<dyn LongLatencyEvents>,
        mut make_thread: impl FnMut(usize, usize) -> Thread,
    ) -> Result<Self, ConfigError> {
        config.validate().inspect_err(|err| {
            tracing::warn!(%err, "configuration rejected");
        })?;

        let cores = (0..config.topology.num_cores as usize)
            .map(|core_idx| {
                let threads = (0..config.topology.num_threads as usize)
                    .map(|thread_idx| make_thread(core_idx, thread_idx))
                    .collect();
                Core::new(threads)
            })
            .collect();

        Ok(Self {
            config,
            cores,
            uop_id_counter: 0,
            cycle: 0,
            stage: "",
            trace_enabled: false,
            mmu,
            register_file,
            long_latency,
            staging: UinstStagingList::new(),
        })
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("num_cores", &self.cores.len())
            .field("cycle", &self.cycle)
            .field("stage", &self.stage)
            .field("uop_id_counter", &self.uop_id_counter)
            .finish()
    }
}

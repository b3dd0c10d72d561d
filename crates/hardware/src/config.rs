//! Configuration surface for the fetch stage.
//!
//! Mirrors the nested-struct-per-concern shape used elsewhere in this
//! project's configuration layer: one sub-struct per cohesive group of
//! options, each field defaulted through a named function so a bare `{}`
//! JSON document and [`Config::default`] always agree.

use serde::Deserialize;

mod defaults {
    pub const fn num_cores() -> u32 {
        1
    }

    pub const fn num_threads() -> u32 {
        1
    }

    pub const fn fetch_kind() -> super::FetchKind {
        super::FetchKind::Shared
    }

    pub const fn fetch_queue_size() -> u32 {
        64
    }

    pub const fn trace_cache_present() -> bool {
        false
    }

    pub const fn trace_cache_queue_size() -> u32 {
        32
    }

    pub const fn trace_cache_branch_max() -> u32 {
        4
    }

    pub const fn thread_quantum() -> u64 {
        1_000
    }

    pub const fn thread_switch_penalty() -> u64 {
        5
    }
}

/// The three SMT fetch policies a core's arbiter can run under.
///
/// A closed set by design (see the design notes on
/// [`crate::fetch::arbiter`]): adding a policy means adding a variant here
/// and a matching arm in the arbiter, and the compiler enforces that both
/// happen together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchKind {
    /// Every eligible thread fetches every cycle; no arbitration state.
    #[default]
    Shared,
    /// Round-robin across threads, one dispatch per cycle.
    Timeslice,
    /// Single current thread with a quantum, a switch penalty, and a
    /// fairness-bounded opportunistic preemption scan.
    #[serde(rename = "switchonevent")]
    SwitchOnEvent,
}

/// Core and hardware-thread counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TopologyConfig {
    /// Number of simulated cores.
    #[serde(default = "defaults::num_cores")]
    pub num_cores: u32,
    /// Number of SMT hardware threads per core.
    #[serde(default = "defaults::num_threads")]
    pub num_threads: u32,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            num_cores: defaults::num_cores(),
            num_threads: defaults::num_threads(),
        }
    }
}

/// Per-thread fetch queue sizing and SMT policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FetchConfig {
    /// Which SMT arbitration policy the core's fetch stage runs under.
    #[serde(default = "defaults::fetch_kind")]
    pub kind: FetchKind,
    /// Maximum bytes of macro-instructions resident in a thread's fetch
    /// queue at once.
    #[serde(default = "defaults::fetch_queue_size")]
    pub queue_size: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            kind: defaults::fetch_kind(),
            queue_size: defaults::fetch_queue_size(),
        }
    }
}

/// Trace-cache presence and sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TraceCacheConfig {
    /// Whether the trace-cache fetch path is tried before the block path.
    #[serde(default = "defaults::trace_cache_present")]
    pub present: bool,
    /// Maximum uops resident in a thread's trace-cache sub-queue.
    #[serde(default = "defaults::trace_cache_queue_size")]
    pub queue_size: u32,
    /// Maximum number of sequential direction predictions combined into a
    /// single trace-cache lookup key.
    #[serde(default = "defaults::trace_cache_branch_max")]
    pub branch_max: u32,
}

impl Default for TraceCacheConfig {
    fn default() -> Self {
        Self {
            present: defaults::trace_cache_present(),
            queue_size: defaults::trace_cache_queue_size(),
            branch_max: defaults::trace_cache_branch_max(),
        }
    }
}

/// Switch-on-event timing parameters. Unused by the `shared` and
/// `timeslice` policies, but always present so switching `fetch_kind` at
/// runtime never requires a different configuration shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SmtConfig {
    /// Cycles a thread holds fetch before becoming switch-eligible.
    #[serde(default = "defaults::thread_quantum")]
    pub thread_quantum: u64,
    /// Penalty cycles charged to the incoming thread on a switch.
    #[serde(default = "defaults::thread_switch_penalty")]
    pub thread_switch_penalty: u64,
}

impl Default for SmtConfig {
    fn default() -> Self {
        Self {
            thread_quantum: defaults::thread_quantum(),
            thread_switch_penalty: defaults::thread_switch_penalty(),
        }
    }
}

/// Top-level configuration for a [`crate::Processor`].
///
/// ```
/// use fetchcore::Config;
///
/// let config = Config::default();
/// assert_eq!(config.topology.num_cores, 1);
/// assert_eq!(config.fetch.queue_size, 64);
/// assert!(!config.trace_cache.present);
/// ```
///
/// Configuration can also be deserialized from JSON; any field omitted from
/// the document falls back to its default:
///
/// ```
/// use fetchcore::Config;
///
/// let json = r#"{
///     "topology": { "num_cores": 2, "num_threads": 4 },
///     "fetch": { "kind": "switchonevent", "queue_size": 128 },
///     "trace_cache": { "present": true, "queue_size": 64, "branch_max": 8 },
///     "smt": { "thread_quantum": 500, "thread_switch_penalty": 10 }
/// }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.topology.num_threads, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Config {
    /// Core and hardware-thread counts.
    #[serde(default)]
    pub topology: TopologyConfig,
    /// Fetch-queue sizing and SMT policy selection.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Trace-cache presence and sizing.
    #[serde(default)]
    pub trace_cache: TraceCacheConfig,
    /// Switch-on-event timing parameters.
    #[serde(default)]
    pub smt: SmtConfig,
}

impl Config {
    /// Validates this configuration, returning the first violated
    /// constraint found.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::ConfigError) if any count or size in
    /// the configuration cannot describe a running processor.
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        if self.topology.num_cores == 0 {
            return Err(crate::ConfigError::ZeroCores(self.topology.num_cores));
        }
        if self.topology.num_threads == 0 {
            return Err(crate::ConfigError::ZeroThreads(self.topology.num_threads));
        }
        if self.fetch.queue_size == 0 {
            return Err(crate::ConfigError::ZeroFetchQueueSize(self.fetch.queue_size));
        }
        if self.trace_cache.present {
            if self.trace_cache.queue_size == 0 {
                return Err(crate::ConfigError::ZeroTraceCacheQueueSize(
                    self.trace_cache.queue_size,
                ));
            }
            if self.trace_cache.branch_max == 0 {
                return Err(crate::ConfigError::ZeroTraceCacheBranchMax(
                    self.trace_cache.branch_max,
                ));
            }
        }
        Ok(())
    }
}

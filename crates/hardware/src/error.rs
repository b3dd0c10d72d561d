//! Configuration-time error types.
//!
//! These are raised when a [`crate::Config`] is turned into a running
//! [`crate::Processor`], never from inside the per-cycle fetch path: an
//! unfetchable thread or a stalled cache access is back-pressure, not an
//! error (see the module docs on [`crate::fetch`]).

/// Rejects a [`crate::Config`] that cannot describe a running processor.
///
/// Every variant names the field and the value that failed validation so the
/// diagnostic can be surfaced directly to whoever constructed the
/// configuration, without the caller needing to re-derive which field was at
/// fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `num_cores` was zero; a processor must have at least one core.
    #[error("num_cores must be at least 1, got {0}")]
    ZeroCores(u32),

    /// `num_threads` was zero; a core must have at least one hardware thread.
    #[error("num_threads must be at least 1, got {0}")]
    ZeroThreads(u32),

    /// `fetch_queue_size` was zero; no macro-instruction could ever fit.
    #[error("fetch_queue_size must be at least 1 byte, got {0}")]
    ZeroFetchQueueSize(u32),

    /// `trace_cache_queue_size` was zero while `trace_cache_present` is set.
    #[error("trace_cache_queue_size must be at least 1 uop when the trace cache is enabled, got {0}")]
    ZeroTraceCacheQueueSize(u32),

    /// `trace_cache_branch_max` was zero while `trace_cache_present` is set.
    #[error("trace_cache_branch_max must be at least 1 when the trace cache is enabled, got {0}")]
    ZeroTraceCacheBranchMax(u32),
}
